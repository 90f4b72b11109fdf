use sha1::Digest;
use sha1::Sha1;
use uuid::Uuid;

/// Derive a stable accessory UUID from arbitrary content.
///
/// Takes the first 16 bytes of the SHA-1 digest verbatim, without setting
/// version or variant bits, so the same name always maps to the same
/// accessory across restarts.
pub fn generate_uuid(data: &str) -> Uuid {
    let digest = Sha1::digest(data.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_is_sha1_prefix() {
        assert_eq!(
            generate_uuid("hello").to_string(),
            "aaf4c61d-dcc5-e8a2-dabe-de0f3b482cd9"
        );
    }

    #[test]
    fn test_generate_uuid_is_deterministic() {
        let a = generate_uuid("homebridge:vizio-soundbar:accessory:Living Room");
        let b = generate_uuid("homebridge:vizio-soundbar:accessory:Living Room");
        let c = generate_uuid("homebridge:vizio-soundbar:accessory:Kitchen");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
