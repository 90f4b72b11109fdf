use serde::Deserialize;

/// Configuration for the soundbar platform
#[derive(Debug, Clone, Deserialize)]
pub struct SoundbarConfig {
    /// Soundbar hostname or IP address
    pub ip: String,

    /// Display name of the accessory
    pub name: String,
}

impl SoundbarConfig {
    pub fn new(ip: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            name: name.into(),
        }
    }
}
