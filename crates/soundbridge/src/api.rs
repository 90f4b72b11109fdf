use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::hap::Accessory;
use crate::hap::AccessorySnapshot;
use crate::hap::AccessoryStore;
use crate::hap::CharacteristicType;
use crate::hap::CharacteristicValue;
use crate::hap::HapError;

/// Response for the /v1/ping endpoint
#[derive(Serialize)]
struct PingResponse {
    status: String,
}

/// Response for the /v1/info endpoint
#[derive(Serialize)]
struct InfoResponse {
    version: String,
    hostname: String,
}

/// Body of characteristic reads and writes
#[derive(Debug, Serialize, Deserialize)]
struct CharacteristicBody {
    value: CharacteristicValue,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    version: &'static str,
    host: Arc<AccessoryStore>,
}

/// Path of a single characteristic
type CharacteristicPath = Path<(String, String, String)>;

enum ApiError {
    AccessoryNotFound(String),
    UnknownCharacteristic(String),
    Hap(HapError),
}

impl From<HapError> for ApiError {
    fn from(e: HapError) -> Self {
        ApiError::Hap(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::AccessoryNotFound(uuid) => {
                (StatusCode::NOT_FOUND, format!("Accessory not found: {}", uuid))
            }
            ApiError::UnknownCharacteristic(kind) => (
                StatusCode::NOT_FOUND,
                format!("Unknown characteristic: {}", kind),
            ),
            ApiError::Hap(e) => {
                let status = match e {
                    HapError::ServiceNotFound(_) | HapError::CharacteristicNotFound { .. } => {
                        StatusCode::NOT_FOUND
                    }
                    HapError::WriteOnly(_) => StatusCode::METHOD_NOT_ALLOWED,
                    HapError::InvalidValue(_) => StatusCode::BAD_REQUEST,
                    HapError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
                    HapError::CommunicationFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, e.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Handler for GET /v1/ping
#[tracing::instrument]
async fn ping() -> impl IntoResponse {
    tracing::debug!("Handling /v1/ping request");
    (
        StatusCode::OK,
        Json(PingResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Handler for GET /v1/info
#[tracing::instrument(skip(state))]
async fn info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Handling /v1/info request");

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    (
        StatusCode::OK,
        Json(InfoResponse {
            version: state.version.to_string(),
            hostname,
        }),
    )
}

/// Handler for GET /v1/accessories
#[tracing::instrument(skip(state))]
async fn list_accessories(State(state): State<Arc<AppState>>) -> Json<Vec<AccessorySnapshot>> {
    Json(
        state
            .host
            .accessories()
            .iter()
            .map(|a| a.snapshot())
            .collect(),
    )
}

fn resolve(
    state: &AppState,
    uuid: &str,
    kind: &str,
) -> Result<(Arc<Accessory>, CharacteristicType), ApiError> {
    let accessory = Uuid::parse_str(uuid)
        .ok()
        .and_then(|uuid| state.host.get(&uuid))
        .ok_or_else(|| ApiError::AccessoryNotFound(uuid.to_string()))?;
    let kind = CharacteristicType::from_str(kind)
        .map_err(|_| ApiError::UnknownCharacteristic(kind.to_string()))?;
    Ok((accessory, kind))
}

/// Handler for GET /v1/accessories/:uuid/services/:service/characteristics/:kind
#[tracing::instrument(skip(state))]
async fn read_characteristic(
    State(state): State<Arc<AppState>>,
    Path((uuid, service, kind)): CharacteristicPath,
) -> Result<Json<CharacteristicBody>, ApiError> {
    let (accessory, kind) = resolve(&state, &uuid, &kind)?;
    let value = accessory.read(&service, kind).await?;
    Ok(Json(CharacteristicBody { value }))
}

/// Handler for PUT /v1/accessories/:uuid/services/:service/characteristics/:kind
#[tracing::instrument(skip(state))]
async fn write_characteristic(
    State(state): State<Arc<AppState>>,
    Path((uuid, service, kind)): CharacteristicPath,
    Json(body): Json<CharacteristicBody>,
) -> Result<StatusCode, ApiError> {
    let (accessory, kind) = resolve(&state, &uuid, &kind)?;
    accessory.write(&service, kind, body.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create the API router with all endpoints
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/ping", get(ping))
        .route("/v1/info", get(info))
        .route("/v1/accessories", get(list_accessories))
        .route(
            "/v1/accessories/:uuid/services/:service/characteristics/:kind",
            get(read_characteristic).put(write_characteristic),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP API server
///
/// Serves the accessories published to `host` until `shutdown_rx` fires.
pub async fn serve(
    listen: String,
    port: u16,
    host: Arc<AccessoryStore>,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    let state = Arc::new(AppState { version, host });
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", listen, port).parse()?;
    tracing::info!("Starting HTTP API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            tracing::info!("HTTP API server shutting down gracefully");
        })
        .await?;

    Ok(())
}

#[cfg(all(test, feature = "platform_soundbar"))]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::device::DeviceCall;
    use crate::device::MockSoundbar;
    use crate::hap::generate_uuid;
    use crate::platform::Platform;
    use crate::soundbar::SoundbarConfig;
    use crate::soundbar::SoundbarPlatform;

    async fn router(device: Arc<MockSoundbar>) -> (Router, Uuid) {
        let host = Arc::new(AccessoryStore::new());
        let platform = SoundbarPlatform::new(SoundbarConfig::new("10.0.0.2", "Den"), device);
        platform.setup(host.as_ref()).await.unwrap();

        let state = Arc::new(AppState {
            version: "test",
            host,
        });
        (
            create_router(state),
            generate_uuid("homebridge:vizio-soundbar:accessory:Den"),
        )
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _) = router(Arc::new(MockSoundbar::new())).await;
        let response = app
            .oneshot(Request::get("/v1/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_accessories_makes_no_device_calls() {
        let device = Arc::new(MockSoundbar::with_inputs(&["HDMI-1"]));
        let (app, uuid) = router(device.clone()).await;

        let response = app
            .oneshot(Request::get("/v1/accessories").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json[0]["uuid"], uuid.to_string());
        assert_eq!(json[0]["services"].as_array().unwrap().len(), 4);
        assert_eq!(device.calls(), vec![DeviceCall::ListInputs]);
    }

    #[tokio::test]
    async fn test_write_then_read_volume() {
        let device = Arc::new(MockSoundbar::new().with_volume(25));
        let (app, uuid) = router(device.clone()).await;
        let path = format!(
            "/v1/accessories/{}/services/speakerService/characteristics/volume",
            uuid
        );

        let response = app
            .clone()
            .oneshot(
                Request::put(&path)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"value": 40}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::get(&path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["value"], 25);

        assert_eq!(
            device.calls(),
            vec![
                DeviceCall::ListInputs,
                DeviceCall::SetVolume(40),
                DeviceCall::GetVolume,
            ]
        );
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let (app, uuid) = router(Arc::new(MockSoundbar::offline())).await;
        let cases = [
            (
                format!("/v1/accessories/{}/services/speakerService/characteristics/volume", uuid),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                format!("/v1/accessories/{}/services/speakerService/characteristics/volume_selector", uuid),
                StatusCode::METHOD_NOT_ALLOWED,
            ),
            (
                format!("/v1/accessories/{}/services/input0/characteristics/name", uuid),
                StatusCode::NOT_FOUND,
            ),
            (
                format!("/v1/accessories/{}/services/speakerService/characteristics/brightness", uuid),
                StatusCode::NOT_FOUND,
            ),
            (
                "/v1/accessories/not-a-uuid/services/speakerService/characteristics/volume".to_string(),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (path, expected) in cases {
            let response = app
                .clone()
                .oneshot(Request::get(&path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "GET {}", path);
        }
    }
}
