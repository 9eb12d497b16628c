// Parking Register - Web Server
// REST API with Axum over the SQLite-backed registry

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use parking_register::{
    submit_entry, Config, Entry, EntryForm, KeyValueStore, Registry, SubmitError,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
struct AppState<S: KeyValueStore> {
    registry: Mutex<Registry<S>>,
}

impl<S: KeyValueStore> AppState<S> {
    fn new(registry: Registry<S>) -> Arc<Self> {
        Arc::new(Self {
            registry: Mutex::new(registry),
        })
    }

    /// Lock the registry, recovering from a poisoned lock
    fn registry(&self) -> MutexGuard<'_, Registry<S>> {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

type SharedState<S> = Arc<AppState<S>>;

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    search: Option<String>,
}

#[derive(Serialize)]
struct RemovedResponse {
    license_plate: String,
    removed: usize,
}

#[derive(Serialize)]
struct NextSlotResponse {
    next_slot: u64,
}

#[derive(Serialize)]
struct SlotResponse {
    slot_number: String,
    taken: bool,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/entries - All entries, optionally filtered by ?search=
async fn list_entries<S: KeyValueStore>(
    State(state): State<SharedState<S>>,
    Query(params): Query<SearchParams>,
) -> Json<ApiResponse<Vec<Entry>>> {
    let registry = state.registry();

    let entries = match params.search.as_deref() {
        Some(query) => registry.search(query),
        None => registry.list().to_vec(),
    };

    Json(ApiResponse::ok(entries))
}

/// POST /api/entries - Validate and register a vehicle
async fn create_entry<S: KeyValueStore>(
    State(state): State<SharedState<S>>,
    Json(form): Json<EntryForm>,
) -> Response {
    let mut registry = state.registry();

    match submit_entry(&mut *registry, &form) {
        Ok(entry) => {
            tracing::info!(plate = %entry.license_plate, slot = %entry.slot_number, "vehicle registered");
            (StatusCode::CREATED, Json(ApiResponse::ok(entry))).into_response()
        }
        Err(err) => {
            let status = match &err {
                SubmitError::Invalid(_) => StatusCode::BAD_REQUEST,
                SubmitError::SlotTaken { .. } => StatusCode::CONFLICT,
                SubmitError::Storage(cause) => {
                    tracing::error!(error = %cause, "failed to save entry");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };

            (status, Json(ApiResponse::<Entry>::err(err.to_string()))).into_response()
        }
    }
}

/// DELETE /api/entries/:plate - Remove every entry with this plate
async fn delete_entry<S: KeyValueStore>(
    State(state): State<SharedState<S>>,
    Path(plate): Path<String>,
) -> Response {
    let mut registry = state.registry();

    match registry.remove(&plate) {
        Ok(removed) => {
            tracing::info!(plate = %plate, removed, "vehicle removed");
            let body = RemovedResponse {
                license_plate: plate,
                removed,
            };
            (StatusCode::OK, Json(ApiResponse::ok(body))).into_response()
        }
        Err(err) => {
            tracing::error!(plate = %plate, error = %err, "failed to remove entry");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<RemovedResponse>::err(
                    SubmitError::Storage(err).to_string(),
                )),
            )
                .into_response()
        }
    }
}

/// GET /api/slots/next - Suggested slot for the next vehicle
async fn next_slot<S: KeyValueStore>(
    State(state): State<SharedState<S>>,
) -> Json<ApiResponse<NextSlotResponse>> {
    let next_slot = state.registry().next_slot_number();
    Json(ApiResponse::ok(NextSlotResponse { next_slot }))
}

/// GET /api/slots/:slot - Whether a slot number is in use
async fn slot_status<S: KeyValueStore>(
    State(state): State<SharedState<S>>,
    Path(slot_number): Path<String>,
) -> Json<ApiResponse<SlotResponse>> {
    let taken = state.registry().is_slot_taken(&slot_number);
    Json(ApiResponse::ok(SlotResponse { slot_number, taken }))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn app<S>(state: SharedState<S>) -> Router
where
    S: KeyValueStore + Send + 'static,
{
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/entries", get(list_entries::<S>).post(create_entry::<S>))
        .route("/entries/:plate", axum::routing::delete(delete_entry::<S>))
        .route("/slots/next", get(next_slot::<S>))
        .route("/slots/:slot", get(slot_status::<S>))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    parking_register::init_logging("info,tower_http=debug");

    let config = Config::from_env();

    let registry = config.open_registry()?;
    tracing::info!(
        db = %config.db_path.display(),
        key = %config.storage_key,
        entries = registry.len(),
        "register opened"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app(AppState::new(registry))).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use parking_register::MemoryStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState::new(Registry::new(MemoryStore::new())))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn jane() -> Value {
        json!({
            "owner": "Jane",
            "vehicle": "Civic",
            "licensePlate": "ABC-1234",
            "entryDate": "2024-01-01",
            "slotNumber": "1"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&test_app(), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let app = test_app();

        let (status, body) = send(&app, Method::POST, "/api/entries", Some(jane())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["licensePlate"], "ABC-1234");

        let (status, body) = send(&app, Method::GET, "/api/entries", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::GET, "/api/slots/next", None).await;
        assert_eq!(body["data"]["next_slot"], 2);

        let (_, body) = send(&app, Method::GET, "/api/slots/1", None).await;
        assert_eq!(body["data"]["taken"], true);
    }

    #[tokio::test]
    async fn test_rejections() {
        let app = test_app();
        send(&app, Method::POST, "/api/entries", Some(jane())).await;

        let mut duplicate = jane();
        duplicate["licensePlate"] = json!("XYZ-9999");
        let (status, body) = send(&app, Method::POST, "/api/entries", Some(duplicate)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let mut bad_plate = jane();
        bad_plate["licensePlate"] = json!("ABCD-123");
        bad_plate["slotNumber"] = json!("2");
        let (status, _) = send(&app, Method::POST, "/api/entries", Some(bad_plate)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::POST, "/api/entries", Some(json!({"owner": "Jane"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "All fields must be filled!");
    }

    #[tokio::test]
    async fn test_delete_and_search() {
        let app = test_app();
        send(&app, Method::POST, "/api/entries", Some(jane())).await;

        let mut second = jane();
        second["owner"] = json!("Omar");
        second["licensePlate"] = json!("AB-12345");
        second["slotNumber"] = json!("2");
        send(&app, Method::POST, "/api/entries", Some(second)).await;

        let (_, body) = send(&app, Method::GET, "/api/entries?search=om", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::DELETE, "/api/entries/ABC-1234", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["removed"], 1);

        let (_, body) = send(&app, Method::GET, "/api/slots/1", None).await;
        assert_eq!(body["data"]["taken"], false);
    }
}
