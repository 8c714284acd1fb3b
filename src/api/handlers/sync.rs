use crate::api::handlers::{is_authorized, translate_error, unauthorized};
use crate::db::models::SyncRunResponse;
use crate::db::DbClient;
use crate::logging::audit_request;
use crate::services::background_jobs::{run_catalog_sync, BackgroundJobManager};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

/// Handler for the background sync health report
///
/// # Endpoint: GET /sync/status
pub(crate) async fn get_sync_status(State(db): State<DbClient>) -> (StatusCode, Json<Value>) {
    let health = BackgroundJobManager::new(db).get_health_status().await;
    (StatusCode::OK, Json(json!(health)))
}

/// Handler for triggering a WooCommerce catalog sync outside the schedule
///
/// # Endpoint: POST /sync/run
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn run_woocommerce_sync(
    State(db): State<DbClient>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", "/sync/run", None);

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized sync trigger attempt");
        return unauthorized();
    }

    match run_catalog_sync(&db).await {
        Ok((pushed, failed)) => (
            StatusCode::OK,
            Json(json!(SyncRunResponse { pushed, failed })),
        ),
        Err(err) => translate_error(err),
    }
}
