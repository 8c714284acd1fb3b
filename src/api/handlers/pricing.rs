use crate::api::handlers::{error_response, is_authorized, translate_error, unauthorized};
use crate::db::models::{PriceOverride, PriceOverrideParams};
use crate::db::DbClient;
use crate::logging::audit_request;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::{json, to_value, Value};
use tracing::warn;
use uuid::Uuid;

/// Handler for retrieving the effective pricing of a purchase
///
/// # Endpoint: GET /purchases/:id/pricing
///
/// Returns the latest snapshot with the payout recomputed from the most
/// recent override, when one exists.
pub(crate) async fn get_pricing(
    State(db): State<DbClient>,
    Path(purchase_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    match db.get_effective_pricing(purchase_id).await {
        Ok(pricing) => (StatusCode::OK, Json(json!(pricing))),
        Err(err) => translate_error(err),
    }
}

/// Handler for recording a manual price override on the latest snapshot
///
/// # Endpoint: POST /purchases/:id/pricing/override
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn override_price(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(purchase_id): Path<Uuid>,
    Json(payload): Json<PriceOverrideParams>,
) -> (StatusCode, Json<Value>) {
    let payload_value = to_value(&payload).ok();
    audit_request(
        "POST",
        &format!("/purchases/{purchase_id}/pricing/override"),
        payload_value.as_ref(),
    );

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized price override attempt");
        return unauthorized();
    }
    if let Err(message) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    let snapshot = match db.get_latest_snapshot(purchase_id).await {
        Ok(snapshot) => snapshot,
        Err(err) => return translate_error(err),
    };

    let record = PriceOverride {
        id: Uuid::new_v4(),
        snapshot_id: snapshot.id,
        overridden_by: payload.overridden_by,
        list_total: payload.list_total,
        reason: payload.reason,
        created_at: Utc::now().naive_utc(),
    };
    if let Err(err) = db.insert_price_override(&record).await {
        return translate_error(err);
    }

    match db.get_effective_pricing(purchase_id).await {
        Ok(pricing) => (StatusCode::CREATED, Json(json!(pricing))),
        Err(err) => translate_error(err),
    }
}
