use crate::api::handlers::{is_authorized, translate_error, unauthorized};
use crate::db::models::QuoteSentResponse;
use crate::db::DbClient;
use crate::errors::ApiError;
use crate::logging::audit_request;
use crate::services::kapso;
use crate::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

/// Handler for sending (or resending) the WhatsApp quote for a purchase
///
/// # Endpoint: POST /quotes/:purchase_id/send
///
/// Used when the automatic send on inspection close failed, or when the
/// vendor asks for the message again.
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn send_quote(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(purchase_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/quotes/{purchase_id}/send"), None);

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized quote send attempt");
        return unauthorized();
    }

    match deliver_quote(&db, purchase_id).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(err) => translate_error(err),
    }
}

async fn deliver_quote(db: &DbClient, purchase_id: Uuid) -> Result<QuoteSentResponse> {
    let purchase = db.get_purchase(purchase_id).await?;
    let Some(quote_total) = purchase.quote_total else {
        return Err(ApiError::Conflict(format!(
            "Purchase {purchase_id} has no quote yet, close its inspection first"
        )));
    };

    let snapshot = db.get_latest_snapshot(purchase_id).await?;
    let vendor = db.get_vendor(purchase.vendor_id).await?;

    kapso::send_quote(&vendor, &purchase, &snapshot).await?;
    db.mark_quote_sent(purchase_id).await?;

    Ok(QuoteSentResponse {
        purchase_id,
        quote_total,
        sent_at: Utc::now().naive_utc(),
    })
}
