use crate::api::handlers::{error_response, translate_error};
use crate::db::models::{
    PurchaseStatus, QuoteDecisionData, WebhookEnvelope, WebhookEvent, WebhookStatus,
};
use crate::db::DbClient;
use crate::services::verify_webhook_signature;
use crate::{Result, CONFIG};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info, warn};

const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Handler for Kapso WhatsApp quote-decision deliveries
///
/// # Endpoint: POST /webhooks/whatsapp
///
/// The raw body is HMAC-verified before parsing. Deliveries are idempotent
/// on event_id: a replay answers 200 without reprocessing. A processing
/// failure is recorded on the event and still answers 200 so the sender
/// does not retry a delivery we already hold.
pub(crate) async fn handle_whatsapp_webhook(
    State(db): State<DbClient>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        warn!(target: "audit_log", "Webhook delivery without signature header");
        return error_response(StatusCode::UNAUTHORIZED, "Missing webhook signature");
    };
    if !verify_webhook_signature(&CONFIG.webhook_secret, &body, signature) {
        warn!(target: "audit_log", "Webhook delivery with invalid signature");
        return error_response(StatusCode::UNAUTHORIZED, "Invalid webhook signature");
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Malformed webhook payload: {err}"),
            )
        }
    };

    let event = WebhookEvent::received(
        &envelope.event_id,
        &envelope.event_type,
        envelope.data.clone(),
    );
    let inserted = match db.insert_webhook_event(&event).await {
        Ok(inserted) => inserted,
        Err(err) => return translate_error(err),
    };
    if !inserted {
        return (
            StatusCode::OK,
            Json(json!({
                "event_id": envelope.event_id,
                "outcome": "already_processed",
            })),
        );
    }

    let outcome = match process_event(&db, &envelope).await {
        Ok(outcome) => {
            if let Err(err) = db
                .mark_webhook_event(&envelope.event_id, outcome, None)
                .await
            {
                error!("Failed to mark webhook {}: {}", envelope.event_id, err);
            }
            outcome
        }
        Err(err) => {
            error!("Webhook {} processing failed: {}", envelope.event_id, err);
            if let Err(mark_err) = db
                .mark_webhook_event(
                    &envelope.event_id,
                    WebhookStatus::Failed,
                    Some(&err.to_string()),
                )
                .await
            {
                error!(
                    "Failed to mark webhook {} as failed: {}",
                    envelope.event_id, mark_err
                );
            }
            WebhookStatus::Failed
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "event_id": envelope.event_id,
            "outcome": outcome.as_str(),
        })),
    )
}

/// Applies the purchase transition the event calls for.
async fn process_event(db: &DbClient, envelope: &WebhookEnvelope) -> Result<WebhookStatus> {
    match envelope.event_type.as_str() {
        "quote.accepted" => {
            let decision: QuoteDecisionData = serde_json::from_value(envelope.data.clone())?;
            db.transition_purchase(decision.purchase_id, PurchaseStatus::AwaitingPayment)
                .await?;
            info!(
                "Quote accepted via WhatsApp for purchase {}",
                decision.purchase_id
            );
            Ok(WebhookStatus::Processed)
        }
        "quote.declined" => {
            let decision: QuoteDecisionData = serde_json::from_value(envelope.data.clone())?;
            db.transition_purchase(decision.purchase_id, PurchaseStatus::Cancelled)
                .await?;
            info!(
                "Quote declined via WhatsApp for purchase {}",
                decision.purchase_id
            );
            Ok(WebhookStatus::Processed)
        }
        other => {
            info!("Ignoring webhook event type {}", other);
            Ok(WebhookStatus::Skipped)
        }
    }
}
