use crate::api::handlers::{error_response, is_authorized, translate_error, unauthorized};
use crate::db::models::{
    AcquisitionType, ChangeRequestKind, ChangeRequestParams, ChangeRequestStatus,
    ConsignmentChangeRequest, PriceOverride, PurchaseStatus,
};
use crate::db::DbClient;
use crate::errors::ApiError;
use crate::logging::audit_request;
use crate::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::{json, to_value, Value};
use tracing::{info, warn};
use uuid::Uuid;

/// Handler for a vendor-side change request on consigned gear
///
/// # Endpoint: POST /consignment/:purchase_id/requests
///
/// Only consignment purchases qualify, and at most one request can be
/// pending per purchase.
pub(crate) async fn create_change_request(
    State(db): State<DbClient>,
    Path(purchase_id): Path<Uuid>,
    Json(payload): Json<ChangeRequestParams>,
) -> (StatusCode, Json<Value>) {
    let payload_value = to_value(&payload).ok();
    audit_request(
        "POST",
        &format!("/consignment/{purchase_id}/requests"),
        payload_value.as_ref(),
    );

    if let Err(message) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    match record_change_request(&db, purchase_id, &payload).await {
        Ok(request) => (StatusCode::CREATED, Json(json!(request))),
        Err(err) => translate_error(err),
    }
}

async fn record_change_request(
    db: &DbClient,
    purchase_id: Uuid,
    payload: &ChangeRequestParams,
) -> Result<ConsignmentChangeRequest> {
    let purchase = db.get_purchase(purchase_id).await?;
    let acquisition = AcquisitionType::try_from(purchase.acquisition_type.as_str())?;
    if acquisition != AcquisitionType::Consignment {
        return Err(ApiError::Conflict(format!(
            "Purchase {purchase_id} is a buyout, change requests apply to consignments"
        )));
    }

    let kind = ChangeRequestKind::try_from(payload.kind.as_str())
        .map_err(|_| ApiError::Validation(format!("Unknown change request kind: {}", payload.kind)))?;

    let request = ConsignmentChangeRequest::new(
        purchase_id,
        &payload.requested_by,
        kind,
        payload.proposed_price,
    );
    db.insert_change_request(&request).await?;
    Ok(request)
}

/// Handler for approving a pending change request
///
/// # Endpoint: POST /consignment/requests/:id/approve
///
/// A price change lands as an override on the latest snapshot; a withdrawal
/// cancels the purchase.
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn approve_change_request(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(request_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request(
        "POST",
        &format!("/consignment/requests/{request_id}/approve"),
        None,
    );

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized change request approval attempt");
        return unauthorized();
    }

    match approve_request(&db, request_id).await {
        Ok(request) => (StatusCode::OK, Json(json!(request))),
        Err(err) => translate_error(err),
    }
}

/// Replay guard: a decided request must not have its effect applied twice.
fn ensure_pending(request: &ConsignmentChangeRequest) -> Result<()> {
    if request.status != ChangeRequestStatus::Pending.as_str() {
        return Err(ApiError::Conflict(format!(
            "Change request {} was already {}",
            request.id, request.status
        )));
    }
    Ok(())
}

async fn approve_request(db: &DbClient, request_id: Uuid) -> Result<ConsignmentChangeRequest> {
    let request = db.get_change_request(request_id).await?;
    ensure_pending(&request)?;
    let kind = ChangeRequestKind::try_from(request.kind.as_str())?;

    // Apply the effect first so a mid-way failure leaves the request pending
    match kind {
        ChangeRequestKind::PriceChange => {
            let Some(proposed) = request.proposed_price else {
                return Err(ApiError::Validation(format!(
                    "Request {request_id} carries no proposed price"
                )));
            };
            let snapshot = db.get_latest_snapshot(request.purchase_id).await?;
            let record = PriceOverride {
                id: Uuid::new_v4(),
                snapshot_id: snapshot.id,
                overridden_by: request.requested_by.clone(),
                list_total: proposed,
                reason: format!("Approved consignment change request {request_id}"),
                created_at: Utc::now().naive_utc(),
            };
            db.insert_price_override(&record).await?;
        }
        ChangeRequestKind::Withdrawal => {
            db.transition_purchase(request.purchase_id, PurchaseStatus::Cancelled)
                .await?;
        }
    }

    let decided = db
        .decide_change_request(request_id, ChangeRequestStatus::Approved)
        .await?;
    info!(
        "Change request {} ({}) approved for purchase {}",
        request_id,
        decided.kind,
        decided.purchase_id
    );
    Ok(decided)
}

/// Handler for rejecting a pending change request
///
/// # Endpoint: POST /consignment/requests/:id/reject
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn reject_change_request(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(request_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request(
        "POST",
        &format!("/consignment/requests/{request_id}/reject"),
        None,
    );

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized change request rejection attempt");
        return unauthorized();
    }

    match db
        .decide_change_request(request_id, ChangeRequestStatus::Rejected)
        .await
    {
        Ok(request) => (StatusCode::OK, Json(json!(request))),
        Err(err) => translate_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_request_passes_replay_guard() {
        let request = ConsignmentChangeRequest::new(
            Uuid::new_v4(),
            "vendor@example.com",
            ChangeRequestKind::PriceChange,
            Some("450".parse().unwrap()),
        );
        assert!(ensure_pending(&request).is_ok());
    }

    #[test]
    fn test_decided_request_is_rejected_before_any_effect() {
        let mut request = ConsignmentChangeRequest::new(
            Uuid::new_v4(),
            "vendor@example.com",
            ChangeRequestKind::PriceChange,
            Some("450".parse().unwrap()),
        );
        request.status = ChangeRequestStatus::Approved.into();

        let result = ensure_pending(&request);
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }
}
