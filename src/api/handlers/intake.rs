use crate::api::handlers::{error_response, is_authorized, translate_error, unauthorized};
use crate::db::models::{
    AcceptIntakeParams, AcquisitionType, InspectionSession, IntakeCreatedResponse, IntakeParams,
    PendingItem, PendingPurchase, PurchaseStatus, Vendor,
};
use crate::db::DbClient;
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

/// Handler for recording a vendor offer as a pending purchase
///
/// # Endpoint: POST /intake
///
/// # Arguments
/// * `db` - Database client from application state
/// * `payload` - Vendor reference (or inline vendor) plus offered items
///
/// # Returns
/// * `(StatusCode, Json<Value>)` - 201 with the new purchase id, or an error body
pub(crate) async fn create_intake(
    State(db): State<DbClient>,
    Json(payload): Json<IntakeParams>,
) -> (StatusCode, Json<Value>) {
    let payload_value = to_value(&payload).ok();
    audit_request("POST", "/intake", payload_value.as_ref());

    if let Err(message) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    let acquisition = match AcquisitionType::try_from(payload.acquisition_type.as_str()) {
        Ok(acquisition) => acquisition,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "acquisition_type must be consignment or buyout",
            )
        }
    };

    match record_intake(&db, &payload, acquisition).await {
        Ok(response) => (StatusCode::CREATED, Json(json!(response))),
        Err(err) => translate_error(err),
    }
}

/// Resolves the vendor and writes the purchase with its items.
async fn record_intake(
    db: &DbClient,
    payload: &IntakeParams,
    acquisition: AcquisitionType,
) -> Result<IntakeCreatedResponse> {
    let vendor_id = match (payload.vendor_id, &payload.vendor) {
        (Some(existing), _) => {
            // Confirm the reference before writing anything
            db.get_vendor(existing).await?;
            existing
        }
        (None, Some(new_vendor)) => {
            let vendor = Vendor {
                id: Uuid::new_v4(),
                name: new_vendor.name.clone(),
                email: new_vendor.email.clone(),
                whatsapp_phone: new_vendor.whatsapp_phone.clone(),
                created_at: Utc::now().naive_utc(),
            };
            db.insert_vendor(&vendor).await?;
            vendor.id
        }
        (None, None) => unreachable!("validated above"),
    };

    let purchase = PendingPurchase::new(vendor_id, acquisition);
    let items: Vec<PendingItem> = payload
        .items
        .iter()
        .map(|item| PendingItem::from_params(purchase.id, item))
        .collect();

    db.insert_purchase_with_items(&purchase, &items).await?;

    Ok(IntakeCreatedResponse {
        purchase_id: purchase.id,
        vendor_id,
        status: purchase.status,
        item_count: items.len(),
    })
}

/// Handler for retrieving a purchase with its vendor and items
///
/// # Endpoint: GET /intake/:id
pub(crate) async fn get_intake(
    State(db): State<DbClient>,
    Path(purchase_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    match db.get_purchase_detail(purchase_id).await {
        Ok(detail) => (StatusCode::OK, Json(json!(detail))),
        Err(err) => translate_error(err),
    }
}

/// Handler for accepting an intake and opening its inspection session
///
/// # Endpoint: POST /intake/:id/accept
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn accept_intake(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(purchase_id): Path<Uuid>,
    Json(payload): Json<AcceptIntakeParams>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/intake/{purchase_id}/accept"), None);

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized intake accept attempt");
        return unauthorized();
    }
    if payload.inspector.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "inspector cannot be empty");
    }

    let purchase = match db
        .transition_purchase(purchase_id, PurchaseStatus::InspectionInProgress)
        .await
    {
        Ok(purchase) => purchase,
        Err(err) => return translate_error(err),
    };

    let session = InspectionSession::open(purchase.id, &payload.inspector);
    if let Err(err) = db.insert_inspection_session(&session).await {
        return translate_error(err);
    }

    info!(
        "Intake {} accepted, inspection session {} opened",
        purchase_id, session.id
    );
    (
        StatusCode::OK,
        Json(json!({
            "purchase_id": purchase.id,
            "status": purchase.status,
            "inspection_session_id": session.id,
        })),
    )
}

/// Handler for rejecting an intake while still under review
///
/// # Endpoint: POST /intake/:id/reject
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn reject_intake(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(purchase_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/intake/{purchase_id}/reject"), None);

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized intake reject attempt");
        return unauthorized();
    }

    match db
        .transition_purchase(purchase_id, PurchaseStatus::Rejected)
        .await
    {
        Ok(purchase) => (
            StatusCode::OK,
            Json(json!({ "purchase_id": purchase.id, "status": purchase.status })),
        ),
        Err(err) => translate_error(err),
    }
}

/// Handler for a vendor-side cancellation before payment
///
/// # Endpoint: POST /intake/:id/cancel
pub(crate) async fn cancel_intake(
    State(db): State<DbClient>,
    Path(purchase_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/intake/{purchase_id}/cancel"), None);

    match db
        .transition_purchase(purchase_id, PurchaseStatus::Cancelled)
        .await
    {
        Ok(purchase) => (
            StatusCode::OK,
            Json(json!({ "purchase_id": purchase.id, "status": purchase.status })),
        ),
        Err(err) => translate_error(err),
    }
}
