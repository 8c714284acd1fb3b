use crate::api::handlers::{error_response, is_authorized, translate_error, unauthorized};
use crate::db::models::{
    AcquisitionType, ConditionGrade, IncomingGearItem, IncomingItemParams, VerifiedGearItem,
    VerifyItemParams,
};
use crate::db::DbClient;
use crate::errors::ApiError;
use crate::logging::audit_request;
use crate::services::pricing::PricedItem;
use crate::services::{compute_snapshot, kapso};
use crate::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

/// Handler for retrieving an inspection session with its items
///
/// # Endpoint: GET /inspections/:id
pub(crate) async fn get_inspection(
    State(db): State<DbClient>,
    Path(session_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    match db.get_inspection_detail(session_id).await {
        Ok(detail) => (StatusCode::OK, Json(json!(detail))),
        Err(err) => translate_error(err),
    }
}

/// Handler for registering an incoming gear item in an open session
///
/// # Endpoint: POST /inspections/:id/items
pub(crate) async fn add_incoming_item(
    State(db): State<DbClient>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<IncomingItemParams>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/inspections/{session_id}/items"), None);

    let session = match db.get_inspection_session(session_id).await {
        Ok(session) => session,
        Err(err) => return translate_error(err),
    };
    if session.status != "open" {
        return error_response(
            StatusCode::CONFLICT,
            format!("Session {session_id} is closed"),
        );
    }

    let item = IncomingGearItem {
        id: Uuid::new_v4(),
        session_id,
        pending_item_id: payload.pending_item_id,
        serial_number: payload.serial_number,
        notes: payload.notes,
        created_at: Utc::now().naive_utc(),
    };

    match db.insert_incoming_item(&item).await {
        Ok(_) => (StatusCode::CREATED, Json(json!(item))),
        Err(err) => translate_error(err),
    }
}

/// Handler for recording the condition verification of an incoming item
///
/// # Endpoint: POST /inspections/:id/items/:item_id/verify
///
/// Each incoming item can be verified exactly once; a repeat is a 409.
pub(crate) async fn verify_incoming_item(
    State(db): State<DbClient>,
    Path((session_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<VerifyItemParams>,
) -> (StatusCode, Json<Value>) {
    audit_request(
        "POST",
        &format!("/inspections/{session_id}/items/{item_id}/verify"),
        None,
    );

    let grade = match ConditionGrade::try_from(payload.condition_grade.as_str()) {
        Ok(grade) => grade,
        Err(_) => {
            return error_response(StatusCode::BAD_REQUEST, "condition_grade must be a, b, c or d")
        }
    };

    let item = match db.get_incoming_item(item_id).await {
        Ok(item) => item,
        Err(err) => return translate_error(err),
    };
    if item.session_id != session_id {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Item {item_id} does not belong to session {session_id}"),
        );
    }

    let verification = VerifiedGearItem {
        id: Uuid::new_v4(),
        incoming_item_id: item_id,
        condition_grade: grade.into(),
        functional: payload.functional,
        cosmetic_notes: payload.cosmetic_notes,
        verified_at: Utc::now().naive_utc(),
    };

    match db.insert_verification(&verification).await {
        Ok(_) => (StatusCode::CREATED, Json(json!(verification))),
        Err(err) => translate_error(err),
    }
}

/// Handler for closing an inspection session
///
/// # Endpoint: POST /inspections/:id/close
///
/// Requires every incoming item to be verified. Closing computes the pricing
/// snapshot, stores the quote total on the purchase, and sends the WhatsApp
/// quote. The send is best effort: a delivery failure leaves the session
/// closed and the quote unsent.
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn close_inspection(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/inspections/{session_id}/close"), None);

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized inspection close attempt");
        return unauthorized();
    }

    match close_and_quote(&db, session_id).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(err) => translate_error(err),
    }
}

async fn close_and_quote(db: &DbClient, session_id: Uuid) -> Result<Value> {
    let detail = db.get_inspection_detail(session_id).await?;

    if detail.items.is_empty() {
        return Err(ApiError::Conflict(format!(
            "Session {session_id} has no items to price"
        )));
    }
    let unverified: Vec<Uuid> = detail
        .items
        .iter()
        .filter(|entry| entry.verification.is_none())
        .map(|entry| entry.item.id)
        .collect();
    if !unverified.is_empty() {
        return Err(ApiError::Conflict(format!(
            "Session {session_id} has {} unverified items",
            unverified.len()
        )));
    }

    let purchase = db.get_purchase(detail.session.purchase_id).await?;
    let acquisition = AcquisitionType::try_from(purchase.acquisition_type.as_str())?;

    // Pair each verification with the asking price of the linked offer item
    let mut priced = Vec::with_capacity(detail.items.len());
    for entry in &detail.items {
        let Some(verification) = entry.verification.as_ref() else {
            continue;
        };
        let asking_price = match entry.item.pending_item_id {
            Some(_) => db
                .get_pending_items(purchase.id)
                .await?
                .into_iter()
                .find(|p| Some(p.id) == entry.item.pending_item_id)
                .and_then(|p| p.asking_price),
            None => None,
        };
        priced.push(PricedItem {
            asking_price,
            grade: ConditionGrade::try_from(verification.condition_grade.as_str())?,
            functional: verification.functional,
        });
    }

    db.close_inspection_session(session_id).await?;

    let snapshot = compute_snapshot(purchase.id, acquisition, &priced);
    db.insert_pricing_snapshot(&snapshot).await?;
    db.set_quote_total(purchase.id, snapshot.payout_total).await?;

    // Best-effort quote delivery; /quotes/:id/send can retry it
    let vendor = db.get_vendor(purchase.vendor_id).await?;
    let quote_sent = match kapso::send_quote(&vendor, &purchase, &snapshot).await {
        Ok(()) => {
            db.mark_quote_sent(purchase.id).await?;
            true
        }
        Err(err) => {
            warn!(
                "Quote for purchase {} could not be sent: {}",
                purchase.id, err
            );
            false
        }
    };

    info!(
        "Session {} closed, purchase {} quoted at {}",
        session_id, purchase.id, snapshot.payout_total
    );
    Ok(json!({
        "session_id": session_id,
        "purchase_id": purchase.id,
        "list_total": snapshot.list_total,
        "payout_total": snapshot.payout_total,
        "commission_rate": snapshot.commission_rate,
        "quote_sent": quote_sent,
    }))
}
