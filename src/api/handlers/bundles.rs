use crate::api::handlers::{error_response, is_authorized, translate_error, unauthorized};
use crate::db::models::{Bundle, BundleMember, NewBundleParams};
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
use rust_decimal::Decimal;
use serde_json::{json, to_value, Value};
use tracing::{info, warn};
use uuid::Uuid;

/// Handler for creating a discounted multi-item bundle
///
/// # Endpoint: POST /bundles
///
/// Every member must be an existing catalog item, and the bundle price may
/// not exceed the sum of the members' list prices.
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn create_bundle(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Json(payload): Json<NewBundleParams>,
) -> (StatusCode, Json<Value>) {
    let payload_value = to_value(&payload).ok();
    audit_request("POST", "/bundles", payload_value.as_ref());

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized bundle create attempt");
        return unauthorized();
    }
    if let Err(message) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    match record_bundle(&db, &payload).await {
        Ok(bundle_id) => {
            match db.get_bundle_detail(bundle_id).await {
                Ok(detail) => (StatusCode::CREATED, Json(json!(detail))),
                Err(err) => translate_error(err),
            }
        }
        Err(err) => translate_error(err),
    }
}

async fn record_bundle(db: &DbClient, payload: &NewBundleParams) -> Result<Uuid> {
    let members = db.get_catalog_items(&payload.catalog_item_ids).await?;
    if members.len() != payload.catalog_item_ids.len() {
        return Err(ApiError::NotFound(
            "One or more bundle members do not exist".to_string(),
        ));
    }

    let members_total: Decimal = members.iter().map(|m| m.list_price).sum();
    if payload.bundle_price > members_total {
        return Err(ApiError::Validation(format!(
            "Bundle price {} exceeds members total {}",
            payload.bundle_price, members_total
        )));
    }

    let bundle = Bundle {
        id: Uuid::new_v4(),
        title: payload.title.clone(),
        bundle_price: payload.bundle_price,
        created_at: Utc::now().naive_utc(),
    };
    let member_rows: Vec<BundleMember> = payload
        .catalog_item_ids
        .iter()
        .map(|item_id| BundleMember {
            id: Uuid::new_v4(),
            bundle_id: bundle.id,
            catalog_item_id: *item_id,
        })
        .collect();

    db.insert_bundle(&bundle, &member_rows).await?;
    info!(
        "Bundle {} created with {} members at {}",
        bundle.id,
        member_rows.len(),
        bundle.bundle_price
    );
    Ok(bundle.id)
}

/// Handler for retrieving a bundle with its members
///
/// # Endpoint: GET /bundles/:id
pub(crate) async fn get_bundle(
    State(db): State<DbClient>,
    Path(bundle_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    match db.get_bundle_detail(bundle_id).await {
        Ok(detail) => (StatusCode::OK, Json(json!(detail))),
        Err(err) => translate_error(err),
    }
}
