//! API request handlers for the reseller operations service.
//! Each module corresponds to a specific API endpoint or related group of endpoints.

// Intake and inspection handlers
pub mod inspections; // Inspection sessions and item verification
pub mod intake; // Vendor offers entering the pipeline
pub mod purchases; // Purchase completion

// Pricing and quoting handlers
pub mod pricing; // Snapshots and overrides
pub mod quotes; // WhatsApp quote delivery
pub mod webhook; // Signed quote-decision webhook

// Catalog handlers
pub mod bundles; // Multi-item bundles
pub mod catalog; // Catalog CRUD, publish, enrichment

// Consignment and sync handlers
pub mod consignment; // Vendor change requests
pub mod sync; // WooCommerce sync trigger and health

// Re-export handlers for easier access
pub(crate) use bundles::{create_bundle, get_bundle};
pub(crate) use catalog::{
    create_catalog_item, enrich_catalog_item, get_catalog_item_detail, get_catalog_list,
    get_catalog_page, get_enrichment, publish_catalog_item,
};
pub(crate) use consignment::{
    approve_change_request, create_change_request, reject_change_request,
};
pub(crate) use inspections::{
    add_incoming_item, close_inspection, get_inspection, verify_incoming_item,
};
pub(crate) use intake::{accept_intake, cancel_intake, create_intake, get_intake, reject_intake};
pub(crate) use pricing::{get_pricing, override_price};
pub(crate) use purchases::complete_purchase;
pub(crate) use quotes::send_quote;
pub(crate) use sync::{get_sync_status, run_woocommerce_sync};
pub(crate) use webhook::handle_whatsapp_webhook;

use crate::db::models::ErrorResponse;
use crate::errors::{ApiError, ErrorMessages};
use crate::CONFIG;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

/// Validates the authorization header against the configured secret
pub fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get("AUTHORIZATION")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|header_value| header_value == CONFIG.admin_api_key)
}

/// Standard JSON error body with the matching status code.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!(ErrorResponse::new(message))))
}

/// The 401 every admin route returns on a bad or missing header.
pub(crate) fn unauthorized() -> (StatusCode, Json<Value>) {
    error_response(
        StatusCode::UNAUTHORIZED,
        ErrorMessages::Unauthorized.to_string(),
    )
}

/// Maps an ApiError onto the conventional status code + JSON body.
/// Internal errors are logged and collapsed to a generic message.
pub(crate) fn translate_error(err: ApiError) -> (StatusCode, Json<Value>) {
    match err {
        ApiError::NotFound(message) => error_response(StatusCode::NOT_FOUND, message),
        ApiError::Validation(message) => error_response(StatusCode::BAD_REQUEST, message),
        ApiError::Conflict(message) => error_response(StatusCode::CONFLICT, message),
        ApiError::Diesel(_) | ApiError::DbPool(_) => {
            error!("Database error: {}", err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorMessages::Db.to_string(),
            )
        }
        other => {
            error!("Unhandled error: {}", other);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorMessages::Unexpected.to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_error_statuses() {
        let (status, _) = translate_error(ApiError::NotFound("x".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = translate_error(ApiError::Validation("x".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = translate_error(ApiError::Conflict("x".into()));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = translate_error(ApiError::Custom("x".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let (_, body) = translate_error(ApiError::Custom("secret detail".into()));
        assert!(!body.to_string().contains("secret detail"));
    }
}
