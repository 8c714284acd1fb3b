use crate::api::handlers::{error_response, is_authorized, translate_error, unauthorized};
use crate::db::models::{
    CatalogItem, CatalogPageResponse, EnrichmentResponse, NewCatalogItemParams,
};
use crate::db::DbClient;
use crate::logging::audit_request;
use crate::services::enrichment::{best_match, match_confidence, parse_lens_title, resolve_outcome};
use crate::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, to_value, Value};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    page: Option<i64>,
}

/// Handler for creating a catalog item by hand
///
/// # Endpoint: POST /catalog
///
/// Drafting from a completed purchase is the usual path; this one covers
/// walk-in stock that never went through intake.
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn create_catalog_item(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Json(payload): Json<NewCatalogItemParams>,
) -> (StatusCode, Json<Value>) {
    let payload_value = to_value(&payload).ok();
    audit_request("POST", "/catalog", payload_value.as_ref());

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized catalog create attempt");
        return unauthorized();
    }
    if let Err(message) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    let mut item = CatalogItem::new(
        &payload.sku,
        &payload.title,
        &payload.category,
        payload.list_price,
        payload.verified_item_id,
    );
    item.description = payload.description;

    match db.insert_catalog_item(&item).await {
        Ok(_) => (StatusCode::CREATED, Json(json!(item))),
        Err(err) => translate_error(err),
    }
}

/// Handler for retrieving a single catalog item
///
/// # Endpoint: GET /catalog/:id
pub(crate) async fn get_catalog_item_detail(
    State(db): State<DbClient>,
    Path(item_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    match db.get_catalog_item(item_id).await {
        Ok(item) => (StatusCode::OK, Json(json!(item))),
        Err(err) => translate_error(err),
    }
}

/// Handler for the public published-catalog page
///
/// # Endpoint: GET /catalog?page=N
///
/// Pages are cached in Redis for a minute; a cache failure falls back to
/// the database.
pub(crate) async fn get_catalog_page(
    State(db): State<DbClient>,
    Query(query): Query<PageQuery>,
) -> (StatusCode, Json<Value>) {
    let page = query.page.unwrap_or(1).max(1);
    let cache_key = format!("catalog:page:{page}");

    if let Ok(cached) = db.get_cache(&cache_key).await {
        if let Ok(value) = serde_json::from_str::<Value>(&cached) {
            return (StatusCode::OK, Json(value));
        }
    }

    let (items, total_count) = match db.get_catalog_page(page).await {
        Ok(result) => result,
        Err(err) => return translate_error(err),
    };
    let response = json!(CatalogPageResponse {
        items,
        page,
        total_count,
    });

    if let Err(err) = db.set_cache(&cache_key, &response.to_string()).await {
        warn!("Catalog page cache write failed: {}", err);
    }
    (StatusCode::OK, Json(response))
}

/// Handler for listing unpublished drafts
///
/// # Endpoint: GET /catalog/drafts
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn get_catalog_list(
    State(db): State<DbClient>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    match db.get_unpublished_items().await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))),
        Err(err) => translate_error(err),
    }
}

/// Handler for publishing a catalog item to the storefront
///
/// # Endpoint: POST /catalog/:id/publish
///
/// Marks the item published and queues it for the WooCommerce sync job.
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn publish_catalog_item(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/catalog/{item_id}/publish"), None);

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized catalog publish attempt");
        return unauthorized();
    }

    match db.publish_catalog_item(item_id).await {
        Ok(item) => (StatusCode::OK, Json(json!(item))),
        Err(err) => translate_error(err),
    }
}

/// Handler for running the lens-spec matcher on one catalog item
///
/// # Endpoint: POST /catalog/:id/enrich
///
/// A confident match is applied directly; a middling one is parked as
/// `needs_review` with the candidate spec recorded for a human to confirm.
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn enrich_catalog_item(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/catalog/{item_id}/enrich"), None);

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized catalog enrich attempt");
        return unauthorized();
    }

    match run_enrichment(&db, item_id).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(err) => translate_error(err),
    }
}

pub(crate) async fn run_enrichment(db: &DbClient, item_id: Uuid) -> Result<EnrichmentResponse> {
    let item = db.get_catalog_item(item_id).await?;
    let specs = db.get_all_lens_specs().await?;

    let (status, spec, confidence) = resolve_outcome(best_match(&item.title, &specs));

    db.set_enrichment_result(item_id, status, spec.as_ref().map(|s| s.id))
        .await?;
    info!(
        "Enrichment for {}: {} (confidence {:?})",
        item.sku,
        status.as_str(),
        confidence
    );

    Ok(EnrichmentResponse {
        catalog_item_id: item_id,
        enrichment_status: status.as_str().to_string(),
        matched_spec: spec,
        confidence,
    })
}

/// Handler for reading the enrichment state of a catalog item
///
/// # Endpoint: GET /catalog/:id/enrichment
pub(crate) async fn get_enrichment(
    State(db): State<DbClient>,
    Path(item_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    let item = match db.get_catalog_item(item_id).await {
        Ok(item) => item,
        Err(err) => return translate_error(err),
    };

    let (matched_spec, confidence) = match item.lens_spec_id {
        Some(spec_id) => match db.get_lens_spec(spec_id).await {
            Ok(spec) => {
                // Confidence is recomputed on read; the recorded spec may be
                // an applied match or a needs_review candidate
                let query = parse_lens_title(&item.title);
                let (confidence, _) = match_confidence(&query, &spec);
                (Some(spec), Some(confidence))
            }
            Err(err) => return translate_error(err),
        },
        None => (None, None),
    };

    (
        StatusCode::OK,
        Json(json!(EnrichmentResponse {
            catalog_item_id: item.id,
            enrichment_status: item.enrichment_status,
            matched_spec,
            confidence,
        })),
    )
}
