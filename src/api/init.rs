use crate::db::DbClient;
use axum::{
    error_handling::HandleErrorLayer,
    http::{Method, StatusCode},
    routing::{get, post},
    BoxError, Router,
};
use std::time::Duration;
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::{handlers::*, index::index};

pub fn initialize_router(db: DbClient) -> Router {
    let error_handler = || {
        ServiceBuilder::new().layer(HandleErrorLayer::new(|err: BoxError| async move {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unhandled error: {}", err),
            )
        }))
    };

    let global_rate_limit = |req_per_sec: u64| {
        ServiceBuilder::new()
            .layer(error_handler())
            .layer(BufferLayer::new(1024))
            .layer(RateLimitLayer::new(req_per_sec, Duration::from_secs(1)))
    };

    let rate_limit_per_ip = |timeout: u64, limit: u32| {
        let config = Box::new(
            GovernorConfigBuilder::default()
                .per_second(timeout)
                .burst_size(limit)
                .use_headers()
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .unwrap(),
        );

        ServiceBuilder::new()
            .layer(error_handler())
            .layer(GovernorLayer {
                config: Box::leak(config),
            })
    };

    let cors = |method: Method| {
        ServiceBuilder::new().layer(CorsLayer::new().allow_methods(method).allow_origin(Any))
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Define routes with their rate limits
    Router::new()
        // Write routes (stricter rate limits)
        .route("/intake", post(create_intake))
        .route("/intake/:id/accept", post(accept_intake))
        .route("/intake/:id/reject", post(reject_intake))
        .route("/intake/:id/cancel", post(cancel_intake))
        .route("/inspections/:id/items", post(add_incoming_item))
        .route(
            "/inspections/:id/items/:item_id/verify",
            post(verify_incoming_item),
        )
        .route("/inspections/:id/close", post(close_inspection))
        .route("/purchases/:id/pricing/override", post(override_price))
        .route("/purchases/:id/complete", post(complete_purchase))
        .route("/quotes/:id/send", post(send_quote))
        .route("/catalog", post(create_catalog_item))
        .route("/catalog/:id/publish", post(publish_catalog_item))
        .route("/catalog/:id/enrich", post(enrich_catalog_item))
        .route("/bundles", post(create_bundle))
        .route("/consignment/:id/requests", post(create_change_request))
        .route(
            "/consignment/requests/:id/approve",
            post(approve_change_request),
        )
        .route(
            "/consignment/requests/:id/reject",
            post(reject_change_request),
        )
        .route("/sync/run", post(run_woocommerce_sync))
        .layer(
            global_rate_limit(100)
                .layer(rate_limit_per_ip(1, 100))
                .layer(cors(Method::POST))
                .layer(CompressionLayer::new().zstd(true)),
        )
        // The signed webhook carries its own authentication; no CORS needed
        .route("/webhooks/whatsapp", post(handle_whatsapp_webhook))
        .layer(
            global_rate_limit(100)
                .layer(rate_limit_per_ip(1, 100))
                .layer(CompressionLayer::new().zstd(true)),
        )
        // Read routes
        .route("/intake/:id", get(get_intake))
        .route("/inspections/:id", get(get_inspection))
        .route("/purchases/:id/pricing", get(get_pricing))
        .route("/catalog", get(get_catalog_page))
        .route("/catalog/drafts", get(get_catalog_list))
        .route("/catalog/:id", get(get_catalog_item_detail))
        .route("/catalog/:id/enrichment", get(get_enrichment))
        .route("/bundles/:id", get(get_bundle))
        .route("/sync/status", get(get_sync_status))
        .layer(
            global_rate_limit(10000)
                .layer(rate_limit_per_ip(1, 100))
                .layer(cors(Method::GET))
                .layer(CompressionLayer::new().zstd(true)),
        )
        // Base route
        .route("/", get(|| async { index() }))
        .route("/health", get(|| async { StatusCode::OK }))
        // Apply common middleware
        .layer(trace_layer)
        .with_state(db)
}
