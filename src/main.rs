use axum::Server;
use gear_ops_api::{api, db, logging, services, validation, CONFIG};
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    // Initialize logging (stdout + rolling audit file)
    logging::setup_logging().expect("Failed to initialize logging");

    // Fail fast on malformed integration endpoints
    validation::validate_http_url(&CONFIG.woocommerce_base_url)
        .expect("WOOCOMMERCE_BASE_URL is not a valid http(s) URL");
    validation::validate_http_url(&CONFIG.kapso_base_url)
        .expect("KAPSO_BASE_URL is not a valid http(s) URL");

    // Initialize database and Redis connections
    let db_client = db::DbClient::new(&CONFIG.database_url, &CONFIG.redis_url);

    // Start background jobs
    let bg_job_manager = services::background_jobs::BackgroundJobManager::new(db_client.clone());

    // Log initial health status
    let initial_health = bg_job_manager.get_health_status().await;
    tracing::info!("Background job initial status: {:?}", initial_health);

    bg_job_manager.start_all_jobs().await;

    // Setup API router and start server
    let app = api::initialize_router(db_client);
    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    tracing::info!("Server starting on {}", addr);

    Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .unwrap();
}
