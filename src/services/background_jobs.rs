//! Background jobs: periodic WooCommerce catalog sync plus a health
//! monitor that reports when the sync loop stops ticking.

use crate::db::models::{BackgroundJobHealth, SyncStatus};
use crate::db::DbClient;
use crate::services::woocommerce;
use crate::{Result, CONFIG};
use std::time::Duration;
use tokio::time;
use tracing::{error, info, warn};

const LAST_SYNC_CACHE_KEY: &str = "background_job:last_sync";
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(1800);

/// Background job manager for periodic tasks
pub struct BackgroundJobManager {
    db_client: DbClient,
}

impl BackgroundJobManager {
    /// Create a new background job manager
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Get background job health status
    pub async fn get_health_status(&self) -> BackgroundJobHealth {
        match self.get_last_sync_time().await {
            Ok(last_sync) => {
                let now = chrono::Utc::now().naive_utc();
                let since = now - last_sync;
                let expected =
                    chrono::Duration::seconds(CONFIG.catalog_sync_interval_seconds as i64);

                if since > expected * 2 {
                    BackgroundJobHealth {
                        status: "inactive".to_string(),
                        last_sync_run: Some(last_sync),
                        message: format!(
                            "Last catalog sync was {} seconds ago, expected interval is {} seconds",
                            since.num_seconds(),
                            CONFIG.catalog_sync_interval_seconds
                        ),
                    }
                } else {
                    BackgroundJobHealth {
                        status: "active".to_string(),
                        last_sync_run: Some(last_sync),
                        message: "Background jobs are running normally".to_string(),
                    }
                }
            }
            Err(_) => BackgroundJobHealth {
                status: "unknown".to_string(),
                last_sync_run: None,
                message: "No catalog sync has completed yet".to_string(),
            },
        }
    }

    async fn store_last_sync_time(&self) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();
        let timestamp_str = now.format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        self.db_client
            .set_cache(LAST_SYNC_CACHE_KEY, &timestamp_str)
            .await
    }

    async fn get_last_sync_time(&self) -> Result<chrono::NaiveDateTime> {
        let timestamp_str = self.db_client.get_cache(LAST_SYNC_CACHE_KEY).await?;
        chrono::NaiveDateTime::parse_from_str(&timestamp_str, "%Y-%m-%d %H:%M:%S%.3f").map_err(
            |e| crate::errors::ApiError::Custom(format!("Failed to parse timestamp: {e}")),
        )
    }

    /// Start all background jobs
    pub async fn start_all_jobs(&self) {
        info!("Starting background job manager");

        let db_client = self.db_client.clone();
        tokio::spawn(async move {
            catalog_sync_job(db_client).await;
        });

        let db_client_health = self.db_client.clone();
        tokio::spawn(async move {
            health_monitoring_job(db_client_health).await;
        });

        info!("All background jobs started successfully");
    }
}

/// Pushes every sync-pending catalog item to WooCommerce once.
/// Returns (pushed, failed); failures leave the item in `error` state and
/// are retried on the next tick.
pub async fn run_catalog_sync(db_client: &DbClient) -> Result<(usize, usize)> {
    let pending = db_client.get_items_pending_sync().await?;
    if pending.is_empty() {
        return Ok((0, 0));
    }

    info!("Catalog sync: {} items pending", pending.len());
    let mut pushed = 0;
    let mut failed = 0;

    for item in pending {
        match woocommerce::push_item(&item).await {
            Ok(woo_id) => {
                db_client
                    .set_sync_result(item.id, SyncStatus::Synced, Some(woo_id))
                    .await?;
                pushed += 1;
            }
            Err(err) => {
                error!("Catalog sync failed for {}: {}", item.sku, err);
                db_client
                    .set_sync_result(item.id, SyncStatus::Error, None)
                    .await?;
                failed += 1;
            }
        }
    }

    Ok((pushed, failed))
}

/// Background job that pushes pending catalog items on a fixed interval.
async fn catalog_sync_job(db_client: DbClient) {
    let mut interval = time::interval(Duration::from_secs(
        CONFIG.catalog_sync_interval_seconds,
    ));
    let manager = BackgroundJobManager::new(db_client.clone());

    info!(
        "Catalog sync job started with {}-second intervals",
        CONFIG.catalog_sync_interval_seconds
    );

    loop {
        interval.tick().await;

        match run_catalog_sync(&db_client).await {
            Ok((pushed, failed)) => {
                if pushed + failed > 0 {
                    info!("Catalog sync tick: {} pushed, {} failed", pushed, failed);
                }
                if let Err(err) = manager.store_last_sync_time().await {
                    warn!("Failed to record catalog sync timestamp: {}", err);
                }
            }
            Err(err) => error!("Catalog sync tick failed: {}", err),
        }
    }
}

/// Health monitoring job that periodically logs background job status
async fn health_monitoring_job(db_client: DbClient) {
    let mut interval = time::interval(HEALTH_CHECK_INTERVAL);
    let bg_manager = BackgroundJobManager::new(db_client);

    info!("Health monitoring job started with 30-minute intervals");

    loop {
        interval.tick().await;

        let health = bg_manager.get_health_status().await;
        match health.status.as_str() {
            "active" => info!("Background jobs health check: {}", health.message),
            "inactive" => warn!("Background jobs health check INACTIVE: {}", health.message),
            _ => warn!("Background jobs health check UNKNOWN: {}", health.message),
        }
    }
}
