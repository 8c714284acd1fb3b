use super::DbClient;
use crate::db::models::{CatalogItem, EnrichmentStatus, SyncStatus};
use crate::errors::ApiError;
use crate::Result;
use chrono::Utc;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl};
use diesel_async::RunQueryDsl;
use tracing::{error, info};
use uuid::Uuid;

pub const PER_PAGE: i64 = 20;

/// DbClient helper functions for the catalog_items table
impl DbClient {
    pub async fn insert_catalog_item(&self, item: &CatalogItem) -> Result<usize> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(catalog_items)
            .values(item)
            .execute(conn)
            .await
            .map_err(|e| {
                let api_err = ApiError::from(e);
                if api_err.is_unique_violation() {
                    ApiError::Conflict(format!("SKU {} already exists", item.sku))
                } else {
                    error!("Failed to insert catalog item {}: {}", item.sku, api_err);
                    api_err
                }
            })
    }

    pub async fn get_catalog_item(&self, item_uuid: Uuid) -> Result<CatalogItem> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        catalog_items
            .filter(id.eq(item_uuid))
            .first::<CatalogItem>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("Catalog item {item_uuid} not found"))
                }
                other => other.into(),
            })
    }

    pub async fn get_catalog_items(&self, item_uuids: &[Uuid]) -> Result<Vec<CatalogItem>> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        catalog_items
            .filter(id.eq_any(item_uuids))
            .load::<CatalogItem>(conn)
            .await
            .map_err(Into::into)
    }

    /// Page of published catalog items, newest first, with the total count.
    pub async fn get_catalog_page(&self, page: i64) -> Result<(Vec<CatalogItem>, i64)> {
        use crate::schema::catalog_items::dsl::*;

        let page = page.max(1);
        let offset = (page - 1) * PER_PAGE;
        let conn = &mut self.get_db_conn().await?;

        let total_count: i64 = catalog_items
            .filter(published.eq(true))
            .count()
            .get_result(conn)
            .await?;

        let items = catalog_items
            .filter(published.eq(true))
            .order_by(created_at.desc())
            .offset(offset)
            .limit(PER_PAGE)
            .load::<CatalogItem>(conn)
            .await?;

        Ok((items, total_count))
    }

    /// Marks an item published and queues it for the WooCommerce sync job.
    pub async fn publish_catalog_item(&self, item_uuid: Uuid) -> Result<CatalogItem> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        let affected = diesel::update(catalog_items)
            .filter(id.eq(item_uuid))
            .set((
                published.eq(true),
                sync_status.eq(String::from(SyncStatus::Pending)),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .await?;

        if affected == 0 {
            return Err(ApiError::NotFound(format!(
                "Catalog item {item_uuid} not found"
            )));
        }
        info!("Catalog item {} queued for WooCommerce sync", item_uuid);
        self.get_catalog_item(item_uuid).await
    }

    pub async fn set_sync_result(
        &self,
        item_uuid: Uuid,
        new_status: SyncStatus,
        woo_id: Option<i64>,
    ) -> Result<usize> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        match woo_id {
            Some(wid) => diesel::update(catalog_items)
                .filter(id.eq(item_uuid))
                .set((
                    sync_status.eq(String::from(new_status)),
                    woo_product_id.eq(Some(wid)),
                    updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .await
                .map_err(Into::into),
            None => diesel::update(catalog_items)
                .filter(id.eq(item_uuid))
                .set((
                    sync_status.eq(String::from(new_status)),
                    updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .await
                .map_err(Into::into),
        }
    }

    pub async fn get_items_pending_sync(&self) -> Result<Vec<CatalogItem>> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        catalog_items
            .filter(sync_status.eq(String::from(SyncStatus::Pending)))
            .order_by(updated_at)
            .load::<CatalogItem>(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_items_pending_enrichment(&self) -> Result<Vec<CatalogItem>> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        catalog_items
            .filter(enrichment_status.eq(String::from(EnrichmentStatus::Pending)))
            .order_by(created_at)
            .load::<CatalogItem>(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn set_enrichment_result(
        &self,
        item_uuid: Uuid,
        new_status: EnrichmentStatus,
        spec_uuid: Option<Uuid>,
    ) -> Result<usize> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::update(catalog_items)
            .filter(id.eq(item_uuid))
            .set((
                enrichment_status.eq(String::from(new_status)),
                lens_spec_id.eq(spec_uuid),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .await
            .map_err(Into::into)
    }

    /// All unpublished items, for the dedupe maintenance pass.
    pub async fn get_unpublished_items(&self) -> Result<Vec<CatalogItem>> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        catalog_items
            .filter(published.eq(false))
            .order_by(created_at)
            .load::<CatalogItem>(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn update_catalog_sku(&self, item_uuid: Uuid, new_sku: &str) -> Result<usize> {
        use crate::schema::catalog_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::update(catalog_items)
            .filter(id.eq(item_uuid))
            .set((sku.eq(new_sku), updated_at.eq(Utc::now().naive_utc())))
            .execute(conn)
            .await
            .map_err(Into::into)
    }
}
