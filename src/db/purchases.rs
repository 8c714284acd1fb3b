use super::DbClient;
use crate::db::models::{
    PendingItem, PendingPurchase, PurchaseDetailResponse, PurchaseStatus,
};
use crate::errors::ApiError;
use crate::Result;
use chrono::Utc;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl};
use diesel_async::RunQueryDsl;
use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

/// DbClient helper functions for the intake tables (pending_purchases, pending_items)
impl DbClient {
    pub async fn get_purchase(&self, purchase_uuid: Uuid) -> Result<PendingPurchase> {
        use crate::schema::pending_purchases::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        pending_purchases
            .filter(id.eq(purchase_uuid))
            .first::<PendingPurchase>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("Purchase {purchase_uuid} not found"))
                }
                other => other.into(),
            })
    }

    /// Purchase with vendor and offered items.
    pub async fn get_purchase_detail(&self, purchase_uuid: Uuid) -> Result<PurchaseDetailResponse> {
        let purchase = self.get_purchase(purchase_uuid).await?;
        let vendor = self.get_vendor(purchase.vendor_id).await?;
        let items = self.get_pending_items(purchase_uuid).await?;

        Ok(PurchaseDetailResponse {
            purchase,
            vendor,
            items,
        })
    }

    pub async fn get_pending_items(&self, purchase_uuid: Uuid) -> Result<Vec<PendingItem>> {
        use crate::schema::pending_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        pending_items
            .filter(purchase_id.eq(purchase_uuid))
            .order_by(created_at)
            .load::<PendingItem>(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn insert_purchase_with_items(
        &self,
        purchase: &PendingPurchase,
        items: &[PendingItem],
    ) -> Result<()> {
        let conn = &mut self.get_db_conn().await?;

        diesel::insert_into(crate::schema::pending_purchases::table)
            .values(purchase)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to insert purchase {}: {}", purchase.id, e);
                ApiError::from(e)
            })?;

        diesel::insert_into(crate::schema::pending_items::table)
            .values(items)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to insert items for purchase {}: {}", purchase.id, e);
                ApiError::from(e)
            })?;

        info!(
            "Recorded intake {} with {} items",
            purchase.id,
            items.len()
        );
        Ok(())
    }

    /// Moves a purchase to `next`, enforcing the lifecycle transition table.
    /// Returns the refreshed row; an illegal move is a Conflict.
    pub async fn transition_purchase(
        &self,
        purchase_uuid: Uuid,
        next: PurchaseStatus,
    ) -> Result<PendingPurchase> {
        use crate::schema::pending_purchases::dsl::*;

        let purchase = self.get_purchase(purchase_uuid).await?;
        let current = PurchaseStatus::try_from(purchase.status.as_str())?;

        if !current.can_transition_to(next) {
            return Err(ApiError::Conflict(format!(
                "Cannot move purchase {} from {} to {}",
                purchase_uuid,
                current.as_str(),
                next.as_str()
            )));
        }

        let conn = &mut self.get_db_conn().await?;
        diesel::update(pending_purchases)
            .filter(id.eq(purchase_uuid))
            // Guard on the previously read status so a concurrent transition loses
            .filter(status.eq(current.as_str()))
            .set((
                status.eq(String::from(next)),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .await
            .map_err(ApiError::from)
            .and_then(|affected| {
                if affected == 0 {
                    Err(ApiError::Conflict(format!(
                        "Purchase {purchase_uuid} was updated concurrently"
                    )))
                } else {
                    info!(
                        "Purchase {} moved {} -> {}",
                        purchase_uuid,
                        current.as_str(),
                        next.as_str()
                    );
                    Ok(())
                }
            })?;

        self.get_purchase(purchase_uuid).await
    }

    pub async fn set_quote_total(&self, purchase_uuid: Uuid, total: Decimal) -> Result<usize> {
        use crate::schema::pending_purchases::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::update(pending_purchases)
            .filter(id.eq(purchase_uuid))
            .set((
                quote_total.eq(Some(total)),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn mark_quote_sent(&self, purchase_uuid: Uuid) -> Result<usize> {
        use crate::schema::pending_purchases::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::update(pending_purchases)
            .filter(id.eq(purchase_uuid))
            .set((
                quote_sent_at.eq(Some(Utc::now().naive_utc())),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)
            .await
            .map_err(Into::into)
    }

    /// Purchases in the given status, oldest first. Used by the backfill bin.
    pub async fn get_purchases_by_status(
        &self,
        wanted: PurchaseStatus,
    ) -> Result<Vec<PendingPurchase>> {
        use crate::schema::pending_purchases::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        pending_purchases
            .filter(status.eq(wanted.as_str()))
            .order_by(created_at)
            .load::<PendingPurchase>(conn)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transition_missing_purchase_is_not_found() {
        dotenv::dotenv().ok();
        let db_url = std::env::var("TEST_DATABASE_URL").unwrap();
        let redis_url = std::env::var("TEST_REDIS_URL").unwrap();
        let client = DbClient::new(&db_url, &redis_url);

        let result = client
            .transition_purchase(Uuid::new_v4(), PurchaseStatus::Rejected)
            .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
