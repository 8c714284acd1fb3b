use super::DbClient;
use crate::db::models::{PriceOverride, PricingResponse, PricingSnapshot};
use crate::errors::ApiError;
use crate::services::pricing::payout_for_list_total;
use crate::Result;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl, OptionalExtension};
use diesel_async::RunQueryDsl;
use tracing::{error, info};
use uuid::Uuid;

/// DbClient helper functions for pricing snapshots and overrides
impl DbClient {
    pub async fn insert_pricing_snapshot(&self, snapshot: &PricingSnapshot) -> Result<usize> {
        use crate::schema::pricing_snapshots::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(pricing_snapshots)
            .values(snapshot)
            .execute(conn)
            .await
            .map_err(|e| {
                error!(
                    "Failed to insert pricing snapshot for purchase {}: {}",
                    snapshot.purchase_id, e
                );
                e.into()
            })
    }

    pub async fn get_latest_snapshot(&self, purchase_uuid: Uuid) -> Result<PricingSnapshot> {
        use crate::schema::pricing_snapshots::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        pricing_snapshots
            .filter(purchase_id.eq(purchase_uuid))
            .order_by(created_at.desc())
            .first::<PricingSnapshot>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("No pricing snapshot for purchase {purchase_uuid}"))
                }
                other => other.into(),
            })
    }

    pub async fn has_snapshot(&self, purchase_uuid: Uuid) -> Result<bool> {
        use crate::schema::pricing_snapshots::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        let found: Option<Uuid> = pricing_snapshots
            .filter(purchase_id.eq(purchase_uuid))
            .select(id)
            .first::<Uuid>(conn)
            .await
            .optional()?;
        Ok(found.is_some())
    }

    pub async fn get_latest_override(&self, snapshot_uuid: Uuid) -> Result<Option<PriceOverride>> {
        use crate::schema::price_overrides::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        price_overrides
            .filter(snapshot_id.eq(snapshot_uuid))
            .order_by(created_at.desc())
            .first::<PriceOverride>(conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    pub async fn insert_price_override(&self, record: &PriceOverride) -> Result<usize> {
        use crate::schema::price_overrides::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        let affected = diesel::insert_into(price_overrides)
            .values(record)
            .execute(conn)
            .await?;
        info!(
            "Price override on snapshot {} by {}: {}",
            record.snapshot_id, record.overridden_by, record.list_total
        );
        Ok(affected)
    }

    /// Effective pricing for a purchase: the latest snapshot, with the payout
    /// recomputed from the override when one exists.
    pub async fn get_effective_pricing(&self, purchase_uuid: Uuid) -> Result<PricingResponse> {
        let snapshot = self.get_latest_snapshot(purchase_uuid).await?;
        let override_record = self.get_latest_override(snapshot.id).await?;

        let (effective_list_total, effective_payout_total) = match &override_record {
            Some(o) => (
                o.list_total,
                payout_for_list_total(o.list_total, snapshot.commission_rate),
            ),
            None => (snapshot.list_total, snapshot.payout_total),
        };

        Ok(PricingResponse {
            snapshot,
            override_record,
            effective_list_total,
            effective_payout_total,
        })
    }
}
