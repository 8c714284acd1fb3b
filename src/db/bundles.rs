use super::DbClient;
use crate::db::models::{Bundle, BundleDetailResponse, BundleMember};
use crate::errors::ApiError;
use crate::Result;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl};
use diesel_async::RunQueryDsl;
use rust_decimal::Decimal;
use tracing::error;
use uuid::Uuid;

/// DbClient helper functions for bundles and their members
impl DbClient {
    pub async fn insert_bundle(&self, bundle: &Bundle, members: &[BundleMember]) -> Result<()> {
        let conn = &mut self.get_db_conn().await?;

        diesel::insert_into(crate::schema::bundles::table)
            .values(bundle)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to insert bundle {}: {}", bundle.id, e);
                ApiError::from(e)
            })?;

        diesel::insert_into(crate::schema::bundle_members::table)
            .values(members)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to insert members for bundle {}: {}", bundle.id, e);
                ApiError::from(e)
            })?;

        Ok(())
    }

    pub async fn get_bundle_detail(&self, bundle_uuid: Uuid) -> Result<BundleDetailResponse> {
        use crate::schema::bundle_members::dsl as members_dsl;
        use crate::schema::bundles::dsl as bundles_dsl;

        let conn = &mut self.get_db_conn().await?;

        let bundle = bundles_dsl::bundles
            .filter(bundles_dsl::id.eq(bundle_uuid))
            .first::<Bundle>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("Bundle {bundle_uuid} not found"))
                }
                other => other.into(),
            })?;

        let member_ids: Vec<Uuid> = members_dsl::bundle_members
            .filter(members_dsl::bundle_id.eq(bundle_uuid))
            .select(members_dsl::catalog_item_id)
            .load::<Uuid>(conn)
            .await?;

        let members = self.get_catalog_items(&member_ids).await?;
        let members_list_total: Decimal = members.iter().map(|m| m.list_price).sum();

        Ok(BundleDetailResponse {
            bundle,
            members,
            members_list_total,
        })
    }
}
