use super::DbClient;
use crate::db::models::Vendor;
use crate::errors::ApiError;
use crate::Result;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl};
use diesel_async::RunQueryDsl;
use tracing::error;
use uuid::Uuid;

impl DbClient {
    pub async fn get_vendor(&self, vendor_uuid: Uuid) -> Result<Vendor> {
        use crate::schema::vendors::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        vendors
            .filter(id.eq(vendor_uuid))
            .first::<Vendor>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("Vendor {vendor_uuid} not found"))
                }
                other => other.into(),
            })
    }

    pub async fn insert_vendor(&self, vendor: &Vendor) -> Result<usize> {
        use crate::schema::vendors::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(vendors)
            .values(vendor)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to insert vendor {}: {}", vendor.id, e);
                e.into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_vendor_is_not_found() {
        dotenv::dotenv().ok();
        let db_url = std::env::var("TEST_DATABASE_URL").unwrap();
        let redis_url = std::env::var("TEST_REDIS_URL").unwrap();
        let client = DbClient::new(&db_url, &redis_url);

        let result = client.get_vendor(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
