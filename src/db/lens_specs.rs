use super::DbClient;
use crate::db::models::LensSpec;
use crate::errors::ApiError;
use crate::Result;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl, OptionalExtension};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

/// DbClient helper functions for the lens_specs reference table
impl DbClient {
    pub async fn get_lens_spec(&self, spec_uuid: Uuid) -> Result<LensSpec> {
        use crate::schema::lens_specs::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        lens_specs
            .filter(id.eq(spec_uuid))
            .first::<LensSpec>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("Lens spec {spec_uuid} not found"))
                }
                other => other.into(),
            })
    }

    pub async fn get_all_lens_specs(&self) -> Result<Vec<LensSpec>> {
        use crate::schema::lens_specs::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        lens_specs
            .order_by((maker, model))
            .load::<LensSpec>(conn)
            .await
            .map_err(Into::into)
    }

    /// Inserts a reference spec unless the (maker, model) pair is already
    /// present. Returns true when a row was written.
    pub async fn insert_lens_spec_if_new(&self, spec: &LensSpec) -> Result<bool> {
        use crate::schema::lens_specs::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        let existing: Option<Uuid> = lens_specs
            .filter(maker.eq(&spec.maker))
            .filter(model.eq(&spec.model))
            .select(id)
            .first::<Uuid>(conn)
            .await
            .optional()?;

        if existing.is_some() {
            return Ok(false);
        }

        diesel::insert_into(lens_specs)
            .values(spec)
            .execute(conn)
            .await?;
        Ok(true)
    }
}
