use super::DbClient;
use crate::db::models::{
    IncomingGearItem, InspectedItemResponse, InspectionDetailResponse, InspectionSession,
    VerifiedGearItem,
};
use crate::errors::ApiError;
use crate::Result;
use chrono::Utc;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl, OptionalExtension};
use diesel_async::RunQueryDsl;
use tracing::{error, info};
use uuid::Uuid;

/// DbClient helper functions for inspection sessions and gear items
impl DbClient {
    pub async fn insert_inspection_session(&self, session: &InspectionSession) -> Result<usize> {
        use crate::schema::inspection_sessions::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(inspection_sessions)
            .values(session)
            .execute(conn)
            .await
            .map_err(|e| {
                error!("Failed to open inspection session: {}", e);
                e.into()
            })
    }

    pub async fn get_inspection_session(&self, session_uuid: Uuid) -> Result<InspectionSession> {
        use crate::schema::inspection_sessions::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        inspection_sessions
            .filter(id.eq(session_uuid))
            .first::<InspectionSession>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("Inspection session {session_uuid} not found"))
                }
                other => other.into(),
            })
    }

    /// Session detail: every incoming item with its verification, if any.
    pub async fn get_inspection_detail(
        &self,
        session_uuid: Uuid,
    ) -> Result<InspectionDetailResponse> {
        let session = self.get_inspection_session(session_uuid).await?;
        let items = self.get_incoming_items(session_uuid).await?;

        let mut inspected = Vec::with_capacity(items.len());
        for item in items {
            let verification = self.get_verification(item.id).await?;
            inspected.push(InspectedItemResponse { item, verification });
        }

        Ok(InspectionDetailResponse {
            session,
            items: inspected,
        })
    }

    pub async fn get_incoming_items(&self, session_uuid: Uuid) -> Result<Vec<IncomingGearItem>> {
        use crate::schema::incoming_gear_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        incoming_gear_items
            .filter(session_id.eq(session_uuid))
            .order_by(created_at)
            .load::<IncomingGearItem>(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_incoming_item(&self, item_uuid: Uuid) -> Result<IncomingGearItem> {
        use crate::schema::incoming_gear_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        incoming_gear_items
            .filter(id.eq(item_uuid))
            .first::<IncomingGearItem>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("Incoming item {item_uuid} not found"))
                }
                other => other.into(),
            })
    }

    pub async fn insert_incoming_item(&self, item: &IncomingGearItem) -> Result<usize> {
        use crate::schema::incoming_gear_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(incoming_gear_items)
            .values(item)
            .execute(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_verification(&self, item_uuid: Uuid) -> Result<Option<VerifiedGearItem>> {
        use crate::schema::verified_gear_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        verified_gear_items
            .filter(incoming_item_id.eq(item_uuid))
            .first::<VerifiedGearItem>(conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    /// Records a verification. The unique constraint on incoming_item_id makes
    /// a second verification of the same item surface as a Conflict.
    pub async fn insert_verification(&self, verification: &VerifiedGearItem) -> Result<usize> {
        use crate::schema::verified_gear_items::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(verified_gear_items)
            .values(verification)
            .execute(conn)
            .await
            .map_err(|e| {
                let api_err = ApiError::from(e);
                if api_err.is_unique_violation() {
                    ApiError::Conflict(format!(
                        "Item {} is already verified",
                        verification.incoming_item_id
                    ))
                } else {
                    error!("Failed to insert verification: {}", api_err);
                    api_err
                }
            })
    }

    pub async fn close_inspection_session(&self, session_uuid: Uuid) -> Result<usize> {
        use crate::schema::inspection_sessions::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        let affected = diesel::update(inspection_sessions)
            .filter(id.eq(session_uuid))
            .filter(status.eq("open"))
            .set((
                status.eq("closed"),
                closed_at.eq(Some(Utc::now().naive_utc())),
            ))
            .execute(conn)
            .await?;

        if affected == 0 {
            return Err(ApiError::Conflict(format!(
                "Session {session_uuid} is not open"
            )));
        }
        info!("Closed inspection session {}", session_uuid);
        Ok(affected)
    }

    /// Latest session for a purchase, used when closing computes the quote.
    pub async fn get_session_for_purchase(
        &self,
        purchase_uuid: Uuid,
    ) -> Result<InspectionSession> {
        use crate::schema::inspection_sessions::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        inspection_sessions
            .filter(purchase_id.eq(purchase_uuid))
            .order_by(opened_at.desc())
            .first::<InspectionSession>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ApiError::NotFound(format!(
                    "No inspection session for purchase {purchase_uuid}"
                )),
                other => other.into(),
            })
    }
}
