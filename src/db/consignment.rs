use super::DbClient;
use crate::db::models::{ChangeRequestStatus, ConsignmentChangeRequest};
use crate::errors::ApiError;
use crate::Result;
use chrono::Utc;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl, OptionalExtension};
use diesel_async::RunQueryDsl;
use tracing::info;
use uuid::Uuid;

/// DbClient helper functions for consignment change requests
impl DbClient {
    pub async fn insert_change_request(&self, request: &ConsignmentChangeRequest) -> Result<usize> {
        use crate::schema::consignment_change_requests::dsl::*;

        // One open request per purchase at a time
        if self
            .get_pending_change_request(request.purchase_id)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "Purchase {} already has a pending change request",
                request.purchase_id
            )));
        }

        let conn = &mut self.get_db_conn().await?;
        let affected = diesel::insert_into(consignment_change_requests)
            .values(request)
            .execute(conn)
            .await?;
        info!(
            "Change request {} ({}) recorded for purchase {}",
            request.id, request.kind, request.purchase_id
        );
        Ok(affected)
    }

    pub async fn get_change_request(
        &self,
        request_uuid: Uuid,
    ) -> Result<ConsignmentChangeRequest> {
        use crate::schema::consignment_change_requests::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        consignment_change_requests
            .filter(id.eq(request_uuid))
            .first::<ConsignmentChangeRequest>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound(format!("Change request {request_uuid} not found"))
                }
                other => other.into(),
            })
    }

    pub async fn get_pending_change_request(
        &self,
        purchase_uuid: Uuid,
    ) -> Result<Option<ConsignmentChangeRequest>> {
        use crate::schema::consignment_change_requests::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        consignment_change_requests
            .filter(purchase_id.eq(purchase_uuid))
            .filter(status.eq(ChangeRequestStatus::Pending.as_str()))
            .first::<ConsignmentChangeRequest>(conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    /// Decides a pending request. Returns Conflict when it was already decided.
    pub async fn decide_change_request(
        &self,
        request_uuid: Uuid,
        decision: ChangeRequestStatus,
    ) -> Result<ConsignmentChangeRequest> {
        use crate::schema::consignment_change_requests::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        let affected = diesel::update(consignment_change_requests)
            .filter(id.eq(request_uuid))
            .filter(status.eq(ChangeRequestStatus::Pending.as_str()))
            .set((
                status.eq(String::from(decision)),
                decided_at.eq(Some(Utc::now().naive_utc())),
            ))
            .execute(conn)
            .await?;

        if affected == 0 {
            // Distinguish missing from already-decided for the response code
            let existing = self.get_change_request(request_uuid).await?;
            return Err(ApiError::Conflict(format!(
                "Change request {} was already {}",
                request_uuid, existing.status
            )));
        }

        self.get_change_request(request_uuid).await
    }
}
