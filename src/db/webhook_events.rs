use super::DbClient;
use crate::db::models::{WebhookEvent, WebhookStatus};
use crate::Result;
use chrono::Utc;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl};
use diesel_async::RunQueryDsl;
use tracing::info;

/// DbClient helper functions for the webhook_events delivery log
impl DbClient {
    /// Records a webhook delivery. Returns false when the event_id was seen
    /// before: the unique constraint plus ON CONFLICT DO NOTHING makes the
    /// insert a no-op, which is the whole idempotency mechanism.
    pub async fn insert_webhook_event(&self, event: &WebhookEvent) -> Result<bool> {
        use crate::schema::webhook_events::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        let affected = diesel::insert_into(webhook_events)
            .values(event)
            .on_conflict(event_id)
            .do_nothing()
            .execute(conn)
            .await?;

        if affected == 0 {
            info!("Duplicate webhook delivery ignored: {}", event.event_id);
        }
        Ok(affected > 0)
    }

    pub async fn mark_webhook_event(
        &self,
        event_uid: &str,
        new_status: WebhookStatus,
        error_message: Option<&str>,
    ) -> Result<usize> {
        use crate::schema::webhook_events::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::update(webhook_events)
            .filter(event_id.eq(event_uid))
            .set((
                status.eq(String::from(new_status)),
                error.eq(error_message.map(ToOwned::to_owned)),
                processed_at.eq(Some(Utc::now().naive_utc())),
            ))
            .execute(conn)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_webhook_replay_is_a_noop() {
        dotenv::dotenv().ok();
        let db_url = std::env::var("TEST_DATABASE_URL").unwrap();
        let redis_url = std::env::var("TEST_REDIS_URL").unwrap();
        let client = DbClient::new(&db_url, &redis_url);

        let event = WebhookEvent::received(
            &format!("evt_{}", uuid::Uuid::new_v4()),
            "quote.accepted",
            serde_json::json!({"purchase_id": uuid::Uuid::new_v4()}),
        );

        let first = client.insert_webhook_event(&event).await.unwrap();
        let second = client.insert_webhook_event(&event).await.unwrap();
        assert!(first);
        assert!(!second);
    }
}
