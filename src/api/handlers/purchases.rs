use crate::api::handlers::{is_authorized, translate_error, unauthorized};
use crate::db::models::{CatalogItem, ConditionGrade, PurchaseStatus};
use crate::db::DbClient;
use crate::logging::audit_request;
use crate::services::pricing::{suggested_item_price, PricedItem};
use crate::services::resend;
use crate::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

/// Handler for completing a purchase after the vendor accepted the quote
///
/// # Endpoint: POST /purchases/:id/complete
///
/// Moves the purchase to `completed`, emails the payout confirmation and
/// drafts one unpublished catalog item per verified gear item. The email is
/// best effort; a delivery failure does not roll back completion.
///
/// # Security
/// Requires valid authorization header matching CONFIG.admin_api_key
pub(crate) async fn complete_purchase(
    State(db): State<DbClient>,
    headers: HeaderMap,
    Path(purchase_id): Path<Uuid>,
) -> (StatusCode, Json<Value>) {
    audit_request("POST", &format!("/purchases/{purchase_id}/complete"), None);

    if !is_authorized(&headers) {
        warn!(target: "audit_log", "Unauthorized purchase complete attempt");
        return unauthorized();
    }

    match complete_and_draft(&db, purchase_id).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(err) => translate_error(err),
    }
}

async fn complete_and_draft(db: &DbClient, purchase_id: Uuid) -> Result<Value> {
    let purchase = db
        .transition_purchase(purchase_id, PurchaseStatus::Completed)
        .await?;
    let pricing = db.get_effective_pricing(purchase_id).await?;

    let vendor = db.get_vendor(purchase.vendor_id).await?;
    let payout_emailed = match resend::send_payout_confirmation(
        &vendor,
        &purchase,
        pricing.effective_payout_total,
    )
    .await
    {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "Payout confirmation for purchase {} not delivered: {}",
                purchase_id, err
            );
            false
        }
    };

    let drafted = draft_catalog_items(db, purchase_id).await?;

    info!(
        "Purchase {} completed, {} catalog drafts created",
        purchase_id,
        drafted.len()
    );
    Ok(json!({
        "purchase_id": purchase_id,
        "status": purchase.status,
        "payout_total": pricing.effective_payout_total,
        "payout_emailed": payout_emailed,
        "catalog_item_ids": drafted,
    }))
}

/// One unpublished catalog draft per verified item, priced individually.
async fn draft_catalog_items(db: &DbClient, purchase_id: Uuid) -> Result<Vec<Uuid>> {
    let session = db.get_session_for_purchase(purchase_id).await?;
    let detail = db.get_inspection_detail(session.id).await?;
    let offered = db.get_pending_items(purchase_id).await?;

    let mut drafted = Vec::new();
    for entry in &detail.items {
        let Some(verification) = entry.verification.as_ref() else {
            continue;
        };

        let pending = entry
            .item
            .pending_item_id
            .and_then(|pid| offered.iter().find(|p| p.id == pid));
        let (title, category, asking_price) = match pending {
            Some(p) => (p.description.clone(), p.category.clone(), p.asking_price),
            None => (
                entry
                    .item
                    .serial_number
                    .clone()
                    .map(|s| format!("Unlisted item {s}"))
                    .unwrap_or_else(|| "Unlisted item".to_string()),
                "uncategorized".to_string(),
                None,
            ),
        };

        let priced = PricedItem {
            asking_price,
            grade: ConditionGrade::try_from(verification.condition_grade.as_str())?,
            functional: verification.functional,
        };

        let sku = generate_sku();
        let mut item = CatalogItem::new(
            &sku,
            &title,
            &category,
            suggested_item_price(&priced),
            Some(verification.id),
        );
        item.description = entry.item.notes.clone();

        db.insert_catalog_item(&item).await?;
        drafted.push(item.id);
    }

    Ok(drafted)
}

/// SKUs look like GEAR-9F3A2C1B: uppercase hex from a fresh uuid.
fn generate_sku() -> String {
    let raw = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("GEAR-{}", &raw[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_sku;

    #[test]
    fn test_generated_skus_are_valid_and_unique() {
        let a = generate_sku();
        let b = generate_sku();
        assert!(a.starts_with("GEAR-"));
        assert_eq!(a.len(), 13);
        assert_ne!(a, b);
        assert_eq!(validate_sku(&a), Ok(()));
    }
}
