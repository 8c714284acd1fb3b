//! Creates missing pricing snapshots for historic purchases. Rows imported
//! before snapshots existed can be in awaiting_payment or completed with no
//! pricing attached; this pass recomputes them from the stored
//! verifications.

use gear_ops_api::db::models::{AcquisitionType, ConditionGrade, PurchaseStatus};
use gear_ops_api::db::DbClient;
use gear_ops_api::services::pricing::{compute_snapshot, PricedItem};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let db = DbClient::from_env();
    let mut candidates = db
        .get_purchases_by_status(PurchaseStatus::AwaitingPayment)
        .await?;
    candidates.extend(db.get_purchases_by_status(PurchaseStatus::Completed).await?);

    let mut created = 0usize;
    let mut skipped = 0usize;

    for purchase in candidates {
        if db.has_snapshot(purchase.id).await? {
            skipped += 1;
            continue;
        }

        let session = match db.get_session_for_purchase(purchase.id).await {
            Ok(session) => session,
            Err(err) => {
                warn!("Purchase {} has no inspection session: {}", purchase.id, err);
                continue;
            }
        };
        let detail = db.get_inspection_detail(session.id).await?;
        let offered = db.get_pending_items(purchase.id).await?;

        let mut priced = Vec::new();
        for entry in &detail.items {
            let Some(verification) = entry.verification.as_ref() else {
                continue;
            };
            let asking_price = entry
                .item
                .pending_item_id
                .and_then(|pid| offered.iter().find(|p| p.id == pid))
                .and_then(|p| p.asking_price);
            priced.push(PricedItem {
                asking_price,
                grade: ConditionGrade::try_from(verification.condition_grade.as_str())?,
                functional: verification.functional,
            });
        }
        if priced.is_empty() {
            warn!(
                "Purchase {} has no verified items, snapshot not created",
                purchase.id
            );
            continue;
        }

        let acquisition = AcquisitionType::try_from(purchase.acquisition_type.as_str())?;
        let snapshot = compute_snapshot(purchase.id, acquisition, &priced);
        db.insert_pricing_snapshot(&snapshot).await?;
        if purchase.quote_total.is_none() {
            db.set_quote_total(purchase.id, snapshot.payout_total).await?;
        }
        info!(
            "Snapshot backfilled for purchase {}: list {} payout {}",
            purchase.id, snapshot.list_total, snapshot.payout_total
        );
        created += 1;
    }

    info!(
        "Backfill finished: {} snapshots created, {} already priced",
        created, skipped
    );
    Ok(())
}
