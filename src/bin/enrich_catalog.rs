//! Runs the lens-spec matcher over every catalog item still pending
//! enrichment. Confident matches are applied; middling ones are parked as
//! needs_review with the candidate recorded for a human pass.

use gear_ops_api::db::models::EnrichmentStatus;
use gear_ops_api::db::DbClient;
use gear_ops_api::services::enrichment::{best_match, resolve_outcome};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let db = DbClient::from_env();
    let items = db.get_items_pending_enrichment().await?;
    if items.is_empty() {
        info!("No catalog items pending enrichment");
        return Ok(());
    }

    let specs = db.get_all_lens_specs().await?;
    info!(
        "Enriching {} items against {} reference specs",
        items.len(),
        specs.len()
    );

    let mut matched = 0usize;
    let mut review = 0usize;
    let mut unmatched = 0usize;

    for item in items {
        let (status, spec, _) = resolve_outcome(best_match(&item.title, &specs));

        db.set_enrichment_result(item.id, status, spec.map(|s| s.id))
            .await?;
        match status {
            EnrichmentStatus::Matched => matched += 1,
            EnrichmentStatus::NeedsReview => review += 1,
            _ => unmatched += 1,
        }
        info!("{}: {}", item.sku, status.as_str());
    }

    info!(
        "Enrichment finished: {} matched, {} need review, {} no match",
        matched, review, unmatched
    );
    Ok(())
}
