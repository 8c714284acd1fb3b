//! Flags catalog drafts that duplicate an earlier item's title. Duplicates
//! keep the oldest row untouched; later unpublished rows get a -DUP sku
//! suffix so they stand out in the drafts list. Published items are never
//! modified.
//!
//! Dry-run by default; pass --apply to write the suffixes.

use gear_ops_api::db::DbClient;
use std::collections::HashMap;
use tracing::info;

/// Lowercased alphanumeric tokens, joined. Case and punctuation variants
/// of the same title collapse to one key.
const SKU_MAX_LEN: usize = 32;
const DUP_SUFFIX: &str = "-DUP";

/// Suffixed sku, truncating the base so the result still fits the column.
fn flagged_sku(sku: &str) -> String {
    let base_max = SKU_MAX_LEN - DUP_SUFFIX.len();
    let mut base = sku;
    if base.len() > base_max {
        let mut cut = base_max;
        while !base.is_char_boundary(cut) {
            cut -= 1;
        }
        base = &base[..cut];
    }
    format!("{base}{DUP_SUFFIX}")
}

fn normalize_title(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    let mut last_was_sep = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            key.push(' ');
            last_was_sep = true;
        }
    }
    key.trim_end().to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let apply = std::env::args().any(|arg| arg == "--apply");
    if !apply {
        info!("Dry run; pass --apply to write sku suffixes");
    }

    let db = DbClient::from_env();
    let mut drafts = db.get_unpublished_items().await?;
    drafts.sort_by_key(|item| item.created_at);

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut duplicates = 0usize;

    for item in &drafts {
        let key = normalize_title(&item.title);
        if key.is_empty() {
            continue;
        }
        match seen.get(&key) {
            None => {
                seen.insert(key, item.sku.clone());
            }
            Some(original_sku) => {
                duplicates += 1;
                if item.sku.ends_with(DUP_SUFFIX) {
                    info!("{} already flagged (duplicate of {})", item.sku, original_sku);
                    continue;
                }
                let new_sku = flagged_sku(&item.sku);
                if apply {
                    db.update_catalog_sku(item.id, &new_sku).await?;
                    info!(
                        "{} -> {} (duplicate of {})",
                        item.sku, new_sku, original_sku
                    );
                } else {
                    info!(
                        "would flag {} as {} (duplicate of {})",
                        item.sku, new_sku, original_sku
                    );
                }
            }
        }
    }

    info!(
        "Dedupe finished: {} drafts scanned, {} duplicates",
        drafts.len(),
        duplicates
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_collapses_variants() {
        assert_eq!(
            normalize_title("Canon EF 50mm f/1.8 II"),
            normalize_title("canon ef 50mm - f/1.8 (II)")
        );
        assert_ne!(
            normalize_title("Canon EF 50mm f/1.8"),
            normalize_title("Canon EF 50mm f/1.4")
        );
    }

    #[test]
    fn test_normalize_title_basic() {
        assert_eq!(normalize_title("  Nikon   FM2!! "), "nikon fm2");
        assert_eq!(normalize_title("***"), "");
    }

    #[test]
    fn test_flagged_sku_stays_within_column_width() {
        assert_eq!(flagged_sku("GEAR-1A2B3C4D"), "GEAR-1A2B3C4D-DUP");

        let long = "GEAR-".to_string() + &"X".repeat(27);
        assert_eq!(long.len(), SKU_MAX_LEN);
        let flagged = flagged_sku(&long);
        assert_eq!(flagged.len(), SKU_MAX_LEN);
        assert!(flagged.ends_with(DUP_SUFFIX));
    }
}
