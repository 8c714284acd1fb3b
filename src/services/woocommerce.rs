//! WooCommerce REST client: pushes published catalog items to the store
//! as products and keeps price/stock in step on re-publish.

use crate::db::models::CatalogItem;
use crate::errors::ApiError;
use crate::{Result, CONFIG};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct WooProduct {
    id: i64,
}

fn products_url(path: &str) -> String {
    format!(
        "{}/wp-json/wc/v3/{}",
        CONFIG.woocommerce_base_url.trim_end_matches('/'),
        path
    )
}

fn client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(Into::into)
}

fn product_body(item: &CatalogItem) -> serde_json::Value {
    json!({
        "name": item.title,
        "sku": item.sku,
        "type": "simple",
        "regular_price": item.list_price.to_string(),
        "description": item.description,
        "status": if item.published { "publish" } else { "draft" },
        "stock_quantity": 1,
        "manage_stock": true,
    })
}

/// Creates the product on the store and returns its WooCommerce id.
pub async fn create_product(item: &CatalogItem) -> Result<i64> {
    let response = client()?
        .post(products_url("products"))
        .query(&[
            ("consumer_key", CONFIG.woocommerce_consumer_key.as_str()),
            ("consumer_secret", CONFIG.woocommerce_consumer_secret.as_str()),
        ])
        .json(&product_body(item))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ApiError::Custom(format!(
            "WooCommerce create failed for {}: HTTP {}",
            item.sku,
            response.status()
        )));
    }

    let product: WooProduct = response.json().await?;
    info!("WooCommerce product {} created for {}", product.id, item.sku);
    Ok(product.id)
}

/// Updates price and publish state of an already-linked product.
pub async fn update_product(item: &CatalogItem, woo_id: i64) -> Result<()> {
    let response = client()?
        .put(products_url(&format!("products/{woo_id}")))
        .query(&[
            ("consumer_key", CONFIG.woocommerce_consumer_key.as_str()),
            ("consumer_secret", CONFIG.woocommerce_consumer_secret.as_str()),
        ])
        .json(&product_body(item))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ApiError::Custom(format!(
            "WooCommerce update failed for {}: HTTP {}",
            item.sku,
            response.status()
        )));
    }

    info!("WooCommerce product {} updated for {}", woo_id, item.sku);
    Ok(())
}

/// Push one item: create when unlinked, update when a woo id exists.
pub async fn push_item(item: &CatalogItem) -> Result<i64> {
    match item.woo_product_id {
        Some(woo_id) => {
            update_product(item, woo_id).await?;
            Ok(woo_id)
        }
        None => create_product(item).await,
    }
}
