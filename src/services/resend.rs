//! Resend transactional email client. Plain-text notifications only.

use crate::db::models::{PendingPurchase, Vendor};
use crate::errors::ApiError;
use crate::{Result, CONFIG};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;
use tracing::info;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Notifies the vendor that their purchase completed and the payout is on
/// its way.
pub async fn send_payout_confirmation(
    vendor: &Vendor,
    purchase: &PendingPurchase,
    payout_total: Decimal,
) -> Result<()> {
    let body = format!(
        "Hi {},\n\nYour purchase {} is complete. A payout of {} is being processed.\n\nThank you for selling with us.",
        vendor.name, purchase.id, payout_total
    );

    let response = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?
        .post(RESEND_ENDPOINT)
        .bearer_auth(&CONFIG.resend_api_key)
        .json(&json!({
            "from": CONFIG.notification_from_email,
            "to": [vendor.email],
            "subject": format!("Payout confirmation for purchase {}", purchase.id),
            "text": body,
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ApiError::Custom(format!(
            "Resend delivery failed for purchase {}: HTTP {}",
            purchase.id,
            response.status()
        )));
    }

    info!(
        "Payout confirmation for purchase {} emailed to {}",
        purchase.id, vendor.email
    );
    Ok(())
}
