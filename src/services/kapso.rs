//! Kapso WhatsApp Business API client, used to send payout quotes to
//! vendors. Replies come back through the signed webhook.

use crate::db::models::{AcquisitionType, PendingPurchase, PricingSnapshot, Vendor};
use crate::errors::ApiError;
use crate::{Result, CONFIG};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Renders the quote text the vendor receives.
pub fn format_quote_message(
    vendor_name: &str,
    acquisition: AcquisitionType,
    snapshot: &PricingSnapshot,
) -> String {
    match acquisition {
        AcquisitionType::Consignment => format!(
            "Hi {vendor_name}! Your gear was inspected. We propose listing at {} with a payout of {} to you once sold ({}% commission). Reply ACCEPT to confirm or DECLINE to pass.",
            snapshot.list_total,
            snapshot.payout_total,
            snapshot.commission_rate * rust_decimal::Decimal::ONE_HUNDRED,
        ),
        AcquisitionType::Buyout => format!(
            "Hi {vendor_name}! Your gear was inspected. We offer a direct buyout of {}. Reply ACCEPT to confirm or DECLINE to pass.",
            snapshot.payout_total,
        ),
    }
}

/// Sends the quote over WhatsApp. The vendor must have a phone on file.
pub async fn send_quote(
    vendor: &Vendor,
    purchase: &PendingPurchase,
    snapshot: &PricingSnapshot,
) -> Result<()> {
    let Some(phone) = &vendor.whatsapp_phone else {
        return Err(ApiError::Validation(format!(
            "Vendor {} has no WhatsApp phone on file",
            vendor.id
        )));
    };

    let acquisition = AcquisitionType::try_from(purchase.acquisition_type.as_str())?;
    let message = format_quote_message(&vendor.name, acquisition, snapshot);

    let response = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?
        .post(format!(
            "{}/v1/messages",
            CONFIG.kapso_base_url.trim_end_matches('/')
        ))
        .header("X-Api-Key", &CONFIG.kapso_api_key)
        .json(&json!({
            "to": phone,
            "type": "text",
            "text": message,
            "metadata": { "purchase_id": purchase.id },
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ApiError::Custom(format!(
            "Kapso send failed for purchase {}: HTTP {}",
            purchase.id,
            response.status()
        )));
    }

    info!("Quote for purchase {} sent to {}", purchase.id, phone);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn snapshot() -> PricingSnapshot {
        PricingSnapshot {
            id: Uuid::new_v4(),
            purchase_id: Uuid::new_v4(),
            list_total: "1000.00".parse().unwrap(),
            payout_total: "750.00".parse().unwrap(),
            commission_rate: Decimal::new(25, 2),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_consignment_quote_mentions_commission() {
        let message =
            format_quote_message("Ana", AcquisitionType::Consignment, &snapshot());
        assert!(message.contains("1000.00"));
        assert!(message.contains("750.00"));
        assert!(message.contains("25"));
        assert!(message.contains("ACCEPT"));
    }

    #[test]
    fn test_buyout_quote_offers_payout_only() {
        let message = format_quote_message("Ana", AcquisitionType::Buyout, &snapshot());
        assert!(message.contains("750.00"));
        assert!(!message.contains("commission"));
    }
}
