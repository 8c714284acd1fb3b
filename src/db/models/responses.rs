use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    CatalogItem, IncomingGearItem, InspectionSession, LensSpec, PendingItem, PendingPurchase,
    PriceOverride, PricingSnapshot, Vendor, VerifiedGearItem,
};

/// Standard error body: `{ "error": <message> }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorResponse {
            error: message.into(),
        }
    }
}

/// Purchase with its vendor and offered items, as returned by GET /intake/:id.
#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseDetailResponse {
    pub purchase: PendingPurchase,
    pub vendor: Vendor,
    pub items: Vec<PendingItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntakeCreatedResponse {
    pub purchase_id: Uuid,
    pub vendor_id: Uuid,
    pub status: String,
    pub item_count: usize,
}

/// Session with incoming items and their verifications.
#[derive(Debug, Serialize, Deserialize)]
pub struct InspectionDetailResponse {
    pub session: InspectionSession,
    pub items: Vec<InspectedItemResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InspectedItemResponse {
    pub item: IncomingGearItem,
    pub verification: Option<VerifiedGearItem>,
}

/// Effective pricing for a purchase: latest snapshot plus any override.
#[derive(Debug, Serialize, Deserialize)]
pub struct PricingResponse {
    pub snapshot: PricingSnapshot,
    pub override_record: Option<PriceOverride>,
    pub effective_list_total: Decimal,
    pub effective_payout_total: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteSentResponse {
    pub purchase_id: Uuid,
    pub quote_total: Decimal,
    pub sent_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogPageResponse {
    pub items: Vec<CatalogItem>,
    pub page: i64,
    pub total_count: i64,
}

/// Enrichment state of a catalog item, with the matched spec when present.
#[derive(Debug, Serialize, Deserialize)]
pub struct EnrichmentResponse {
    pub catalog_item_id: Uuid,
    pub enrichment_status: String,
    pub matched_spec: Option<LensSpec>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BundleDetailResponse {
    pub bundle: super::Bundle,
    pub members: Vec<CatalogItem>,
    pub members_list_total: Decimal,
}

/// Background job health, surfaced by GET /sync/status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundJobHealth {
    pub status: String,
    pub last_sync_run: Option<NaiveDateTime>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncRunResponse {
    pub pushed: usize,
    pub failed: usize,
}
