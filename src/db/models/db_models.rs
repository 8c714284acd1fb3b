use crate::schema::{
    bundle_members, bundles, catalog_items, consignment_change_requests, incoming_gear_items,
    inspection_sessions, lens_specs, pending_items, pending_purchases, price_overrides,
    pricing_snapshots, vendors, verified_gear_items, webhook_events,
};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    AcquisitionType, ChangeRequestKind, ChangeRequestStatus, EnrichmentStatus, IntakeItemParams,
    PurchaseStatus, SyncStatus, WebhookStatus,
};

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = vendors, primary_key(id))]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub whatsapp_phone: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = pending_purchases, primary_key(id))]
pub struct PendingPurchase {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub acquisition_type: String,
    pub status: String,
    pub quote_total: Option<Decimal>,
    pub quote_sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PendingPurchase {
    pub fn new(vendor_id: Uuid, acquisition_type: AcquisitionType) -> Self {
        let now = Utc::now().naive_utc();
        PendingPurchase {
            id: Uuid::new_v4(),
            vendor_id,
            acquisition_type: acquisition_type.into(),
            status: PurchaseStatus::PendingReview.into(),
            quote_total: None,
            quote_sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = pending_items, primary_key(id))]
pub struct PendingItem {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub description: String,
    pub category: String,
    pub asking_price: Option<Decimal>,
    pub created_at: NaiveDateTime,
}

impl PendingItem {
    pub fn from_params(purchase_id: Uuid, params: &IntakeItemParams) -> Self {
        PendingItem {
            id: Uuid::new_v4(),
            purchase_id,
            description: params.description.clone(),
            category: params.category.clone(),
            asking_price: params.asking_price,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = inspection_sessions, primary_key(id))]
pub struct InspectionSession {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub inspector: String,
    pub status: String,
    pub opened_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

impl InspectionSession {
    pub fn open(purchase_id: Uuid, inspector: &str) -> Self {
        InspectionSession {
            id: Uuid::new_v4(),
            purchase_id,
            inspector: inspector.to_string(),
            status: "open".to_string(),
            opened_at: Utc::now().naive_utc(),
            closed_at: None,
        }
    }
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = incoming_gear_items, primary_key(id))]
pub struct IncomingGearItem {
    pub id: Uuid,
    pub session_id: Uuid,
    pub pending_item_id: Option<Uuid>,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = verified_gear_items, primary_key(id))]
pub struct VerifiedGearItem {
    pub id: Uuid,
    pub incoming_item_id: Uuid,
    pub condition_grade: String,
    pub functional: bool,
    pub cosmetic_notes: Option<String>,
    pub verified_at: NaiveDateTime,
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = pricing_snapshots, primary_key(id))]
pub struct PricingSnapshot {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub list_total: Decimal,
    pub payout_total: Decimal,
    pub commission_rate: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = price_overrides, primary_key(id))]
pub struct PriceOverride {
    pub id: Uuid,
    pub snapshot_id: Uuid,
    pub overridden_by: String,
    pub list_total: Decimal,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = catalog_items, primary_key(id))]
pub struct CatalogItem {
    pub id: Uuid,
    pub sku: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub list_price: Decimal,
    pub verified_item_id: Option<Uuid>,
    pub woo_product_id: Option<i64>,
    pub sync_status: String,
    pub enrichment_status: String,
    pub lens_spec_id: Option<Uuid>,
    pub published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CatalogItem {
    pub fn new(
        sku: &str,
        title: &str,
        category: &str,
        list_price: Decimal,
        verified_item_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        CatalogItem {
            id: Uuid::new_v4(),
            sku: sku.to_string(),
            title: title.to_string(),
            description: None,
            category: category.to_string(),
            list_price,
            verified_item_id,
            woo_product_id: None,
            sync_status: SyncStatus::NotSynced.into(),
            enrichment_status: EnrichmentStatus::Pending.into(),
            lens_spec_id: None,
            published: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = bundles, primary_key(id))]
pub struct Bundle {
    pub id: Uuid,
    pub title: String,
    pub bundle_price: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = bundle_members, primary_key(id))]
pub struct BundleMember {
    pub id: Uuid,
    pub bundle_id: Uuid,
    pub catalog_item_id: Uuid,
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = consignment_change_requests, primary_key(id))]
pub struct ConsignmentChangeRequest {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub requested_by: String,
    pub kind: String,
    pub proposed_price: Option<Decimal>,
    pub status: String,
    pub decided_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl ConsignmentChangeRequest {
    pub fn new(
        purchase_id: Uuid,
        requested_by: &str,
        kind: ChangeRequestKind,
        proposed_price: Option<Decimal>,
    ) -> Self {
        ConsignmentChangeRequest {
            id: Uuid::new_v4(),
            purchase_id,
            requested_by: requested_by.to_string(),
            kind: kind.into(),
            proposed_price,
            status: ChangeRequestStatus::Pending.into(),
            decided_at: None,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = webhook_events, primary_key(id))]
pub struct WebhookEvent {
    pub id: Uuid,
    pub event_id: String,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub error: Option<String>,
    pub received_at: NaiveDateTime,
    pub processed_at: Option<NaiveDateTime>,
}

impl WebhookEvent {
    pub fn received(event_id: &str, event_type: &str, payload: serde_json::Value) -> Self {
        WebhookEvent {
            id: Uuid::new_v4(),
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            payload,
            status: WebhookStatus::Received.into(),
            error: None,
            received_at: Utc::now().naive_utc(),
            processed_at: None,
        }
    }
}

#[derive(
    Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable, AsChangeset,
)]
#[diesel(table_name = lens_specs, primary_key(id))]
pub struct LensSpec {
    pub id: Uuid,
    pub maker: String,
    pub model: String,
    pub mount: Option<String>,
    pub focal_min: Option<f64>,
    pub focal_max: Option<f64>,
    pub aperture: Option<f64>,
    pub source: String,
    pub created_at: NaiveDateTime,
}
