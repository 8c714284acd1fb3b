use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{validate_phone, validate_price, validate_sku};

/// One offered item inside an intake request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeItemParams {
    /// Free-text description, e.g. "Canon EF 24-70mm f/2.8L II USM"
    pub description: String,
    /// Store category (camera, lens, accessory, ...)
    pub category: String,
    /// Vendor's asking price, if stated
    pub asking_price: Option<Decimal>,
}

/// Parameters for creating a pending purchase from a vendor offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeParams {
    /// Existing vendor id; mutually exclusive with `vendor`
    pub vendor_id: Option<Uuid>,
    /// Inline vendor details for first-time sellers
    pub vendor: Option<NewVendorParams>,
    /// "consignment" or "buyout"
    pub acquisition_type: String,
    /// Offered items, 1..=50
    pub items: Vec<IntakeItemParams>,
}

pub const MAX_INTAKE_ITEMS: usize = 50;

impl IntakeParams {
    /// Field-level validation shared by the handler and its tests.
    pub fn validate(&self) -> Result<(), String> {
        if self.vendor_id.is_none() && self.vendor.is_none() {
            return Err("Either vendor_id or vendor must be provided".to_string());
        }
        if self.vendor_id.is_some() && self.vendor.is_some() {
            return Err("vendor_id and vendor are mutually exclusive".to_string());
        }
        if let Some(vendor) = &self.vendor {
            vendor.validate()?;
        }
        if self.items.is_empty() {
            return Err("At least one item is required".to_string());
        }
        if self.items.len() > MAX_INTAKE_ITEMS {
            return Err(format!("At most {MAX_INTAKE_ITEMS} items per intake"));
        }
        for item in &self.items {
            if item.description.trim().is_empty() {
                return Err("Item description cannot be empty".to_string());
            }
            if item.category.trim().is_empty() {
                return Err("Item category cannot be empty".to_string());
            }
            if let Some(price) = item.asking_price {
                validate_price(price)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVendorParams {
    pub name: String,
    pub email: String,
    pub whatsapp_phone: Option<String>,
}

impl NewVendorParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Vendor name cannot be empty".to_string());
        }
        if !self.email.contains('@') || self.email.trim().is_empty() {
            return Err("Vendor email is invalid".to_string());
        }
        if let Some(phone) = &self.whatsapp_phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// Parameters for accepting an intake and opening an inspection session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptIntakeParams {
    pub inspector: String,
}

/// Parameters for registering an incoming gear item in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingItemParams {
    pub pending_item_id: Option<Uuid>,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

/// Parameters for verifying an incoming gear item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyItemParams {
    /// Condition grade a..d
    pub condition_grade: String,
    pub functional: bool,
    pub cosmetic_notes: Option<String>,
}

/// Parameters for a manual price override on a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOverrideParams {
    pub list_total: Decimal,
    pub overridden_by: String,
    pub reason: String,
}

impl PriceOverrideParams {
    pub fn validate(&self) -> Result<(), String> {
        validate_price(self.list_total)?;
        if self.list_total.is_zero() {
            return Err("Overridden list total must be positive".to_string());
        }
        if self.overridden_by.trim().is_empty() {
            return Err("overridden_by cannot be empty".to_string());
        }
        if self.reason.trim().is_empty() {
            return Err("A reason is required for a price override".to_string());
        }
        Ok(())
    }
}

/// Parameters for creating a catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCatalogItemParams {
    pub sku: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub list_price: Decimal,
    pub verified_item_id: Option<Uuid>,
}

impl NewCatalogItemParams {
    pub fn validate(&self) -> Result<(), String> {
        validate_sku(&self.sku)?;
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("Category cannot be empty".to_string());
        }
        validate_price(self.list_price)?;
        if self.list_price.is_zero() {
            return Err("List price must be positive".to_string());
        }
        Ok(())
    }
}

/// Parameters for creating a bundle of catalog items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBundleParams {
    pub title: String,
    pub bundle_price: Decimal,
    pub catalog_item_ids: Vec<Uuid>,
}

pub const MIN_BUNDLE_ITEMS: usize = 2;
pub const MAX_BUNDLE_ITEMS: usize = 10;

impl NewBundleParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Bundle title cannot be empty".to_string());
        }
        validate_price(self.bundle_price)?;
        if self.bundle_price.is_zero() {
            return Err("Bundle price must be positive".to_string());
        }
        if self.catalog_item_ids.len() < MIN_BUNDLE_ITEMS
            || self.catalog_item_ids.len() > MAX_BUNDLE_ITEMS
        {
            return Err(format!(
                "Bundles must have between {MIN_BUNDLE_ITEMS} and {MAX_BUNDLE_ITEMS} items"
            ));
        }
        let mut seen = self.catalog_item_ids.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.catalog_item_ids.len() {
            return Err("Bundle items must be distinct".to_string());
        }
        Ok(())
    }
}

/// Parameters for a vendor-side consignment change request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequestParams {
    pub requested_by: String,
    /// "price_change" or "withdrawal"
    pub kind: String,
    pub proposed_price: Option<Decimal>,
}

impl ChangeRequestParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.requested_by.trim().is_empty() {
            return Err("requested_by cannot be empty".to_string());
        }
        match self.kind.as_str() {
            "price_change" => {
                let Some(price) = self.proposed_price else {
                    return Err("price_change requests need a proposed_price".to_string());
                };
                validate_price(price)?;
                if price.is_zero() {
                    return Err("Proposed price must be positive".to_string());
                }
            }
            "withdrawal" => {
                if self.proposed_price.is_some() {
                    return Err("withdrawal requests must not carry a price".to_string());
                }
            }
            other => return Err(format!("Unknown change request kind: {other}")),
        }
        Ok(())
    }
}

/// Inbound Kapso webhook envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    pub event_id: String,
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Decoded quote-decision payload carried in `data` for quote.* events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDecisionData {
    pub purchase_id: Uuid,
    #[serde(default)]
    pub reply_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_intake() -> IntakeParams {
        IntakeParams {
            vendor_id: Some(Uuid::new_v4()),
            vendor: None,
            acquisition_type: "consignment".to_string(),
            items: vec![IntakeItemParams {
                description: "Nikon FM2 body".to_string(),
                category: "camera".to_string(),
                asking_price: Some(Decimal::new(25000, 2)),
            }],
        }
    }

    #[test]
    fn test_intake_validation_ok() {
        assert_eq!(base_intake().validate(), Ok(()));
    }

    #[test]
    fn test_intake_needs_a_vendor() {
        let mut params = base_intake();
        params.vendor_id = None;
        assert!(params.validate().is_err());

        params.vendor = Some(NewVendorParams {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            whatsapp_phone: Some("+5215512345678".to_string()),
        });
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_intake_rejects_vendor_and_vendor_id() {
        let mut params = base_intake();
        params.vendor = Some(NewVendorParams {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            whatsapp_phone: None,
        });
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_intake_item_bounds() {
        let mut params = base_intake();
        params.items.clear();
        assert!(params.validate().is_err());

        params.items = (0..51)
            .map(|i| IntakeItemParams {
                description: format!("item {i}"),
                category: "lens".to_string(),
                asking_price: None,
            })
            .collect();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_intake_rejects_negative_price() {
        let mut params = base_intake();
        params.items[0].asking_price = Some(Decimal::new(-100, 2));
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_bundle_validation() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ok = NewBundleParams {
            title: "Starter kit".to_string(),
            bundle_price: Decimal::new(50000, 2),
            catalog_item_ids: vec![a, b],
        };
        assert_eq!(ok.validate(), Ok(()));

        let dup = NewBundleParams {
            catalog_item_ids: vec![a, a],
            ..ok.clone()
        };
        assert!(dup.validate().is_err());

        let single = NewBundleParams {
            catalog_item_ids: vec![a],
            ..ok
        };
        assert!(single.validate().is_err());
    }

    #[test]
    fn test_change_request_validation() {
        let ok = ChangeRequestParams {
            requested_by: "vendor".to_string(),
            kind: "price_change".to_string(),
            proposed_price: Some(Decimal::new(90000, 2)),
        };
        assert_eq!(ok.validate(), Ok(()));

        let missing_price = ChangeRequestParams {
            proposed_price: None,
            ..ok.clone()
        };
        assert!(missing_price.validate().is_err());

        let withdrawal_with_price = ChangeRequestParams {
            kind: "withdrawal".to_string(),
            ..ok
        };
        assert!(withdrawal_with_price.validate().is_err());
    }
}
