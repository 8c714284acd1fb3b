//! Deterministic pricing rules: condition-grade factors on the vendor's
//! asking prices, tiered consignment commissions, and a flat buyout margin.
//! All arithmetic is Decimal with half-up rounding to cents.

use crate::db::models::{AcquisitionType, ConditionGrade, PricingSnapshot};
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

/// Contribution of an item whose vendor stated no asking price.
const NO_ASKING_PRICE_FLOOR: Decimal = Decimal::from_parts(2500, 0, 0, false, 2);

/// Flat store margin on buyout purchases.
const BUYOUT_MARGIN: Decimal = Decimal::from_parts(35, 0, 0, false, 2);

/// Consignment tier boundaries and rates.
const TIER_MID: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
const TIER_HIGH: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);
const RATE_LOW: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
const RATE_MID: Decimal = Decimal::from_parts(25, 0, 0, false, 2);
const RATE_HIGH: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// One verified item as the pricer sees it.
#[derive(Debug, Clone)]
pub struct PricedItem {
    pub asking_price: Option<Decimal>,
    pub grade: ConditionGrade,
    pub functional: bool,
}

/// Multiplier applied to the asking price for a condition grade.
pub fn grade_factor(grade: ConditionGrade) -> Decimal {
    match grade {
        ConditionGrade::A => Decimal::ONE,
        ConditionGrade::B => Decimal::new(85, 2),
        ConditionGrade::C => Decimal::new(70, 2),
        ConditionGrade::D => Decimal::new(50, 2),
    }
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Suggested list total over the verified items. Non-functional items are
/// halved on top of their grade factor; items without an asking price
/// contribute the flat floor.
pub fn suggested_list_total(items: &[PricedItem]) -> Decimal {
    let total = items
        .iter()
        .map(|item| match item.asking_price {
            Some(asking) => {
                let mut value = asking * grade_factor(item.grade);
                if !item.functional {
                    value /= Decimal::TWO;
                }
                value
            }
            None => NO_ASKING_PRICE_FLOOR,
        })
        .sum();
    round_cents(total)
}

/// Suggested list price for a single item, used when drafting catalog
/// entries from a completed purchase.
pub fn suggested_item_price(item: &PricedItem) -> Decimal {
    suggested_list_total(std::slice::from_ref(item))
}

/// Commission rate for a purchase: tiered for consignment, flat for buyout.
pub fn commission_rate(acquisition: AcquisitionType, list_total: Decimal) -> Decimal {
    match acquisition {
        AcquisitionType::Buyout => BUYOUT_MARGIN,
        AcquisitionType::Consignment => {
            if list_total >= TIER_HIGH {
                RATE_HIGH
            } else if list_total >= TIER_MID {
                RATE_MID
            } else {
                RATE_LOW
            }
        }
    }
}

/// Vendor payout for a list total at a given commission rate.
pub fn payout_for_list_total(list_total: Decimal, rate: Decimal) -> Decimal {
    round_cents(list_total * (Decimal::ONE - rate))
}

/// Builds the pricing snapshot for a purchase from its verified items.
pub fn compute_snapshot(
    purchase_id: Uuid,
    acquisition: AcquisitionType,
    items: &[PricedItem],
) -> PricingSnapshot {
    let list_total = suggested_list_total(items);
    let rate = commission_rate(acquisition, list_total);

    PricingSnapshot {
        id: Uuid::new_v4(),
        purchase_id,
        list_total,
        payout_total: payout_for_list_total(list_total, rate),
        commission_rate: rate,
        created_at: Utc::now().naive_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(asking: Option<&str>, grade: ConditionGrade, functional: bool) -> PricedItem {
        PricedItem {
            asking_price: asking.map(|a| a.parse().unwrap()),
            grade,
            functional,
        }
    }

    #[test]
    fn test_grade_factors() {
        assert_eq!(grade_factor(ConditionGrade::A), Decimal::ONE);
        assert_eq!(grade_factor(ConditionGrade::B), Decimal::new(85, 2));
        assert_eq!(grade_factor(ConditionGrade::C), Decimal::new(70, 2));
        assert_eq!(grade_factor(ConditionGrade::D), Decimal::new(50, 2));
    }

    #[test]
    fn test_suggested_list_total() {
        let items = vec![
            item(Some("1000"), ConditionGrade::A, true),
            item(Some("200"), ConditionGrade::B, true),
        ];
        assert_eq!(suggested_list_total(&items), "1170.00".parse().unwrap());
    }

    #[test]
    fn test_non_functional_items_are_halved() {
        let items = vec![item(Some("400"), ConditionGrade::C, false)];
        // 400 * 0.70 / 2
        assert_eq!(suggested_list_total(&items), "140.00".parse().unwrap());
    }

    #[test]
    fn test_missing_asking_price_uses_floor() {
        let items = vec![item(None, ConditionGrade::D, false)];
        assert_eq!(suggested_list_total(&items), "25.00".parse().unwrap());
    }

    #[test]
    fn test_consignment_tier_boundaries() {
        let c = AcquisitionType::Consignment;
        assert_eq!(
            commission_rate(c, "499.99".parse().unwrap()),
            Decimal::new(30, 2)
        );
        assert_eq!(
            commission_rate(c, "500".parse().unwrap()),
            Decimal::new(25, 2)
        );
        assert_eq!(
            commission_rate(c, "1999.99".parse().unwrap()),
            Decimal::new(25, 2)
        );
        assert_eq!(
            commission_rate(c, "2000".parse().unwrap()),
            Decimal::new(20, 2)
        );
    }

    #[test]
    fn test_buyout_margin_is_flat() {
        let b = AcquisitionType::Buyout;
        assert_eq!(commission_rate(b, "10".parse().unwrap()), Decimal::new(35, 2));
        assert_eq!(
            commission_rate(b, "5000".parse().unwrap()),
            Decimal::new(35, 2)
        );
    }

    #[test]
    fn test_payout_rounds_half_up() {
        // 33.335 rounds away from zero to 33.34
        let payout = payout_for_list_total("66.67".parse().unwrap(), Decimal::new(50, 2));
        assert_eq!(payout, "33.34".parse().unwrap());
    }

    #[test]
    fn test_compute_snapshot_consignment() {
        let purchase_id = Uuid::new_v4();
        let items = vec![
            item(Some("1500"), ConditionGrade::A, true),
            item(Some("1000"), ConditionGrade::B, true),
        ];
        let snapshot = compute_snapshot(purchase_id, AcquisitionType::Consignment, &items);

        assert_eq!(snapshot.purchase_id, purchase_id);
        assert_eq!(snapshot.list_total, "2350.00".parse().unwrap());
        assert_eq!(snapshot.commission_rate, Decimal::new(20, 2));
        assert_eq!(snapshot.payout_total, "1880.00".parse().unwrap());
    }
}
