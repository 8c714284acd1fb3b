use crate::errors::ApiError;
use serde::{Deserialize, Serialize};

/// Lifecycle of a pending purchase. Stored as a VARCHAR status column;
/// transitions are enforced by the route handlers through `can_transition_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    PendingReview,
    InspectionInProgress,
    AwaitingPayment,
    Completed,
    Rejected,
    Cancelled,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::PendingReview => "pending_review",
            PurchaseStatus::InspectionInProgress => "inspection_in_progress",
            PurchaseStatus::AwaitingPayment => "awaiting_payment",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Rejected => "rejected",
            PurchaseStatus::Cancelled => "cancelled",
        }
    }

    /// Legal forward moves in the purchase lifecycle.
    pub fn can_transition_to(&self, next: PurchaseStatus) -> bool {
        use PurchaseStatus::*;
        matches!(
            (self, next),
            (PendingReview, InspectionInProgress)
                | (PendingReview, Rejected)
                | (PendingReview, Cancelled)
                | (InspectionInProgress, AwaitingPayment)
                | (InspectionInProgress, Cancelled)
                | (AwaitingPayment, Completed)
        )
    }
}

impl From<PurchaseStatus> for String {
    fn from(status: PurchaseStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<&str> for PurchaseStatus {
    type Error = ApiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending_review" => Ok(PurchaseStatus::PendingReview),
            "inspection_in_progress" => Ok(PurchaseStatus::InspectionInProgress),
            "awaiting_payment" => Ok(PurchaseStatus::AwaitingPayment),
            "completed" => Ok(PurchaseStatus::Completed),
            "rejected" => Ok(PurchaseStatus::Rejected),
            "cancelled" => Ok(PurchaseStatus::Cancelled),
            other => Err(ApiError::Custom(format!("Invalid purchase status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionType {
    Consignment,
    Buyout,
}

impl AcquisitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionType::Consignment => "consignment",
            AcquisitionType::Buyout => "buyout",
        }
    }
}

impl From<AcquisitionType> for String {
    fn from(value: AcquisitionType) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<&str> for AcquisitionType {
    type Error = ApiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "consignment" => Ok(AcquisitionType::Consignment),
            "buyout" => Ok(AcquisitionType::Buyout),
            other => Err(ApiError::Custom(format!(
                "Invalid acquisition type: {other}"
            ))),
        }
    }
}

/// Condition grade assigned during inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionGrade {
    A,
    B,
    C,
    D,
}

impl ConditionGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionGrade::A => "a",
            ConditionGrade::B => "b",
            ConditionGrade::C => "c",
            ConditionGrade::D => "d",
        }
    }
}

impl From<ConditionGrade> for String {
    fn from(value: ConditionGrade) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<&str> for ConditionGrade {
    type Error = ApiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "a" | "A" => Ok(ConditionGrade::A),
            "b" | "B" => Ok(ConditionGrade::B),
            "c" | "C" => Ok(ConditionGrade::C),
            "d" | "D" => Ok(ConditionGrade::D),
            other => Err(ApiError::Custom(format!("Invalid condition grade: {other}"))),
        }
    }
}

/// WooCommerce push state of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    NotSynced,
    Pending,
    Synced,
    Error,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::NotSynced => "not_synced",
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "error",
        }
    }
}

impl From<SyncStatus> for String {
    fn from(value: SyncStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Outcome of the lens-spec matcher for a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Pending,
    Matched,
    NeedsReview,
    NoMatch,
}

impl EnrichmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentStatus::Pending => "pending",
            EnrichmentStatus::Matched => "matched",
            EnrichmentStatus::NeedsReview => "needs_review",
            EnrichmentStatus::NoMatch => "no_match",
        }
    }
}

impl From<EnrichmentStatus> for String {
    fn from(value: EnrichmentStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Processing state of a received webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    Received,
    Processed,
    Skipped,
    Failed,
}

impl WebhookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookStatus::Received => "received",
            WebhookStatus::Processed => "processed",
            WebhookStatus::Skipped => "skipped",
            WebhookStatus::Failed => "failed",
        }
    }
}

impl From<WebhookStatus> for String {
    fn from(value: WebhookStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeRequestKind {
    PriceChange,
    Withdrawal,
}

impl ChangeRequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeRequestKind::PriceChange => "price_change",
            ChangeRequestKind::Withdrawal => "withdrawal",
        }
    }
}

impl From<ChangeRequestKind> for String {
    fn from(value: ChangeRequestKind) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<&str> for ChangeRequestKind {
    type Error = ApiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "price_change" => Ok(ChangeRequestKind::PriceChange),
            "withdrawal" => Ok(ChangeRequestKind::Withdrawal),
            other => Err(ApiError::Custom(format!(
                "Invalid change request kind: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl ChangeRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeRequestStatus::Pending => "pending",
            ChangeRequestStatus::Approved => "approved",
            ChangeRequestStatus::Rejected => "rejected",
        }
    }
}

impl From<ChangeRequestStatus> for String {
    fn from(value: ChangeRequestStatus) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_purchase_transitions() {
        use PurchaseStatus::*;
        assert!(PendingReview.can_transition_to(InspectionInProgress));
        assert!(PendingReview.can_transition_to(Rejected));
        assert!(PendingReview.can_transition_to(Cancelled));
        assert!(InspectionInProgress.can_transition_to(AwaitingPayment));
        assert!(InspectionInProgress.can_transition_to(Cancelled));
        assert!(AwaitingPayment.can_transition_to(Completed));
    }

    #[test]
    fn test_illegal_purchase_transitions() {
        use PurchaseStatus::*;
        assert!(!PendingReview.can_transition_to(AwaitingPayment));
        assert!(!PendingReview.can_transition_to(Completed));
        assert!(!AwaitingPayment.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(PendingReview));
        assert!(!Rejected.can_transition_to(InspectionInProgress));
        assert!(!InspectionInProgress.can_transition_to(Completed));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            PurchaseStatus::PendingReview,
            PurchaseStatus::InspectionInProgress,
            PurchaseStatus::AwaitingPayment,
            PurchaseStatus::Completed,
            PurchaseStatus::Rejected,
            PurchaseStatus::Cancelled,
        ] {
            assert_eq!(PurchaseStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(PurchaseStatus::try_from("shipped").is_err());
    }

    #[test]
    fn test_condition_grade_accepts_uppercase() {
        assert_eq!(ConditionGrade::try_from("B").unwrap(), ConditionGrade::B);
        assert!(ConditionGrade::try_from("e").is_err());
    }
}
