use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Partner classification fixed at profile creation; drives the rate basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerKind {
    Referral,
    Reseller,
    Service,
}

impl PartnerKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Referral, Self::Reseller, Self::Service]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Referral => "Referral Partner",
            Self::Reseller => "Reseller Partner",
            Self::Service => "Service Partner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    Checkout,
    ReturnsManagement,
    Engagement,
    AllProducts,
}

impl Product {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Checkout,
            Self::ReturnsManagement,
            Self::Engagement,
            Self::AllProducts,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Checkout => "Checkout",
            Self::ReturnsManagement => "Returns Management",
            Self::Engagement => "Engagement",
            Self::AllProducts => "All Products",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    Fashion,
    Electronics,
    Beauty,
    Home,
    Food,
    Other,
}

impl Vertical {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Fashion,
            Self::Electronics,
            Self::Beauty,
            Self::Home,
            Self::Food,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fashion => "Fashion",
            Self::Electronics => "Electronics",
            Self::Beauty => "Beauty",
            Self::Home => "Home",
            Self::Food => "Food",
            Self::Other => "Other",
        }
    }
}

/// Pipeline position of a deal. `Lost` sits off the ordered path and is
/// reachable from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Prospecting,
    Pitch,
    Objection,
    BusinessAgreementShared,
    Signed,
    GoLive,
    Lost,
}

impl Stage {
    /// The forward path a deal travels; `Lost` is excluded.
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Prospecting,
            Self::Pitch,
            Self::Objection,
            Self::BusinessAgreementShared,
            Self::Signed,
            Self::GoLive,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Prospecting => "Prospecting",
            Self::Pitch => "Pitch",
            Self::Objection => "Objection",
            Self::BusinessAgreementShared => "Business Agreement Shared",
            Self::Signed => "Signed",
            Self::GoLive => "Go Live",
            Self::Lost => "Lost",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GoLive | Self::Lost)
    }

    /// Index along the ordered path; `None` for `Lost`.
    pub const fn position(self) -> Option<usize> {
        match self {
            Self::Prospecting => Some(0),
            Self::Pitch => Some(1),
            Self::Objection => Some(2),
            Self::BusinessAgreementShared => Some(3),
            Self::Signed => Some(4),
            Self::GoLive => Some(5),
            Self::Lost => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier wrapper for deals in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(pub String);

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for nudges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NudgeId(pub String);

/// Single append-only entry in a deal's activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub action: String,
    pub actor: String,
}

/// A lead/deal owned by the partner who submitted it. Never hard-deleted;
/// views filter instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub brand_name: String,
    pub partner_kind: PartnerKind,
    pub monthly_gmv: u64,
    pub product: Product,
    pub vertical: Vertical,
    pub stage: Stage,
    pub stage_updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub commission_earned: f64,
    pub commission_pending: f64,
    pub notes: String,
    pub activity: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgePriority {
    High,
    Medium,
    Low,
}

impl NudgePriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Reminder surfaced to a partner. Holds a weak reference to its deal:
/// consumers must tolerate the deal being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nudge {
    pub id: NudgeId,
    pub message: String,
    pub priority: NudgePriority,
    pub action_label: String,
    pub created_at: DateTime<Utc>,
    pub deal_id: Option<DealId>,
}
