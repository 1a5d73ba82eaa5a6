use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Deal, DealId, Nudge, PartnerKind, Product, Stage, Vertical};

/// Storage abstraction so the rules engine can be exercised against an
/// in-memory fake or a real backend without caring which.
pub trait DealStore: Send + Sync {
    fn insert(&self, deal: Deal) -> Result<Deal, StoreError>;
    fn update(&self, deal: Deal) -> Result<(), StoreError>;
    fn fetch(&self, id: &DealId) -> Result<Option<Deal>, StoreError>;
    fn search(&self, filter: &DealFilter) -> Result<Vec<Deal>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("deal already exists")]
    Conflict,
    #[error("deal not found")]
    NotFound,
    #[error("deal store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for surfacing nudges to the partner's dashboard.
pub trait NudgePublisher: Send + Sync {
    fn publish(&self, nudge: Nudge) -> Result<(), NudgeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NudgeError {
    #[error("nudge transport unavailable: {0}")]
    Transport(String),
}

/// Conjunctive search predicates backing the portal's deal list filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealFilter {
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub vertical: Option<Vertical>,
    /// Case-insensitive substring match over brand name and notes.
    #[serde(default)]
    pub query: Option<String>,
}

impl DealFilter {
    pub fn matches(&self, deal: &Deal) -> bool {
        if self.stage.is_some_and(|stage| stage != deal.stage) {
            return false;
        }
        if self.product.is_some_and(|product| product != deal.product) {
            return false;
        }
        if self
            .vertical
            .is_some_and(|vertical| vertical != deal.vertical)
        {
            return false;
        }

        match &self.query {
            Some(query) if !query.trim().is_empty() => {
                let needle = query.trim().to_lowercase();
                deal.brand_name.to_lowercase().contains(&needle)
                    || deal.notes.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Sanitized representation of a deal for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct DealStatusView {
    pub deal_id: DealId,
    pub brand_name: String,
    pub partner_kind: PartnerKind,
    pub stage: Stage,
    pub stage_label: &'static str,
    pub monthly_gmv: u64,
    pub commission_earned: f64,
    pub commission_pending: f64,
    pub stage_updated_at: DateTime<Utc>,
    pub activity_entries: usize,
}

impl DealStatusView {
    pub fn of(deal: &Deal) -> Self {
        Self {
            deal_id: deal.id.clone(),
            brand_name: deal.brand_name.clone(),
            partner_kind: deal.partner_kind,
            stage: deal.stage,
            stage_label: deal.stage.label(),
            monthly_gmv: deal.monthly_gmv,
            commission_earned: deal.commission_earned,
            commission_pending: deal.commission_pending,
            stage_updated_at: deal.stage_updated_at,
            activity_entries: deal.activity.len(),
        }
    }
}
