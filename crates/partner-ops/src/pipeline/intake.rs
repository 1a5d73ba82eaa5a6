use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ActivityEntry, Deal, DealId, PartnerKind, Product, Stage, Vertical};

/// Inbound lead as the portal's submission form delivers it. GMV arrives
/// signed so the boundary can reject negative figures explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub brand_name: String,
    pub partner_kind: PartnerKind,
    pub monthly_gmv: i64,
    pub product: Product,
    pub vertical: Vertical,
    #[serde(default)]
    pub notes: String,
}

/// Validation errors raised at the intake boundary. The calculator and
/// stage machine assume well-formed input and do not re-validate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadValidationError {
    #[error("monthly GMV cannot be negative (got {0})")]
    NegativeGmv(i64),
    #[error("brand name is required")]
    MissingBrandName,
    #[error("monthly GMV {found} exceeds the accepted ceiling of {ceiling}")]
    GmvAboveCeiling { found: u64, ceiling: u64 },
}

const DEFAULT_GMV_CEILING: u64 = 1_000_000_000;

/// Intake dials; currently just the fat-finger ceiling on monthly GMV.
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    gmv_ceiling: u64,
}

impl IntakePolicy {
    pub fn new(gmv_ceiling: u64) -> Self {
        let sanitized = if gmv_ceiling == 0 {
            DEFAULT_GMV_CEILING
        } else {
            gmv_ceiling
        };

        Self {
            gmv_ceiling: sanitized,
        }
    }

    pub fn gmv_ceiling(&self) -> u64 {
        self.gmv_ceiling
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_GMV_CEILING)
    }
}

/// Guard producing well-formed `Deal`s from raw submissions.
#[derive(Debug, Clone, Default)]
pub struct LeadIntakeGuard {
    policy: IntakePolicy,
}

impl LeadIntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Convert a submission into a deal starting in `Prospecting`, with the
    /// submission recorded as the first activity entry. The returned deal
    /// carries a placeholder id; the service assigns the real one.
    pub fn deal_from_submission(
        &self,
        submission: LeadSubmission,
        partner: &str,
        at: DateTime<Utc>,
    ) -> Result<Deal, LeadValidationError> {
        let brand = submission.brand_name.trim();
        if brand.is_empty() {
            return Err(LeadValidationError::MissingBrandName);
        }

        if submission.monthly_gmv < 0 {
            return Err(LeadValidationError::NegativeGmv(submission.monthly_gmv));
        }

        let monthly_gmv = submission.monthly_gmv as u64;
        if monthly_gmv > self.policy.gmv_ceiling {
            return Err(LeadValidationError::GmvAboveCeiling {
                found: monthly_gmv,
                ceiling: self.policy.gmv_ceiling,
            });
        }

        Ok(Deal {
            id: DealId("pending".to_string()),
            brand_name: brand.to_string(),
            partner_kind: submission.partner_kind,
            monthly_gmv,
            product: submission.product,
            vertical: submission.vertical,
            stage: Stage::Prospecting,
            stage_updated_at: at,
            created_at: at,
            commission_earned: 0.0,
            commission_pending: 0.0,
            notes: submission.notes,
            activity: vec![ActivityEntry {
                at,
                action: format!("Lead submitted for {brand}"),
                actor: partner.to_string(),
            }],
        })
    }
}
