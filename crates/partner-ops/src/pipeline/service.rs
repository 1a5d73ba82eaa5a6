use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::commission::{CommissionEngine, CommissionResult, CommissionSchedule};
use super::domain::{ActivityEntry, Deal, DealId, Nudge, Stage};
use super::intake::{LeadIntakeGuard, LeadSubmission, LeadValidationError};
use super::nudges::nudge_for_stage_entry;
use super::repository::{DealFilter, DealStore, NudgeError, NudgePublisher, StoreError};
use super::stages::{StageMachine, TransitionError, TransitionPolicy};

static DEAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_deal_id() -> DealId {
    let id = DEAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DealId(format!("deal-{id:06}"))
}

/// Facade composing the intake guard, stage machine, commission engine, and
/// nudge generator over the storage and nudge ports.
pub struct PartnerPipelineService<R, N> {
    guard: LeadIntakeGuard,
    machine: StageMachine,
    engine: CommissionEngine,
    store: Arc<R>,
    nudges: Arc<N>,
}

impl<R, N> PartnerPipelineService<R, N>
where
    R: DealStore + 'static,
    N: NudgePublisher + 'static,
{
    pub fn new(
        store: Arc<R>,
        nudges: Arc<N>,
        schedule: CommissionSchedule,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            guard: LeadIntakeGuard::default(),
            machine: StageMachine::new(policy),
            engine: CommissionEngine::new(schedule),
            store,
            nudges,
        }
    }

    pub fn engine(&self) -> &CommissionEngine {
        &self.engine
    }

    /// Validate and store a new lead, assigning its deal id.
    pub fn submit_lead(
        &self,
        submission: LeadSubmission,
        partner: &str,
        at: DateTime<Utc>,
    ) -> Result<Deal, PipelineServiceError> {
        let mut deal = self.guard.deal_from_submission(submission, partner, at)?;
        deal.id = next_deal_id();

        let stored = self.store.insert(deal)?;
        debug!(deal_id = %stored.id, brand = %stored.brand_name, "lead submitted");
        Ok(stored)
    }

    /// Move a deal to a new stage, applying commission bookkeeping and
    /// publishing the KYC nudge where the rule table says so.
    pub fn advance_stage(
        &self,
        deal_id: &DealId,
        new_stage: Stage,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<StageAdvance, PipelineServiceError> {
        let mut deal = self.store.fetch(deal_id)?.ok_or(StoreError::NotFound)?;

        let activity = self.machine.transition(&mut deal, new_stage, actor, at)?;

        match new_stage {
            Stage::Signed => {
                let quote = self.engine.quote(
                    deal.partner_kind,
                    deal.monthly_gmv,
                    deal.product,
                    deal.vertical,
                );
                deal.commission_pending = quote.amount;
            }
            Stage::GoLive => {
                deal.commission_earned += deal.commission_pending;
                deal.commission_pending = 0.0;
            }
            Stage::Lost => {
                deal.commission_pending = 0.0;
            }
            _ => {}
        }

        self.store.update(deal.clone())?;

        let nudge = nudge_for_stage_entry(&deal, new_stage, at);
        if let Some(nudge) = &nudge {
            self.nudges.publish(nudge.clone())?;
            debug!(deal_id = %deal.id, nudge_id = ?nudge.id, "nudge published");
        }

        Ok(StageAdvance {
            deal,
            activity,
            nudge,
        })
    }

    /// Ad-hoc commission quote for a stored deal.
    pub fn quote(&self, deal_id: &DealId) -> Result<CommissionResult, PipelineServiceError> {
        let deal = self.store.fetch(deal_id)?.ok_or(StoreError::NotFound)?;
        Ok(self.engine.quote(
            deal.partner_kind,
            deal.monthly_gmv,
            deal.product,
            deal.vertical,
        ))
    }

    pub fn get(&self, deal_id: &DealId) -> Result<Deal, PipelineServiceError> {
        let deal = self.store.fetch(deal_id)?.ok_or(StoreError::NotFound)?;
        Ok(deal)
    }

    pub fn search(&self, filter: &DealFilter) -> Result<Vec<Deal>, PipelineServiceError> {
        Ok(self.store.search(filter)?)
    }
}

/// Outcome of one stage move: the updated deal, the appended activity
/// entry, and the nudge the move produced, if any.
#[derive(Debug, Clone, Serialize)]
pub struct StageAdvance {
    pub deal: Deal,
    pub activity: ActivityEntry,
    pub nudge: Option<Nudge>,
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error(transparent)]
    Validation(#[from] LeadValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Nudge(#[from] NudgeError),
}
