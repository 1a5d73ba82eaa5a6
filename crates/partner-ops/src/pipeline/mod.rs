//! Partner pipeline rules engine: rate table, commission calculator, stage
//! machine, and nudge generator, plus the ports and service facade that
//! embed them in the portal.

pub mod commission;
pub mod domain;
pub mod funnel;
pub mod intake;
mod nudges;
pub mod repository;
pub mod router;
pub mod service;
mod stages;

#[cfg(test)]
mod tests;

pub use commission::{
    BreakdownEntry, CommissionEngine, CommissionResult, CommissionSchedule, RateBasis, RateTable,
};
pub use domain::{
    ActivityEntry, Deal, DealId, Nudge, NudgeId, NudgePriority, PartnerKind, Product, Stage,
    Vertical,
};
pub use funnel::{FunnelInsights, FunnelReport, FunnelSummary, StageFunnelEntry, StalledDeal};
pub use intake::{IntakePolicy, LeadIntakeGuard, LeadSubmission, LeadValidationError};
pub use nudges::nudge_for_stage_entry;
pub use repository::{
    DealFilter, DealStatusView, DealStore, NudgeError, NudgePublisher, StoreError,
};
pub use router::pipeline_router;
pub use service::{PartnerPipelineService, PipelineServiceError, StageAdvance};
pub use stages::{StageMachine, TransitionError, TransitionPolicy};
