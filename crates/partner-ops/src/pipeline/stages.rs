use chrono::{DateTime, Utc};

use super::domain::{ActivityEntry, Deal, Stage};

/// Whether stage moves must follow the ordered path.
///
/// The portal historically allowed sales operators to move a deal anywhere,
/// so `Unrestricted` is the default; deployments that want the forward-only
/// invariant enforced opt into `ForwardOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    #[default]
    Unrestricted,
    ForwardOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("stage {from} is terminal and cannot be left")]
    TerminalStage { from: Stage },
    #[error("move from {from} to {to} is not forward along the pipeline")]
    NotForward { from: Stage, to: Stage },
}

/// Owns legal stage transitions and the bookkeeping every move performs:
/// update the stage, stamp `stage_updated_at`, append one activity entry.
#[derive(Debug, Clone, Default)]
pub struct StageMachine {
    policy: TransitionPolicy,
}

impl StageMachine {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Apply one transition. Re-applying the current stage under
    /// `Unrestricted` is not a silent no-op: it still appends exactly one
    /// activity entry.
    pub fn transition(
        &self,
        deal: &mut Deal,
        new_stage: Stage,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<ActivityEntry, TransitionError> {
        if self.policy == TransitionPolicy::ForwardOnly {
            check_forward(deal.stage, new_stage)?;
        }

        let entry = ActivityEntry {
            at,
            action: format!("Stage moved from {} to {}", deal.stage, new_stage),
            actor: actor.to_string(),
        };

        deal.stage = new_stage;
        deal.stage_updated_at = at;
        deal.activity.push(entry.clone());

        Ok(entry)
    }
}

fn check_forward(from: Stage, to: Stage) -> Result<(), TransitionError> {
    if from.is_terminal() {
        return Err(TransitionError::TerminalStage { from });
    }

    if to == Stage::Lost {
        return Ok(());
    }

    match (from.position(), to.position()) {
        (Some(current), Some(next)) if next > current => Ok(()),
        _ => Err(TransitionError::NotForward { from, to }),
    }
}
