use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use super::domain::{Deal, Nudge, NudgeId, NudgePriority, Stage};

static NUDGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_nudge_id() -> NudgeId {
    let id = NUDGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NudgeId(format!("nudge-{id:04}"))
}

/// Translate a stage entry into a follow-up reminder.
///
/// Only entering `BusinessAgreementShared` produces one: the KYC collection
/// prompt that gates go-live. Generation never fails; a blank brand name
/// degrades to a generic message.
pub fn nudge_for_stage_entry(deal: &Deal, entered: Stage, at: DateTime<Utc>) -> Option<Nudge> {
    match entered {
        Stage::BusinessAgreementShared => {
            let brand = deal.brand_name.trim();
            let message = if brand.is_empty() {
                "Collect KYC documents for this brand".to_string()
            } else {
                format!("Collect KYC documents for {brand}")
            };

            Some(Nudge {
                id: next_nudge_id(),
                message,
                priority: NudgePriority::High,
                action_label: "Collect KYC".to_string(),
                created_at: at,
                deal_id: Some(deal.id.clone()),
            })
        }
        _ => None,
    }
}
