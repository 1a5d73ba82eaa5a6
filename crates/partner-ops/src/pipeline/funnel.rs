use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Deal, DealId, Stage};

#[derive(Debug, Default, Clone)]
pub struct StageSlice {
    pub deals: usize,
    pub gmv: u64,
}

/// Aggregation over a book of deals for the admin analytics console.
#[derive(Debug, Default)]
pub struct FunnelReport {
    pub stage_slices: HashMap<Stage, StageSlice>,
    pub commission_earned: f64,
    pub commission_pending: f64,
    pub signed_or_live: usize,
    pub lost: usize,
    pub total_deals: usize,
    pub stalled: Vec<StalledDeal>,
}

impl FunnelReport {
    /// Aggregate the book as of `today`. A non-terminal deal whose stage has
    /// not moved for `stalled_after_days` or more counts as stalled.
    pub fn build(deals: &[Deal], today: DateTime<Utc>, stalled_after_days: i64) -> Self {
        let mut report = Self::default();

        for deal in deals {
            report.total_deals += 1;

            let slice = report.stage_slices.entry(deal.stage).or_default();
            slice.deals += 1;
            slice.gmv += deal.monthly_gmv;

            report.commission_earned += deal.commission_earned;
            report.commission_pending += deal.commission_pending;

            match deal.stage {
                Stage::Signed | Stage::GoLive => report.signed_or_live += 1,
                Stage::Lost => report.lost += 1,
                _ => {}
            }

            if !deal.stage.is_terminal() {
                let days_idle = (today - deal.stage_updated_at).num_days();
                if days_idle >= stalled_after_days {
                    report.stalled.push(StalledDeal {
                        deal_id: deal.id.clone(),
                        brand_name: deal.brand_name.clone(),
                        stage: deal.stage,
                        stage_label: deal.stage.label(),
                        stage_updated_at: deal.stage_updated_at,
                        days_idle,
                    });
                }
            }
        }

        report.stalled.sort_by(|a, b| b.days_idle.cmp(&a.days_idle));

        report
    }

    pub fn summary(&self) -> FunnelSummary {
        let stages = Stage::ordered()
            .into_iter()
            .map(|stage| {
                let slice = self.stage_slices.get(&stage).cloned().unwrap_or_default();
                StageFunnelEntry {
                    stage,
                    stage_label: stage.label(),
                    deals: slice.deals,
                    gmv: slice.gmv,
                }
            })
            .collect();

        FunnelSummary {
            stages,
            lost: self.lost,
            total_deals: self.total_deals,
            signed_or_live: self.signed_or_live,
            commission_earned: self.commission_earned,
            commission_pending: self.commission_pending,
            stalled: self.stalled.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageFunnelEntry {
    pub stage: Stage,
    pub stage_label: &'static str,
    pub deals: usize,
    pub gmv: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StalledDeal {
    pub deal_id: DealId,
    pub brand_name: String,
    pub stage: Stage,
    pub stage_label: &'static str,
    pub stage_updated_at: DateTime<Utc>,
    pub days_idle: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelSummary {
    pub stages: Vec<StageFunnelEntry>,
    pub lost: usize,
    pub total_deals: usize,
    pub signed_or_live: usize,
    pub commission_earned: f64,
    pub commission_pending: f64,
    pub stalled: Vec<StalledDeal>,
}

impl FunnelSummary {
    pub fn insights(&self) -> FunnelInsights {
        let conversion_rate = if self.total_deals > 0 {
            self.signed_or_live as f64 / self.total_deals as f64
        } else {
            0.0
        };

        // Focus on the open stage carrying the most deals; Go Live is done.
        let focus = self
            .stages
            .iter()
            .filter(|entry| entry.stage != Stage::GoLive && entry.deals > 0)
            .max_by_key(|entry| entry.deals);

        let mut observations = Vec::new();
        if self.total_deals > 0 {
            observations.push(format!(
                "{} deal(s) in the book; {} signed or live ({:.0}% conversion)",
                self.total_deals,
                self.signed_or_live,
                conversion_rate * 100.0
            ));
        }
        if !self.stalled.is_empty() {
            observations.push(format!(
                "{} deal(s) stalled; oldest idle {} day(s)",
                self.stalled.len(),
                self.stalled.first().map(|deal| deal.days_idle).unwrap_or(0)
            ));
        }
        if self.commission_pending > 0.0 {
            observations.push(format!(
                "{:.2} in commissions pending go-live",
                self.commission_pending
            ));
        }
        if observations.is_empty() {
            observations.push("Pipeline is empty; share your referral link to seed it".to_string());
        }

        let mut recommended_actions = Vec::new();
        if let Some(entry) = focus {
            match entry.stage {
                Stage::Prospecting => recommended_actions
                    .push("Qualify prospecting leads and schedule first pitches".to_string()),
                Stage::Pitch => recommended_actions
                    .push("Follow up on open pitches with tailored GMV projections".to_string()),
                Stage::Objection => recommended_actions
                    .push("Loop in solution engineers to clear open objections".to_string()),
                Stage::BusinessAgreementShared => recommended_actions
                    .push("Chase signatures and collect KYC documents".to_string()),
                Stage::Signed => recommended_actions
                    .push("Kick off integrations to convert signed deals to go-live".to_string()),
                Stage::GoLive | Stage::Lost => {}
            }
        }
        if !self.stalled.is_empty() {
            recommended_actions
                .push("Review stalled deals with the partner manager this week".to_string());
        }

        FunnelInsights {
            conversion_rate,
            focus_stage: focus.map(|entry| entry.stage_label),
            observations,
            recommended_actions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelInsights {
    pub conversion_rate: f64,
    pub focus_stage: Option<&'static str>,
    pub observations: Vec<String>,
    pub recommended_actions: Vec<String>,
}
