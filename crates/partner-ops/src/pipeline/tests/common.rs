use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::pipeline::commission::CommissionSchedule;
use crate::pipeline::domain::{
    ActivityEntry, Deal, DealId, Nudge, PartnerKind, Product, Stage, Vertical,
};
use crate::pipeline::intake::LeadSubmission;
use crate::pipeline::repository::{
    DealFilter, DealStore, NudgeError, NudgePublisher, StoreError,
};
use crate::pipeline::router::pipeline_router;
use crate::pipeline::service::PartnerPipelineService;
use crate::pipeline::stages::TransitionPolicy;

pub(super) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn schedule() -> CommissionSchedule {
    CommissionSchedule::standard()
}

pub(super) fn submission() -> LeadSubmission {
    LeadSubmission {
        brand_name: "Aurora Threads".to_string(),
        partner_kind: PartnerKind::Referral,
        monthly_gmv: 500_000,
        product: Product::Checkout,
        vertical: Vertical::Fashion,
        notes: "Met at the commerce summit".to_string(),
    }
}

pub(super) fn deal(suffix: &str, stage: Stage) -> Deal {
    Deal {
        id: DealId(format!("deal-{suffix}")),
        brand_name: "Aurora Threads".to_string(),
        partner_kind: PartnerKind::Referral,
        monthly_gmv: 500_000,
        product: Product::Checkout,
        vertical: Vertical::Fashion,
        stage,
        stage_updated_at: at(1),
        created_at: at(1),
        commission_earned: 0.0,
        commission_pending: 0.0,
        notes: String::new(),
        activity: vec![ActivityEntry {
            at: at(1),
            action: "Lead submitted for Aurora Threads".to_string(),
            actor: "Nova Partners".to_string(),
        }],
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) deals: Arc<Mutex<HashMap<DealId, Deal>>>,
}

impl DealStore for MemoryStore {
    fn insert(&self, deal: Deal) -> Result<Deal, StoreError> {
        let mut guard = self.deals.lock().expect("store mutex poisoned");
        if guard.contains_key(&deal.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(deal.id.clone(), deal.clone());
        Ok(deal)
    }

    fn update(&self, deal: Deal) -> Result<(), StoreError> {
        let mut guard = self.deals.lock().expect("store mutex poisoned");
        if guard.contains_key(&deal.id) {
            guard.insert(deal.id.clone(), deal);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &DealId) -> Result<Option<Deal>, StoreError> {
        let guard = self.deals.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn search(&self, filter: &DealFilter) -> Result<Vec<Deal>, StoreError> {
        let guard = self.deals.lock().expect("store mutex poisoned");
        let mut deals: Vec<Deal> = guard
            .values()
            .filter(|deal| filter.matches(deal))
            .cloned()
            .collect();
        deals.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(deals)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNudges {
    events: Arc<Mutex<Vec<Nudge>>>,
}

impl MemoryNudges {
    pub(super) fn events(&self) -> Vec<Nudge> {
        self.events.lock().expect("nudge mutex poisoned").clone()
    }
}

impl NudgePublisher for MemoryNudges {
    fn publish(&self, nudge: Nudge) -> Result<(), NudgeError> {
        self.events
            .lock()
            .expect("nudge mutex poisoned")
            .push(nudge);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl DealStore for UnavailableStore {
    fn insert(&self, _deal: Deal) -> Result<Deal, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _deal: Deal) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &DealId) -> Result<Option<Deal>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn search(&self, _filter: &DealFilter) -> Result<Vec<Deal>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    PartnerPipelineService<MemoryStore, MemoryNudges>,
    Arc<MemoryStore>,
    Arc<MemoryNudges>,
) {
    build_service_with_policy(TransitionPolicy::Unrestricted)
}

pub(super) fn build_service_with_policy(
    policy: TransitionPolicy,
) -> (
    PartnerPipelineService<MemoryStore, MemoryNudges>,
    Arc<MemoryStore>,
    Arc<MemoryNudges>,
) {
    let store = Arc::new(MemoryStore::default());
    let nudges = Arc::new(MemoryNudges::default());
    let service = PartnerPipelineService::new(store.clone(), nudges.clone(), schedule(), policy);
    (service, store, nudges)
}

pub(super) fn router_with_service(
    service: PartnerPipelineService<MemoryStore, MemoryNudges>,
) -> axum::Router {
    pipeline_router(Arc::new(service))
}
