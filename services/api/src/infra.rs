use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use partner_ops::pipeline::{
    CommissionSchedule, Deal, DealFilter, DealId, DealStore, Nudge, NudgeError, NudgeId,
    NudgePublisher, PartnerKind, StoreError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<InMemoryDealStore>,
    pub(crate) nudges: Arc<InMemoryNudgeBoard>,
    pub(crate) stalled_after_days: i64,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDealStore {
    deals: Arc<Mutex<HashMap<DealId, Deal>>>,
}

impl DealStore for InMemoryDealStore {
    fn insert(&self, deal: Deal) -> Result<Deal, StoreError> {
        let mut guard = self.deals.lock().expect("deal store mutex poisoned");
        if guard.contains_key(&deal.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(deal.id.clone(), deal.clone());
        Ok(deal)
    }

    fn update(&self, deal: Deal) -> Result<(), StoreError> {
        let mut guard = self.deals.lock().expect("deal store mutex poisoned");
        if guard.contains_key(&deal.id) {
            guard.insert(deal.id.clone(), deal);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &DealId) -> Result<Option<Deal>, StoreError> {
        let guard = self.deals.lock().expect("deal store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn search(&self, filter: &DealFilter) -> Result<Vec<Deal>, StoreError> {
        let guard = self.deals.lock().expect("deal store mutex poisoned");
        let mut deals: Vec<Deal> = guard
            .values()
            .filter(|deal| filter.matches(deal))
            .cloned()
            .collect();
        deals.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(deals)
    }
}

/// Dashboard-facing nudge board: published nudges live here until the
/// partner dismisses them. Nothing is persisted.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNudgeBoard {
    nudges: Arc<Mutex<Vec<Nudge>>>,
}

impl InMemoryNudgeBoard {
    pub(crate) fn list(&self) -> Vec<Nudge> {
        self.nudges.lock().expect("nudge mutex poisoned").clone()
    }

    pub(crate) fn dismiss(&self, id: &NudgeId) -> bool {
        let mut guard = self.nudges.lock().expect("nudge mutex poisoned");
        let before = guard.len();
        guard.retain(|nudge| &nudge.id != id);
        guard.len() < before
    }
}

impl NudgePublisher for InMemoryNudgeBoard {
    fn publish(&self, nudge: Nudge) -> Result<(), NudgeError> {
        self.nudges
            .lock()
            .expect("nudge mutex poisoned")
            .push(nudge);
        Ok(())
    }
}

pub(crate) fn default_schedule() -> CommissionSchedule {
    CommissionSchedule::standard()
}

pub(crate) fn parse_partner_kind(raw: &str) -> Result<PartnerKind, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "referral" => Ok(PartnerKind::Referral),
        "reseller" => Ok(PartnerKind::Reseller),
        "service" => Ok(PartnerKind::Service),
        other => Err(format!(
            "unknown partner kind '{other}' (expected referral, reseller, or service)"
        )),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
