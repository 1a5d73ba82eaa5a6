//! End-to-end scenarios for the partner pipeline delivered through the
//! public service facade and HTTP router, without reaching into private
//! modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};

    use partner_ops::pipeline::{
        CommissionSchedule, Deal, DealFilter, DealId, DealStore, LeadSubmission, Nudge,
        NudgeError, NudgePublisher, PartnerKind, PartnerPipelineService, Product, StoreError,
        TransitionPolicy, Vertical,
    };

    pub fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub fn submission() -> LeadSubmission {
        LeadSubmission {
            brand_name: "Aurora Threads".to_string(),
            partner_kind: PartnerKind::Referral,
            monthly_gmv: 500_000,
            product: Product::Checkout,
            vertical: Vertical::Fashion,
            notes: "Met at the commerce summit".to_string(),
        }
    }

    #[derive(Default, Clone)]
    pub struct MemoryStore {
        deals: Arc<Mutex<HashMap<DealId, Deal>>>,
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
    pub struct MemoryNudges {
        events: Arc<Mutex<Vec<Nudge>>>,
    }

    impl MemoryNudges {
        pub fn events(&self) -> Vec<Nudge> {
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

    pub fn build_service() -> (
        PartnerPipelineService<MemoryStore, MemoryNudges>,
        Arc<MemoryStore>,
        Arc<MemoryNudges>,
    ) {
        let store = Arc::new(MemoryStore::default());
        let nudges = Arc::new(MemoryNudges::default());
        let service = PartnerPipelineService::new(
            store.clone(),
            nudges.clone(),
            CommissionSchedule::standard(),
            TransitionPolicy::Unrestricted,
        );
        (service, store, nudges)
    }
}

use common::*;
use partner_ops::pipeline::{
    DealFilter, FunnelReport, NudgePriority, Stage,
};

#[test]
fn lead_travels_the_pipeline_and_pays_out_on_go_live() {
    let (service, _store, nudges) = build_service();

    let deal = service
        .submit_lead(submission(), "Nova Partners", at(1))
        .expect("lead submitted");
    assert_eq!(deal.stage, Stage::Prospecting);

    service
        .advance_stage(&deal.id, Stage::Pitch, "Nova Partners", at(2))
        .expect("pitch scheduled");
    let agreement = service
        .advance_stage(
            &deal.id,
            Stage::BusinessAgreementShared,
            "Nova Partners",
            at(3),
        )
        .expect("agreement shared");

    let nudge = agreement.nudge.expect("KYC nudge emitted");
    assert_eq!(nudge.priority, NudgePriority::High);
    assert_eq!(nudge.message, "Collect KYC documents for Aurora Threads");
    assert_eq!(nudge.deal_id, Some(deal.id.clone()));
    assert_eq!(nudges.events().len(), 1, "exactly one nudge published");

    let signed = service
        .advance_stage(&deal.id, Stage::Signed, "Nova Partners", at(4))
        .expect("deal signed");
    assert!((signed.deal.commission_pending - 23_000.0).abs() < 1e-6);

    let live = service
        .advance_stage(&deal.id, Stage::GoLive, "Nova Partners", at(5))
        .expect("deal live");
    assert!((live.deal.commission_earned - 23_000.0).abs() < 1e-6);
    assert_eq!(live.deal.commission_pending, 0.0);

    // One submission entry plus four stage moves, in invocation order.
    let stored = service.get(&deal.id).expect("deal retrievable");
    assert_eq!(stored.activity.len(), 5);
    let timestamps: Vec<_> = stored.activity.iter().map(|entry| entry.at).collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted);

    assert_eq!(nudges.events().len(), 1, "later stages emit no nudges");
}

#[test]
fn funnel_report_reflects_the_current_book() {
    let (service, _store, _nudges) = build_service();

    let first = service
        .submit_lead(submission(), "Nova Partners", at(1))
        .expect("first lead");
    let mut second_submission = submission();
    second_submission.brand_name = "Nimbus Audio".to_string();
    second_submission.monthly_gmv = 200_000;
    let second = service
        .submit_lead(second_submission, "Nova Partners", at(1))
        .expect("second lead");

    service
        .advance_stage(&first.id, Stage::Signed, "Nova Partners", at(2))
        .expect("first signs");
    service
        .advance_stage(&second.id, Stage::Lost, "Nova Partners", at(2))
        .expect("second is lost");

    let book = service
        .search(&DealFilter::default())
        .expect("search succeeds");
    let report = FunnelReport::build(&book, at(3), 14);

    assert_eq!(report.total_deals, 2);
    assert_eq!(report.signed_or_live, 1);
    assert_eq!(report.lost, 1);
    assert!((report.commission_pending - 23_000.0).abs() < 1e-6);
    assert!(report.stalled.is_empty());
}
