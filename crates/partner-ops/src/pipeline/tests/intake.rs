use super::common::*;
use crate::pipeline::domain::Stage;
use crate::pipeline::intake::{IntakePolicy, LeadIntakeGuard, LeadValidationError};

#[test]
fn valid_submission_becomes_a_prospecting_deal() {
    let guard = LeadIntakeGuard::default();

    let deal = guard
        .deal_from_submission(submission(), "Nova Partners", at(1))
        .expect("valid submission passes intake");

    assert_eq!(deal.stage, Stage::Prospecting);
    assert_eq!(deal.brand_name, "Aurora Threads");
    assert_eq!(deal.monthly_gmv, 500_000);
    assert_eq!(deal.commission_earned, 0.0);
    assert_eq!(deal.commission_pending, 0.0);
    assert_eq!(deal.stage_updated_at, at(1));
    assert_eq!(deal.activity.len(), 1);
    assert_eq!(deal.activity[0].actor, "Nova Partners");
    assert!(deal.activity[0].action.contains("Aurora Threads"));
}

#[test]
fn negative_gmv_is_rejected_at_the_boundary() {
    let guard = LeadIntakeGuard::default();
    let mut bad = submission();
    bad.monthly_gmv = -1;

    let error = guard
        .deal_from_submission(bad, "Nova Partners", at(1))
        .expect_err("negative GMV must be rejected");

    assert_eq!(error, LeadValidationError::NegativeGmv(-1));
}

#[test]
fn blank_brand_name_is_rejected() {
    let guard = LeadIntakeGuard::default();
    let mut bad = submission();
    bad.brand_name = "   ".to_string();

    let error = guard
        .deal_from_submission(bad, "Nova Partners", at(1))
        .expect_err("blank brand must be rejected");

    assert_eq!(error, LeadValidationError::MissingBrandName);
}

#[test]
fn gmv_above_the_ceiling_is_rejected_not_clamped() {
    let guard = LeadIntakeGuard::with_policy(IntakePolicy::new(1_000_000));
    let mut bad = submission();
    bad.monthly_gmv = 2_000_000;

    let error = guard
        .deal_from_submission(bad, "Nova Partners", at(1))
        .expect_err("oversized GMV must be rejected");

    assert_eq!(
        error,
        LeadValidationError::GmvAboveCeiling {
            found: 2_000_000,
            ceiling: 1_000_000,
        }
    );
}

#[test]
fn zero_ceiling_falls_back_to_the_default() {
    let policy = IntakePolicy::new(0);
    assert_eq!(policy.gmv_ceiling(), 1_000_000_000);
}

#[test]
fn brand_name_is_trimmed_on_intake() {
    let guard = LeadIntakeGuard::default();
    let mut padded = submission();
    padded.brand_name = "  Aurora Threads  ".to_string();

    let deal = guard
        .deal_from_submission(padded, "Nova Partners", at(1))
        .expect("padded brand passes intake");

    assert_eq!(deal.brand_name, "Aurora Threads");
}
