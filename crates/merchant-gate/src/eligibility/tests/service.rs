use super::common::*;
use std::sync::Arc;

use crate::eligibility::access::AccessError;
use crate::eligibility::domain::SubscriptionStatus;
use crate::eligibility::repository::DirectoryError;
use crate::eligibility::{EligibilityReason, EligibilityService, EligibilityServiceError};

#[test]
fn check_requires_a_session() {
    let service = build_service(vec![eligible_snapshot(None)]);

    let err = service
        .check(None, &merchant_id())
        .expect_err("anonymous check rejected");

    assert!(matches!(
        err,
        EligibilityServiceError::Access(AccessError::Unauthenticated)
    ));
}

#[test]
fn access_is_checked_before_the_directory() {
    let service = EligibilityService::with_clock(
        Arc::new(UnavailableDirectory),
        Arc::new(MemorySessions::standard()),
        monday_noon,
    );

    let err = service
        .check(Some(&outsider_session()), &merchant_id())
        .expect_err("outsider rejected");
    assert!(matches!(
        err,
        EligibilityServiceError::Access(AccessError::Forbidden { .. })
    ));

    let err = service
        .check(Some(&owner_session()), &merchant_id())
        .expect_err("directory offline");
    assert!(matches!(
        err,
        EligibilityServiceError::Directory(DirectoryError::Unavailable(_))
    ));
}

#[test]
fn permitted_but_unknown_merchant_is_not_found() {
    let service = build_service(vec![eligible_snapshot(None)]);

    let result = service
        .check(Some(&owner_session()), &other_merchant_id())
        .expect("owner may query membership");

    assert_eq!(result.reasons(), &[EligibilityReason::MerchantNotFound]);
}

#[test]
fn check_uses_injected_clock() {
    let service = build_service(vec![eligible_snapshot(Some(monday_hours("18:00", "22:00")))]);

    let result = service
        .check(Some(&owner_session()), &merchant_id())
        .expect("check succeeds");
    assert_eq!(result.reasons(), &[EligibilityReason::BusinessClosedOutsideHours]);

    let evening = utc(2025, 3, 10, 19, 0);
    let result = service
        .check_at(Some(&owner_session()), &merchant_id(), evening)
        .expect("check succeeds");
    assert!(result.is_eligible());
}

#[test]
fn session_lookup_ignores_unknown_tokens() {
    let service = build_service(Vec::new());

    assert!(service.session(None).expect("lookup").is_none());
    assert!(service.session(Some("stale")).expect("lookup").is_none());
    assert_eq!(
        service.session(Some(OWNER_TOKEN)).expect("lookup"),
        Some(owner_session())
    );
}

#[test]
fn overview_summarises_workspace() {
    let service = build_service(vec![eligible_snapshot(None)]);

    let overview = service
        .overview(Some(&owner_session()), &merchant_id())
        .expect("overview loads")
        .expect("merchant exists");

    assert_eq!(overview.workspace_id, merchant_id());
    assert_eq!(overview.company_name.as_deref(), Some("Padaria Central"));
    assert_eq!(overview.operator_email, "owner@padaria.example");
    assert!(overview.eligibility.is_eligible());
    let subscription = overview.subscription.expect("subscription summary");
    assert_eq!(subscription.plan_name.as_deref(), Some("Vitrine Pro"));
    assert_eq!(subscription.status, SubscriptionStatus::Active);
}

#[test]
fn overview_is_none_for_missing_merchant() {
    let service = build_service(Vec::new());

    let overview = service
        .overview(Some(&owner_session()), &merchant_id())
        .expect("overview loads");

    assert!(overview.is_none());
}

#[test]
fn audit_covers_every_merchant() {
    let mut closed = eligible_snapshot(Some(monday_hours("18:00", "22:00")));
    closed.id = other_merchant_id();
    let service = build_service(vec![eligible_snapshot(None), closed]);

    let verdicts = service.audit(monday_noon()).expect("audit runs");

    assert_eq!(verdicts.len(), 2);
    let closed_verdict = verdicts
        .iter()
        .find(|verdict| verdict.merchant_id == other_merchant_id())
        .expect("closed merchant audited");
    assert_eq!(
        closed_verdict.result.reason_codes(),
        vec!["business_closed_outside_hours"]
    );
    assert!(verdicts
        .iter()
        .any(|verdict| verdict.merchant_id == merchant_id() && verdict.result.is_eligible()));
}

#[test]
fn inspect_evaluates_without_a_session() {
    let service = build_service(vec![eligible_snapshot(None)]);

    let present = service
        .inspect(&merchant_id(), monday_noon())
        .expect("inspect runs");
    let missing = service
        .inspect(&other_merchant_id(), monday_noon())
        .expect("inspect runs");

    assert!(present.is_eligible());
    assert_eq!(missing.reason_codes(), vec!["merchant_not_found"]);
}
