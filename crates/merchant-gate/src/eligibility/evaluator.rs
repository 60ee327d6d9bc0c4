use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{AssistantStatus, ComplianceStatus, MerchantSnapshot, SubscriptionStatus};
use super::hours::resolve_schedule;

/// Stable reason codes returned to discovery and the merchant console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityReason {
    MerchantNotFound,
    SubscriptionInactive,
    ComplianceNotApproved,
    AiAssistantOffline,
    BusinessClosedAndAiOffline,
    BusinessClosedOutsideHours,
}

impl EligibilityReason {
    pub fn code(&self) -> &'static str {
        match self {
            EligibilityReason::MerchantNotFound => "merchant_not_found",
            EligibilityReason::SubscriptionInactive => "subscription_inactive",
            EligibilityReason::ComplianceNotApproved => "compliance_not_approved",
            EligibilityReason::AiAssistantOffline => "ai_assistant_offline",
            EligibilityReason::BusinessClosedAndAiOffline => "business_closed_and_ai_offline",
            EligibilityReason::BusinessClosedOutsideHours => "business_closed_outside_hours",
        }
    }
}

/// Raw inputs behind a verdict, reported whether or not the checks passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<SubscriptionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_status: Option<ComplianceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_assistant_status: Option<AssistantStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open_now: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    is_eligible: bool,
    reasons: Vec<EligibilityReason>,
    context: EligibilityContext,
}

impl EligibilityResult {
    /// Eligibility is derived from the reason list, never set independently.
    pub fn from_reasons(reasons: Vec<EligibilityReason>, context: EligibilityContext) -> Self {
        Self {
            is_eligible: reasons.is_empty(),
            reasons,
            context,
        }
    }

    pub fn merchant_not_found() -> Self {
        Self::from_reasons(
            vec![EligibilityReason::MerchantNotFound],
            EligibilityContext::default(),
        )
    }

    pub fn is_eligible(&self) -> bool {
        self.is_eligible
    }

    pub fn reasons(&self) -> &[EligibilityReason] {
        &self.reasons
    }

    pub fn context(&self) -> &EligibilityContext {
        &self.context
    }

    pub fn reason_codes(&self) -> Vec<&'static str> {
        self.reasons.iter().map(EligibilityReason::code).collect()
    }
}

/// Decides whether a merchant's storefront may be exposed to discovery at `now`.
pub fn evaluate(snapshot: Option<&MerchantSnapshot>, now: DateTime<Utc>) -> EligibilityResult {
    let Some(merchant) = snapshot else {
        return EligibilityResult::merchant_not_found();
    };

    let mut reasons = Vec::new();

    let subscription = merchant.latest_subscription();
    if !subscription.is_some_and(|subscription| subscription.is_current(now)) {
        reasons.push(EligibilityReason::SubscriptionInactive);
    }

    if merchant.compliance_status != ComplianceStatus::Approved {
        reasons.push(EligibilityReason::ComplianceNotApproved);
    }

    let assistant = merchant.active_assistant();
    if assistant.is_none() {
        reasons.push(EligibilityReason::AiAssistantOffline);
    }

    let is_open_now =
        resolve_schedule(merchant.working_hours(), &merchant.timezone, now).is_open();
    let assistant_online =
        assistant.is_some_and(|assistant| assistant.status == AssistantStatus::Active);

    if !is_open_now && !assistant_online {
        reasons.push(EligibilityReason::BusinessClosedAndAiOffline);
    }

    if !is_open_now && reasons.is_empty() {
        reasons.push(EligibilityReason::BusinessClosedOutsideHours);
    }

    let context = EligibilityContext {
        subscription_status: subscription.map(|subscription| subscription.status),
        compliance_status: Some(merchant.compliance_status),
        ai_assistant_status: assistant.map(|assistant| assistant.status),
        is_open_now: Some(is_open_now),
    };

    EligibilityResult::from_reasons(reasons, context)
}
