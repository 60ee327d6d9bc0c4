use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for merchant workspaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(pub Uuid);

impl MerchantId {
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for MerchantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Onboarding review state of a merchant's documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Suspended,
}

impl ComplianceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::Pending => "PENDING",
            ComplianceStatus::UnderReview => "UNDER_REVIEW",
            ComplianceStatus::Approved => "APPROVED",
            ComplianceStatus::Rejected => "REJECTED",
            ComplianceStatus::Suspended => "SUSPENDED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Expired,
}

impl SubscriptionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Trialing => "TRIALING",
            SubscriptionStatus::PastDue => "PAST_DUE",
            SubscriptionStatus::Canceled => "CANCELED",
            SubscriptionStatus::Expired => "EXPIRED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssistantStatus {
    Active,
    Paused,
    Offline,
    Disabled,
}

impl AssistantStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AssistantStatus::Active => "ACTIVE",
            AssistantStatus::Paused => "PAUSED",
            AssistantStatus::Offline => "OFFLINE",
            AssistantStatus::Disabled => "DISABLED",
        }
    }
}

/// Billing subscription as recorded by the data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
}

impl Subscription {
    /// Active status with a billing period that has not lapsed at `now`.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active
            && self.current_period_end.map_or(true, |end| end >= now)
    }
}

/// Storefront profile. The working hours stay raw so malformed payloads reach the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantProfile {
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub working_hours_json: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAssistant {
    pub status: AssistantStatus,
    pub updated_at: DateTime<Utc>,
}

/// Read-only view of a merchant as supplied by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSnapshot {
    pub id: MerchantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub compliance_status: ComplianceStatus,
    pub timezone: String,
    /// Most recent first.
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub profiles: Vec<MerchantProfile>,
    #[serde(default)]
    pub ai_assistants: Vec<AiAssistant>,
}

impl MerchantSnapshot {
    pub fn latest_subscription(&self) -> Option<&Subscription> {
        self.subscriptions.first()
    }

    pub fn primary_profile(&self) -> Option<&MerchantProfile> {
        self.profiles.iter().find(|profile| profile.is_primary)
    }

    /// Most recently updated assistant in `ACTIVE` status.
    pub fn active_assistant(&self) -> Option<&AiAssistant> {
        self.ai_assistants
            .iter()
            .filter(|assistant| assistant.status == AssistantStatus::Active)
            .max_by_key(|assistant| assistant.updated_at)
    }

    pub fn working_hours(&self) -> Option<&serde_json::Value> {
        self.primary_profile()
            .and_then(|profile| profile.working_hours_json.as_ref())
    }
}
