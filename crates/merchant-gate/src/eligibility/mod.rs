//! Storefront eligibility gating for discovery.
//!
//! A merchant is exposed to search only while its subscription is current, its
//! compliance review is approved, and either its storefront is open or an AI assistant
//! is online to answer on its behalf. [`evaluate`] is the pure decision core; the
//! service and router wrap it with session checks and directory lookups.

pub mod access;
pub mod domain;
pub mod evaluator;
pub mod hours;
pub mod repository;
pub mod router;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use access::{authorize, AccessError, MerchantSession, UserType};
pub use domain::{
    AiAssistant, AssistantStatus, ComplianceStatus, MerchantId, MerchantProfile, MerchantSnapshot,
    Subscription, SubscriptionStatus,
};
pub use evaluator::{evaluate, EligibilityContext, EligibilityReason, EligibilityResult};
pub use hours::{
    is_open_now, resolve_schedule, ScheduleResolution, TimeSegment, UnknownSchedule,
    WeeklySchedule,
};
pub use repository::{DirectoryError, MerchantDirectory, SessionStore};
pub use router::eligibility_router;
pub use seed::{SeedData, SeedError, SeededSession};
pub use service::{
    EligibilityService, EligibilityServiceError, MerchantVerdict, SubscriptionSummary,
    WorkspaceOverview,
};
