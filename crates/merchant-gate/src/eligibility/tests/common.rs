use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::eligibility::access::{MerchantSession, UserType};
use crate::eligibility::domain::{
    AiAssistant, AssistantStatus, ComplianceStatus, MerchantId, MerchantProfile,
    MerchantSnapshot, Subscription, SubscriptionStatus,
};
use crate::eligibility::repository::{DirectoryError, MerchantDirectory, SessionStore};
use crate::eligibility::{eligibility_router, EligibilityService};

pub(super) const OWNER_TOKEN: &str = "owner-token";
pub(super) const OUTSIDER_TOKEN: &str = "outsider-token";

pub(super) fn merchant_id() -> MerchantId {
    MerchantId(Uuid::from_u128(0x5b6f2d0e_8a43_4c1e_9d55_0f1e2a3b4c5d))
}

pub(super) fn other_merchant_id() -> MerchantId {
    MerchantId(Uuid::from_u128(0x0b8c1f7e_2d6a_4f43_9b1e_7c5d3a2f1e00))
}

pub(super) fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid instant")
}

/// Monday 2025-03-10, 12:00 UTC.
pub(super) fn monday_noon() -> DateTime<Utc> {
    utc(2025, 3, 10, 12, 0)
}

pub(super) fn monday_hours(open: &str, close: &str) -> Value {
    json!({ "monday": [{ "open": open, "close": close }] })
}

pub(super) fn eligible_snapshot(working_hours: Option<Value>) -> MerchantSnapshot {
    MerchantSnapshot {
        id: merchant_id(),
        company_name: Some("Padaria Central".to_string()),
        compliance_status: ComplianceStatus::Approved,
        timezone: "UTC".to_string(),
        subscriptions: vec![Subscription {
            status: SubscriptionStatus::Active,
            current_period_end: Some(monday_noon() + Duration::days(20)),
            plan_name: Some("Vitrine Pro".to_string()),
        }],
        profiles: vec![MerchantProfile {
            is_primary: true,
            working_hours_json: working_hours,
        }],
        ai_assistants: vec![AiAssistant {
            status: AssistantStatus::Active,
            updated_at: monday_noon() - Duration::days(2),
        }],
    }
}

pub(super) fn owner_session() -> MerchantSession {
    MerchantSession {
        user_id: "user-owner".to_string(),
        email: "owner@padaria.example".to_string(),
        user_type: UserType::Merchant,
        merchant_id: Some(merchant_id()),
        merchant_ids: vec![merchant_id(), other_merchant_id()],
    }
}

pub(super) fn outsider_session() -> MerchantSession {
    MerchantSession {
        user_id: "user-outsider".to_string(),
        email: "someone@elsewhere.example".to_string(),
        user_type: UserType::Consumer,
        merchant_id: None,
        merchant_ids: Vec::new(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    merchants: Arc<Mutex<HashMap<MerchantId, MerchantSnapshot>>>,
}

impl MemoryDirectory {
    pub(super) fn with(snapshots: Vec<MerchantSnapshot>) -> Self {
        let directory = Self::default();
        {
            let mut guard = directory.merchants.lock().expect("directory mutex poisoned");
            for snapshot in snapshots {
                guard.insert(snapshot.id, snapshot);
            }
        }
        directory
    }
}

impl MerchantDirectory for MemoryDirectory {
    fn fetch(&self, id: &MerchantId) -> Result<Option<MerchantSnapshot>, DirectoryError> {
        let guard = self.merchants.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<MerchantSnapshot>, DirectoryError> {
        let guard = self.merchants.lock().expect("directory mutex poisoned");
        let mut merchants: Vec<_> = guard.values().cloned().collect();
        merchants.sort_by_key(|snapshot| snapshot.id);
        Ok(merchants)
    }
}

pub(super) struct UnavailableDirectory;

impl MerchantDirectory for UnavailableDirectory {
    fn fetch(&self, _id: &MerchantId) -> Result<Option<MerchantSnapshot>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<MerchantSnapshot>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    sessions: Arc<HashMap<String, MerchantSession>>,
}

impl MemorySessions {
    pub(super) fn standard() -> Self {
        let mut sessions = HashMap::new();
        sessions.insert(OWNER_TOKEN.to_string(), owner_session());
        sessions.insert(OUTSIDER_TOKEN.to_string(), outsider_session());
        Self {
            sessions: Arc::new(sessions),
        }
    }
}

impl SessionStore for MemorySessions {
    fn resolve(&self, token: &str) -> Result<Option<MerchantSession>, DirectoryError> {
        Ok(self.sessions.get(token).cloned())
    }
}

pub(super) fn build_service(
    snapshots: Vec<MerchantSnapshot>,
) -> EligibilityService<MemoryDirectory, MemorySessions> {
    EligibilityService::with_clock(
        Arc::new(MemoryDirectory::with(snapshots)),
        Arc::new(MemorySessions::standard()),
        monday_noon,
    )
}

pub(super) fn router_with_service(
    service: EligibilityService<MemoryDirectory, MemorySessions>,
) -> axum::Router {
    eligibility_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
