use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::access::{authorize, AccessError, MerchantSession};
use super::domain::{MerchantId, MerchantSnapshot, SubscriptionStatus};
use super::evaluator::{evaluate, EligibilityResult};
use super::repository::{DirectoryError, MerchantDirectory, SessionStore};

pub type Clock = fn() -> DateTime<Utc>;

/// Service composing the session store, merchant directory, and evaluator.
pub struct EligibilityService<D, S> {
    directory: Arc<D>,
    sessions: Arc<S>,
    clock: Clock,
}

impl<D, S> EligibilityService<D, S>
where
    D: MerchantDirectory + 'static,
    S: SessionStore + 'static,
{
    pub fn new(directory: Arc<D>, sessions: Arc<S>) -> Self {
        Self::with_clock(directory, sessions, Utc::now)
    }

    pub fn with_clock(directory: Arc<D>, sessions: Arc<S>, clock: Clock) -> Self {
        Self {
            directory,
            sessions,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Resolve the caller's session from a bearer token, if one was presented.
    pub fn session(
        &self,
        token: Option<&str>,
    ) -> Result<Option<MerchantSession>, EligibilityServiceError> {
        match token {
            Some(token) => Ok(self.sessions.resolve(token)?),
            None => Ok(None),
        }
    }

    pub fn check(
        &self,
        session: Option<&MerchantSession>,
        merchant_id: &MerchantId,
    ) -> Result<EligibilityResult, EligibilityServiceError> {
        self.check_at(session, merchant_id, self.now())
    }

    /// Authorize, fetch, then evaluate. Nothing is read before access is granted.
    pub fn check_at(
        &self,
        session: Option<&MerchantSession>,
        merchant_id: &MerchantId,
        now: DateTime<Utc>,
    ) -> Result<EligibilityResult, EligibilityServiceError> {
        self.authorize(session, merchant_id)?;
        let snapshot = self.directory.fetch(merchant_id)?;
        Ok(self.evaluate_snapshot(merchant_id, snapshot.as_ref(), now))
    }

    /// Console summary for a workspace; `None` when the merchant does not exist.
    pub fn overview(
        &self,
        session: Option<&MerchantSession>,
        merchant_id: &MerchantId,
    ) -> Result<Option<WorkspaceOverview>, EligibilityServiceError> {
        self.authorize(session, merchant_id)?;
        let operator_email = session.map(|session| session.email.clone()).unwrap_or_default();

        let Some(snapshot) = self.directory.fetch(merchant_id)? else {
            return Ok(None);
        };

        let eligibility = self.evaluate_snapshot(merchant_id, Some(&snapshot), self.now());
        let subscription = snapshot
            .latest_subscription()
            .map(|subscription| SubscriptionSummary {
                plan_name: subscription.plan_name.clone(),
                status: subscription.status,
            });

        Ok(Some(WorkspaceOverview {
            workspace_id: snapshot.id,
            company_name: snapshot.company_name.clone(),
            operator_email,
            eligibility,
            subscription,
        }))
    }

    /// Operator-side lookup of a single merchant. No session is consulted.
    pub fn inspect(
        &self,
        merchant_id: &MerchantId,
        now: DateTime<Utc>,
    ) -> Result<EligibilityResult, EligibilityServiceError> {
        let snapshot = self.directory.fetch(merchant_id)?;
        Ok(self.evaluate_snapshot(merchant_id, snapshot.as_ref(), now))
    }

    /// Operator-side sweep over every merchant in the directory.
    pub fn audit(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<MerchantVerdict>, EligibilityServiceError> {
        let merchants = self.directory.list()?;
        Ok(merchants
            .iter()
            .map(|snapshot| MerchantVerdict {
                merchant_id: snapshot.id,
                company_name: snapshot.company_name.clone(),
                result: self.evaluate_snapshot(&snapshot.id, Some(snapshot), now),
            })
            .collect())
    }

    fn authorize(
        &self,
        session: Option<&MerchantSession>,
        merchant_id: &MerchantId,
    ) -> Result<(), EligibilityServiceError> {
        authorize(session, merchant_id).map_err(|err| {
            warn!(
                %merchant_id,
                user_id = session.map(|session| session.user_id.as_str()).unwrap_or("anonymous"),
                "eligibility access denied"
            );
            EligibilityServiceError::from(err)
        })
    }

    fn evaluate_snapshot(
        &self,
        merchant_id: &MerchantId,
        snapshot: Option<&MerchantSnapshot>,
        now: DateTime<Utc>,
    ) -> EligibilityResult {
        let result = evaluate(snapshot, now);
        info!(
            %merchant_id,
            eligible = result.is_eligible(),
            reasons = ?result.reason_codes(),
            "eligibility evaluated"
        );
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    pub status: SubscriptionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceOverview {
    pub workspace_id: MerchantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub operator_email: String,
    pub eligibility: EligibilityResult,
    pub subscription: Option<SubscriptionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantVerdict {
    pub merchant_id: MerchantId,
    pub company_name: Option<String>,
    pub result: EligibilityResult,
}

#[derive(Debug, thiserror::Error)]
pub enum EligibilityServiceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
