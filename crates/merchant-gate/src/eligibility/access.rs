use serde::{Deserialize, Serialize};

use super::domain::MerchantId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    #[default]
    Consumer,
    Merchant,
    Staff,
}

/// Authenticated caller as issued by the external auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSession {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<MerchantId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merchant_ids: Vec<MerchantId>,
}

impl MerchantSession {
    pub fn can_access(&self, merchant_id: &MerchantId) -> bool {
        self.merchant_id.as_ref() == Some(merchant_id) || self.merchant_ids.contains(merchant_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("unauthorized access to workspace {merchant_id}")]
    Forbidden { merchant_id: MerchantId },
}

/// Runs before any merchant data is fetched.
pub fn authorize(
    session: Option<&MerchantSession>,
    merchant_id: &MerchantId,
) -> Result<(), AccessError> {
    let session = session.ok_or(AccessError::Unauthenticated)?;
    if session.can_access(merchant_id) {
        Ok(())
    } else {
        Err(AccessError::Forbidden {
            merchant_id: *merchant_id,
        })
    }
}
