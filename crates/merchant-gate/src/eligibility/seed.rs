use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::access::MerchantSession;
use super::domain::{MerchantId, MerchantSnapshot};

#[derive(Debug)]
pub enum SeedError {
    Io(std::io::Error),
    Json(serde_json::Error),
    DuplicateMerchant(MerchantId),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Io(err) => write!(f, "failed to read merchant seed: {}", err),
            SeedError::Json(err) => write!(f, "invalid merchant seed data: {}", err),
            SeedError::DuplicateMerchant(id) => {
                write!(f, "merchant {} appears more than once in the seed", id)
            }
        }
    }
}

impl std::error::Error for SeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeedError::Io(err) => Some(err),
            SeedError::Json(err) => Some(err),
            SeedError::DuplicateMerchant(_) => None,
        }
    }
}

impl From<std::io::Error> for SeedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeededSession {
    pub token: String,
    pub session: MerchantSession,
}

/// Fixture document hydrating the in-memory directory and session store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub merchants: Vec<MerchantSnapshot>,
    #[serde(default)]
    pub sessions: Vec<SeededSession>,
}

impl SeedData {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SeedError> {
        let seed: SeedData = serde_json::from_reader(reader)?;

        let mut seen = std::collections::HashSet::new();
        for merchant in &seed.merchants {
            if !seen.insert(merchant.id) {
                return Err(SeedError::DuplicateMerchant(merchant.id));
            }
        }

        Ok(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MERCHANT: &str = r#"{
        "id": "0b8c1f7e-2d6a-4f43-9b1e-7c5d3a2f1e00",
        "complianceStatus": "APPROVED",
        "timezone": "America/Sao_Paulo"
    }"#;

    #[test]
    fn reads_merchants_and_sessions() {
        let raw = format!(
            r#"{{"merchants":[{MERCHANT}],"sessions":[{{"token":"tok","session":{{"userId":"u1","email":"a@b.c"}}}}]}}"#
        );
        let seed = SeedData::from_reader(Cursor::new(raw)).expect("seed parses");
        assert_eq!(seed.merchants.len(), 1);
        assert_eq!(seed.sessions[0].token, "tok");
    }

    #[test]
    fn rejects_duplicate_merchants() {
        let raw = format!(r#"{{"merchants":[{MERCHANT},{MERCHANT}]}}"#);
        let err = SeedData::from_reader(Cursor::new(raw)).expect_err("duplicates rejected");
        assert!(matches!(err, SeedError::DuplicateMerchant(_)));
    }

    #[test]
    fn reports_invalid_json() {
        let err = SeedData::from_reader(Cursor::new("{\"merchants\": [")).expect_err("bad json");
        assert!(err.to_string().starts_with("invalid merchant seed data"));
    }
}
