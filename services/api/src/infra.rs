use chrono::{DateTime, Utc};
use merchant_gate::eligibility::{
    DirectoryError, MerchantDirectory, MerchantId, MerchantSession, MerchantSnapshot, SeedData,
    SeedError, SessionStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, DirectoryError> {
    mutex
        .lock()
        .map_err(|_| DirectoryError::Unavailable(format!("{name} mutex poisoned")))
}

#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryMerchantDirectory {
    merchants: Arc<Mutex<HashMap<MerchantId, MerchantSnapshot>>>,
}

impl InMemoryMerchantDirectory {
    pub(crate) fn from_snapshots(snapshots: Vec<MerchantSnapshot>) -> Self {
        let merchants = snapshots
            .into_iter()
            .map(|snapshot| (snapshot.id, snapshot))
            .collect();
        Self {
            merchants: Arc::new(Mutex::new(merchants)),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.merchants.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl MerchantDirectory for InMemoryMerchantDirectory {
    fn fetch(&self, id: &MerchantId) -> Result<Option<MerchantSnapshot>, DirectoryError> {
        let guard = lock(&self.merchants, "directory")?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<MerchantSnapshot>, DirectoryError> {
        let guard = lock(&self.merchants, "directory")?;
        let mut merchants: Vec<_> = guard.values().cloned().collect();
        merchants.sort_by_key(|snapshot| snapshot.id);
        Ok(merchants)
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, MerchantSession>>>,
}

impl InMemorySessionStore {
    pub(crate) fn from_entries(
        entries: impl IntoIterator<Item = (String, MerchantSession)>,
    ) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(entries.into_iter().collect())),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl SessionStore for InMemorySessionStore {
    fn resolve(&self, token: &str) -> Result<Option<MerchantSession>, DirectoryError> {
        let guard = lock(&self.sessions, "session")?;
        Ok(guard.get(token).cloned())
    }
}

pub(crate) fn collaborators_from_seed(
    seed: SeedData,
) -> (InMemoryMerchantDirectory, InMemorySessionStore) {
    let directory = InMemoryMerchantDirectory::from_snapshots(seed.merchants);
    let sessions = InMemorySessionStore::from_entries(
        seed.sessions
            .into_iter()
            .map(|entry| (entry.token, entry.session)),
    );
    (directory, sessions)
}

/// Without a seed file the service starts with an empty directory.
pub(crate) fn load_collaborators(
    seed_path: Option<&Path>,
) -> Result<(InMemoryMerchantDirectory, InMemorySessionStore), SeedError> {
    let seed = match seed_path {
        Some(path) => SeedData::from_path(path)?,
        None => SeedData::default(),
    };
    Ok(collaborators_from_seed(seed))
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SEED: &str = r#"{
        "merchants": [
            { "id": "6f1d3c2b-9a8e-4b7c-8d6e-5f4a3b2c1d0e", "complianceStatus": "PENDING", "timezone": "UTC" },
            { "id": "1a2b3c4d-5e6f-4a1b-8c2d-3e4f5a6b7c8d", "complianceStatus": "APPROVED", "timezone": "UTC" }
        ],
        "sessions": [
            { "token": "tok-1", "session": { "userId": "u-1", "email": "a@example.com" } }
        ]
    }"#;

    #[test]
    fn seed_hydrates_directory_and_sessions() {
        let seed = SeedData::from_reader(Cursor::new(SEED)).expect("seed parses");
        let (directory, sessions) = collaborators_from_seed(seed);

        assert_eq!(directory.len(), 2);
        let listed = directory.list().expect("list");
        assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));

        let id = MerchantId::parse("6f1d3c2b-9a8e-4b7c-8d6e-5f4a3b2c1d0e").expect("valid id");
        assert!(directory.fetch(&id).expect("fetch").is_some());
        assert!(sessions.resolve("tok-1").expect("resolve").is_some());
        assert!(sessions.resolve("tok-2").expect("resolve").is_none());
    }

    #[test]
    fn missing_seed_path_yields_empty_collaborators() {
        let (directory, sessions) = load_collaborators(None).expect("empty collaborators");
        assert_eq!(directory.len(), 0);
        assert_eq!(sessions.len(), 0);
    }

    #[test]
    fn unreadable_seed_path_is_reported() {
        let err = load_collaborators(Some(Path::new("/nonexistent/merchants.json")))
            .expect_err("missing file");
        assert!(matches!(err, SeedError::Io(_)));
    }

    #[test]
    fn bundled_fixture_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/merchants.json");
        let (directory, sessions) = load_collaborators(Some(&path)).expect("fixture loads");

        assert_eq!(directory.len(), 2);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn parse_instant_normalises_offsets() {
        let instant = parse_instant("2025-03-10T09:00:00-03:00").expect("valid timestamp");
        assert_eq!(instant.to_rfc3339(), "2025-03-10T12:00:00+00:00");
        assert!(parse_instant("yesterday").is_err());
    }
}
