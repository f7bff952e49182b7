#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use orca_client::{shared_store, ApiError, FailureKind, OrcaApi, PollScheduler, SharedStore};
use orca_core::{CorpusStatus, JobStatus, PollSettings, SearchRecord, StateStore};
use tokio::time::Instant;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(orca_logging::initialize_for_tests);
}

pub fn record(uid: &str, search_str: &str) -> SearchRecord {
    SearchRecord {
        uid: uid.to_string(),
        checksum: format!("{uid}-v1"),
        search_str: search_str.to_string(),
        status: JobStatus::Started,
        results: 0,
        created_at: None,
        updated_at: None,
        megadocs: Vec::new(),
    }
}

pub fn corpus(checksum: &str, total: u64, searches: Vec<SearchRecord>) -> CorpusStatus {
    CorpusStatus {
        api_version: Some("2.1.0".to_string()),
        checksum: Some(checksum.to_string()),
        total_documents: Some(total),
        searches,
    }
}

pub fn settings(min_ms: u64, max_ms: u64) -> PollSettings {
    PollSettings::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
        .expect("valid poll settings")
}

/// In-memory stand-in for the ORCA service.
///
/// `create_search` and `delete_search` change the served state the way the real
/// service would, so the next fetch observes a new fingerprint.
#[derive(Default)]
pub struct FakeApi {
    status: Mutex<Option<Result<CorpusStatus, ApiError>>>,
    latency: Mutex<Duration>,
    mutation_error: Mutex<Option<ApiError>>,
    fetches: Mutex<Vec<Instant>>,
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    next_uid: Mutex<u32>,
}

impl FakeApi {
    pub fn serving(status: CorpusStatus) -> Arc<Self> {
        let api = Self::default();
        api.set_status(Ok(status));
        Arc::new(api)
    }

    pub fn set_status(&self, status: Result<CorpusStatus, ApiError>) {
        *self.status.lock().unwrap() = Some(status);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn fail_mutations(&self, err: ApiError) {
        *self.mutation_error.lock().unwrap() = Some(err);
    }

    pub fn fetches(&self) -> Vec<Instant> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn mutation_error(&self) -> Option<ApiError> {
        self.mutation_error.lock().unwrap().clone()
    }

    fn edit_searches(&self, edit: impl FnOnce(&mut Vec<SearchRecord>)) {
        if let Some(Ok(status)) = self.status.lock().unwrap().as_mut() {
            edit(&mut status.searches);
        }
    }
}

#[async_trait::async_trait]
impl OrcaApi for FakeApi {
    async fn fetch_status(&self) -> Result<CorpusStatus, ApiError> {
        self.fetches.lock().unwrap().push(Instant::now());
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.status
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ApiError::new(FailureKind::Transport, "no status configured")))
    }

    async fn create_search(&self, search_str: &str) -> Result<(), ApiError> {
        if let Some(err) = self.mutation_error() {
            return Err(err);
        }
        self.created.lock().unwrap().push(search_str.to_string());
        let uid = {
            let mut next = self.next_uid.lock().unwrap();
            *next += 1;
            format!("created-{}", *next)
        };
        // Newest first, as the service reports them.
        self.edit_searches(|searches| searches.insert(0, record(&uid, search_str)));
        Ok(())
    }

    async fn delete_search(&self, uid: &str) -> Result<(), ApiError> {
        if let Some(err) = self.mutation_error() {
            return Err(err);
        }
        self.deleted.lock().unwrap().push(uid.to_string());
        self.edit_searches(|searches| searches.retain(|search| search.uid != uid));
        Ok(())
    }
}

pub fn scheduler_for(api: Arc<FakeApi>, settings: PollSettings) -> (PollScheduler, SharedStore) {
    let store = shared_store(StateStore::new());
    let scheduler = PollScheduler::new(api, store.clone(), settings);
    (scheduler, store)
}
