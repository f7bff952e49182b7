use std::sync::{Arc, Mutex};
use std::time::Duration;

use orca_cli::{run, Flow, Output, Session};
use orca_client::{lock_store, ApiError, OrcaApi, SchedulerPhase};
use orca_core::{CorpusStatus, JobStatus, PollSettings, SearchRecord};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct FakeApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    searches: Vec<SearchRecord>,
    fetches: usize,
    created: Vec<String>,
    deleted: Vec<String>,
}

impl FakeApi {
    fn with_searches(searches: Vec<SearchRecord>) -> Arc<Self> {
        let api = Self::default();
        api.state.lock().unwrap().searches = searches;
        Arc::new(api)
    }

    fn fetches(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }
}

#[async_trait::async_trait]
impl OrcaApi for FakeApi {
    async fn fetch_status(&self) -> Result<CorpusStatus, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        Ok(CorpusStatus {
            api_version: Some("2.1.0".to_string()),
            checksum: Some("abc".to_string()),
            total_documents: Some(10),
            searches: state.searches.clone(),
        })
    }

    async fn create_search(&self, search_str: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.created.push(search_str.to_string());
        let uid = format!("created-{}", state.created.len());
        state.searches.insert(0, record(&uid, search_str));
        Ok(())
    }

    async fn delete_search(&self, uid: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.deleted.push(uid.to_string());
        state.searches.retain(|search| search.uid != uid);
        Ok(())
    }
}

fn record(uid: &str, search_str: &str) -> SearchRecord {
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

fn settings() -> PollSettings {
    PollSettings::new(Duration::from_millis(100), Duration::from_millis(800))
        .expect("valid intervals")
}

fn capture() -> (Output, Arc<Mutex<Vec<u8>>>) {
    let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
    let out: Output = buffer.clone();
    (out, buffer)
}

fn text(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
}

fn take_text(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
    let written = text(buffer);
    buffer.lock().unwrap().clear();
    written
}

fn init_logging() {
    orca_logging::initialize_for_tests();
}

#[tokio::test(start_paused = true)]
async fn search_command_creates_and_shows_new_row() {
    init_logging();
    let api = FakeApi::with_searches(vec![record("s1", "whales")]);
    let (out, buffer) = capture();
    let mut session = Session::new(api.clone(), settings(), out);

    session.start().await;
    let startup = take_text(&buffer);
    assert!(startup.starts_with("commands: "));
    assert!(startup.contains("[search] + s1 \"whales\" started, 0 results\n"));

    let flow = session.handle_line("search   orcas ").await;

    assert_eq!(flow, Flow::Continue);
    assert_eq!(api.created(), vec!["orcas".to_string()]);
    assert_eq!(api.fetches(), 2);
    assert_eq!(
        take_text(&buffer),
        "[search] + created-1 \"orcas\" started, 0 results\n"
    );
}

#[tokio::test(start_paused = true)]
async fn blank_search_shows_validation_error() {
    init_logging();
    let api = FakeApi::with_searches(Vec::new());
    let (out, buffer) = capture();
    let mut session = Session::new(api.clone(), settings(), out);
    session.start().await;
    take_text(&buffer);

    session.handle_line("search").await;

    assert!(api.created().is_empty());
    assert_eq!(take_text(&buffer), "[error] search string is empty\n");
}

#[tokio::test(start_paused = true)]
async fn delete_asks_then_removes_on_yes() {
    init_logging();
    let api = FakeApi::with_searches(vec![record("s1", "whales"), record("s2", "orcas")]);
    let (out, buffer) = capture();
    let mut session = Session::new(api.clone(), settings(), out);
    session.start().await;
    take_text(&buffer);

    session.handle_line("delete s1").await;

    let asked = take_text(&buffer);
    assert!(asked.contains("polling paused"));
    assert!(asked.ends_with("delete search s1? (yes/no)\n"));
    assert!(session.controls().pending_delete().is_some());
    assert!(!lock_store(session.store()).get().is_polling_enabled);

    session.handle_line("yes").await;

    assert_eq!(api.deleted(), vec!["s1".to_string()]);
    assert!(session.controls().pending_delete().is_none());
    let confirmed = take_text(&buffer);
    assert!(confirmed.contains("polling on"));
    assert!(confirmed.ends_with("[search] - s1\n"));
    assert!(lock_store(session.store()).get().is_polling_enabled);
}

#[tokio::test(start_paused = true)]
async fn answering_without_prompt_is_explained() {
    init_logging();
    let api = FakeApi::with_searches(vec![record("s1", "whales")]);
    let (out, buffer) = capture();
    let mut session = Session::new(api.clone(), settings(), out);
    session.start().await;
    take_text(&buffer);

    session.handle_line("yes").await;
    session.handle_line("frobnicate").await;

    assert!(api.deleted().is_empty());
    assert_eq!(
        take_text(&buffer),
        "no delete is waiting for confirmation\n\
         unknown command 'frobnicate'; type help for a list\n"
    );
}

#[tokio::test(start_paused = true)]
async fn dropped_commands_explain_themselves() {
    init_logging();
    let api = FakeApi::with_searches(vec![record("s1", "whales")]);
    let (out, buffer) = capture();
    let mut session = Session::new(api.clone(), settings(), out);
    session.start().await;
    take_text(&buffer);

    session.handle_line("delete s9").await;
    assert_eq!(take_text(&buffer), "no search with uid s9\n");

    session.handle_line("delete s1").await;
    take_text(&buffer);
    session.handle_line("search orcas").await;

    assert!(api.created().is_empty());
    assert_eq!(api.fetches(), 1);
    assert_eq!(
        take_text(&buffer),
        "answer the pending delete of s1 first (yes/no)\n"
    );
    assert!(session.controls().pending_delete().is_some());
}

#[tokio::test(start_paused = true)]
async fn quit_disposes_scheduler() {
    init_logging();
    let api = FakeApi::with_searches(Vec::new());
    let (out, _buffer) = capture();
    let session = Session::new(api.clone(), settings(), out);
    let scheduler = session.scheduler().clone();

    run(session, &b"pause\nquit\nsearch never\n"[..])
        .await
        .expect("session ends cleanly");

    assert_eq!(scheduler.phase(), SchedulerPhase::Idle);
    assert!(api.created().is_empty());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(api.fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn end_of_input_cancels_open_prompt() {
    init_logging();
    let api = FakeApi::with_searches(vec![record("s1", "whales")]);
    let (out, _buffer) = capture();
    let session = Session::new(api.clone(), settings(), out);
    let store = session.store().clone();
    let scheduler = session.scheduler().clone();

    run(session, &b"delete s1\n"[..])
        .await
        .expect("session ends cleanly");

    assert!(api.deleted().is_empty());
    assert!(lock_store(&store).get().is_polling_enabled);
    assert_eq!(scheduler.phase(), SchedulerPhase::Idle);
}
