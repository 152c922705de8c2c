use kanban_core::{
    save_preference, Actor, BoardService, BoardSnapshot, BoardSource, BoardState, GroupKey,
    MemoryPreferenceStore, Preference, PreferenceStore, Priority, ServiceError, SortKey,
    SourceError, SourceResult, StaticBoardSource, WorkItem, PREFERENCE_STORAGE_KEY,
};

struct FailingSource;

impl BoardSource for FailingSource {
    fn fetch_snapshot(&self) -> SourceResult<BoardSnapshot> {
        Err(SourceError::Status(503))
    }

    fn kind(&self) -> &'static str {
        "failing"
    }
}

fn snapshot() -> BoardSnapshot {
    BoardSnapshot::new(
        vec![
            WorkItem::new("T1", "Fix bug", "Todo", Priority::Urgent, "u1"),
            WorkItem::new("T2", "Docs", "Todo", Priority::Low, "u2"),
            WorkItem::new("T3", "Deploy", "Done", Priority::Medium, "u1"),
        ],
        vec![Actor::new("u1", "Alice"), Actor::new("u2", "Bob")],
    )
}

#[test]
fn partition_is_not_ready_before_load() {
    let store = MemoryPreferenceStore::new();
    let service = BoardService::new(StaticBoardSource::new(snapshot()), &store);

    assert_eq!(service.state(), &BoardState::Loading);
    assert!(matches!(service.partition(), Err(ServiceError::NotReady)));
}

#[test]
fn failed_fetch_reports_unavailable_and_never_partitions() {
    let store = MemoryPreferenceStore::new();
    let mut service = BoardService::new(FailingSource, &store);

    match service.load() {
        BoardState::Unavailable(message) => assert!(message.contains("503")),
        other => panic!("unexpected state: {other:?}"),
    }
    assert!(matches!(service.partition(), Err(ServiceError::NotReady)));
}

#[test]
fn loaded_board_uses_default_preference() {
    let store = MemoryPreferenceStore::new();
    let mut service = BoardService::new(StaticBoardSource::new(snapshot()), &store);
    service.load();

    let board = service.partition().unwrap();
    assert_eq!(board.labels(), vec!["Todo", "Done"]);
    assert_eq!(service.state().as_str(), "ready");
}

#[test]
fn stored_preference_is_restored_at_startup() {
    let store = MemoryPreferenceStore::new();
    save_preference(&store, &Preference::new(GroupKey::Priority, SortKey::Title)).unwrap();

    let mut service = BoardService::new(StaticBoardSource::new(snapshot()), &store);
    service.load();

    let board = service.partition().unwrap();
    assert_eq!(board.labels(), vec!["Urgent", "Low", "Medium"]);
}

#[test]
fn invalid_stored_preference_is_discarded() {
    let store = MemoryPreferenceStore::new();
    store
        .write(PREFERENCE_STORAGE_KEY, r#"{"grouping":"team"}"#)
        .unwrap();

    let service = BoardService::new(StaticBoardSource::new(snapshot()), &store);
    assert_eq!(service.preference(), Preference::default());
}

#[test]
fn preference_changes_are_persisted() {
    let store = MemoryPreferenceStore::new();
    let mut service = BoardService::new(StaticBoardSource::new(snapshot()), &store);

    service.set_group_key(GroupKey::Actor).unwrap();
    service.set_sort_key(SortKey::Title).unwrap();

    assert_eq!(
        store.read(PREFERENCE_STORAGE_KEY).unwrap().as_deref(),
        Some(r#"{"grouping":"user","sorting":"title"}"#)
    );

    service.load();
    let board = service.partition().unwrap();
    let alice: Vec<&str> = board
        .get("Alice")
        .unwrap()
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(alice, vec!["T3", "T1"]);
}

#[test]
fn unknown_actor_surfaces_as_board_error() {
    let mut data = snapshot();
    data.items
        .push(WorkItem::new("T4", "Orphan", "Todo", Priority::High, "u404"));
    let store = MemoryPreferenceStore::new();
    let mut service = BoardService::new(StaticBoardSource::new(data), &store);
    service.load();
    service.set_group_key(GroupKey::Actor).unwrap();

    let err = service.partition().unwrap_err();
    assert!(matches!(err, ServiceError::Board(_)));
    assert!(err.to_string().contains("u404"));
}
