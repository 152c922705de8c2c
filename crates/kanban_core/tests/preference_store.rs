use kanban_core::db::{open_db, open_db_in_memory};
use kanban_core::{
    load_preference, save_preference, GroupKey, Preference, PreferenceStore, SortKey,
    SqlitePreferenceStore, PREFERENCE_STORAGE_KEY,
};

#[test]
fn sqlite_store_reads_none_for_missing_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePreferenceStore::new(&conn);

    assert_eq!(store.read(PREFERENCE_STORAGE_KEY).unwrap(), None);
    assert_eq!(load_preference(&store), Preference::default());
}

#[test]
fn sqlite_store_overwrites_existing_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePreferenceStore::new(&conn);

    store.write("k", "first").unwrap();
    store.write("k", "second").unwrap();
    assert_eq!(store.read("k").unwrap().as_deref(), Some("second"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM preferences;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn preference_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");
    let preference = Preference::new(GroupKey::Actor, SortKey::Title);

    {
        let conn = open_db(&path).unwrap();
        save_preference(&SqlitePreferenceStore::new(&conn), &preference).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqlitePreferenceStore::new(&conn);
    assert_eq!(load_preference(&store), preference);
    assert_eq!(
        store.read(PREFERENCE_STORAGE_KEY).unwrap().as_deref(),
        Some(r#"{"grouping":"user","sorting":"title"}"#)
    );
}

#[test]
fn corrupted_row_falls_back_to_defaults() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePreferenceStore::new(&conn);
    store
        .write(PREFERENCE_STORAGE_KEY, r#"{"grouping":"status","sorting":42}"#)
        .unwrap();

    assert_eq!(load_preference(&store), Preference::default());
}

#[test]
fn changing_one_key_keeps_the_other_stored_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePreferenceStore::new(&conn);
    save_preference(&store, &Preference::new(GroupKey::Status, SortKey::Title)).unwrap();

    let mut preference = load_preference(&store);
    preference.group_key = GroupKey::Priority;
    save_preference(&store, &preference).unwrap();

    assert_eq!(
        load_preference(&SqlitePreferenceStore::new(&conn)),
        Preference::new(GroupKey::Priority, SortKey::Title)
    );
}
