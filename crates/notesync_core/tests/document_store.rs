use notesync_core::store::{
    Document, DocumentStore, Fields, SnapshotListener, SqliteDocumentStore, StoreError,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

fn fields(title: &str) -> Fields {
    json!({ "title": title, "description": "body" })
        .as_object()
        .cloned()
        .unwrap()
}

fn titles(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|document| document.fields["title"].as_str().unwrap().to_string())
        .collect()
}

/// Records every snapshot (as titles) or error message a listener receives.
fn recorder() -> (Arc<Mutex<Vec<Result<Vec<String>, String>>>>, SnapshotListener) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener: SnapshotListener = Arc::new(move |event: Result<&[Document], &StoreError>| {
        sink.lock()
            .push(event.map(titles).map_err(|err| err.to_string()));
    });
    (seen, listener)
}

#[tokio::test]
async fn add_get_set_delete_round_trip() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();

    let id = store.add_document("note", fields("first")).await.unwrap();
    assert_eq!(id.len(), 32);

    let loaded = store.get_document("note", &id).await.unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.fields, fields("first"));

    store.set_document("note", &id, fields("second")).await.unwrap();
    let loaded = store.get_document("note", &id).await.unwrap().unwrap();
    assert_eq!(loaded.fields["title"], "second");

    store.delete_document("note", &id).await.unwrap();
    assert!(store.get_document("note", &id).await.unwrap().is_none());
}

#[tokio::test]
async fn set_creates_missing_documents_and_delete_of_missing_is_ok() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();

    store.set_document("note", "chosen", fields("upserted")).await.unwrap();
    let loaded = store.get_document("note", "chosen").await.unwrap().unwrap();
    assert_eq!(loaded.fields["title"], "upserted");

    store.delete_document("note", "never-existed").await.unwrap();
}

#[tokio::test]
async fn collections_are_isolated() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let id = store.add_document("note", fields("a")).await.unwrap();

    assert!(store.get_document("archive", &id).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_names_are_rejected_before_io() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();

    let err = store.add_document("a/b", fields("x")).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidCollection(_)));

    let err = store.get_document("note", "  ").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidDocumentId(_)));

    let (seen, listener) = recorder();
    let registration = store.subscribe_collection("", listener);
    assert_eq!(seen.lock().len(), 1);
    assert!(seen.lock()[0].is_err());
    assert_eq!(store.listener_count(""), 0);
    drop(registration);
}

#[tokio::test]
async fn listeners_get_initial_and_ordered_full_snapshots() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    store.add_document("note", fields("a")).await.unwrap();

    let (seen, listener) = recorder();
    let registration = store.subscribe_collection("note", listener);
    assert_eq!(store.listener_count("note"), 1);

    let b = store.add_document("note", fields("b")).await.unwrap();
    store.set_document("note", &b, fields("b2")).await.unwrap();
    store.add_document("archive", fields("elsewhere")).await.unwrap();
    store.delete_document("note", "missing").await.unwrap();
    store.delete_document("note", &b).await.unwrap();

    let expected: Vec<Result<Vec<String>, String>> = vec![
        Ok(vec!["a".into()]),
        Ok(vec!["a".into(), "b".into()]),
        Ok(vec!["a".into(), "b2".into()]),
        Ok(vec!["a".into()]),
    ];
    assert_eq!(*seen.lock(), expected);

    drop(registration);
    assert_eq!(store.listener_count("note"), 0);

    store.add_document("note", fields("c")).await.unwrap();
    assert_eq!(seen.lock().len(), expected.len());
}

#[tokio::test]
async fn explicit_remove_deregisters_once() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let (_first_seen, first) = recorder();
    let (_second_seen, second) = recorder();

    let first = store.subscribe_collection("note", first);
    let _second = store.subscribe_collection("note", second);
    assert_eq!(store.listener_count("note"), 2);

    first.remove();
    assert_eq!(store.listener_count("note"), 1);
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let id = {
        let store = SqliteDocumentStore::open(&path).unwrap();
        store.add_document("note", fields("kept")).await.unwrap()
    };

    let store = SqliteDocumentStore::open(&path).unwrap();
    let loaded = store.get_document("note", &id).await.unwrap().unwrap();
    assert_eq!(loaded.fields["title"], "kept");
}
