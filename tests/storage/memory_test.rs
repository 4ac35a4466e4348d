//! In-memory store tests.

use linkgate::storage::{storage_ns, KeyValueStore, MemoryStore};

#[tokio::test]
async fn get_missing_is_none() {
    let store = MemoryStore::new();
    assert_eq!(store.get("nothing").await.expect("get"), None);
}

#[tokio::test]
async fn set_replaces_previous_value() {
    let store = MemoryStore::new();
    let key = storage_ns("linkgate", "trusted-external-link");
    store
        .set(&key, &["a.example".to_owned()])
        .await
        .expect("set 1");
    store
        .set(&key, &["b.example".to_owned(), "c.example".to_owned()])
        .await
        .expect("set 2");

    assert_eq!(
        store.get(&key).await.expect("get"),
        Some(vec!["b.example".to_owned(), "c.example".to_owned()])
    );
}

#[tokio::test]
async fn with_entry_prepopulates() {
    let store = MemoryStore::with_entry("k", vec!["example.org".to_owned()]);
    assert_eq!(
        store.get("k").await.expect("get"),
        Some(vec!["example.org".to_owned()])
    );
}
