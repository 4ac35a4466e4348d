//! Trust registry tests.

use std::sync::Arc;

use linkgate::registry::TrustRegistry;
use linkgate::storage::{KeyValueStore, MemoryStore};

use crate::common::{ReadOnlyStore, UnavailableStore, TEST_KEY};

async fn empty_registry() -> (TrustRegistry, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let registry = TrustRegistry::load(store.clone(), TEST_KEY).await;
    (registry, store)
}

#[tokio::test]
async fn starts_empty_without_stored_value() {
    let (registry, _) = empty_registry().await;
    assert!(registry.domains().is_empty());
    assert!(!registry.is_trusted("example.org"));
    assert!(!registry.is_degraded());
    assert_eq!(registry.key(), TEST_KEY);
}

#[tokio::test]
async fn remember_then_is_trusted() {
    let (registry, _) = empty_registry().await;
    registry.remember("example.org");
    assert!(registry.is_trusted("example.org"));
    assert!(!registry.is_trusted("other.org"));
}

#[tokio::test]
async fn remember_is_idempotent() {
    let (registry, store) = empty_registry().await;
    registry.remember("example.org");
    registry.remember("example.org");
    assert_eq!(registry.domains(), vec!["example.org".to_owned()]);

    registry.flush().await;
    let stored = store.get(TEST_KEY).await.expect("get");
    assert_eq!(stored, Some(vec!["example.org".to_owned()]));
}

#[tokio::test]
async fn membership_is_case_normalized() {
    let (registry, _) = empty_registry().await;
    registry.remember("Example.ORG");
    registry.remember("example.org");
    assert_eq!(registry.domains(), vec!["example.org".to_owned()]);
    assert!(registry.is_trusted("EXAMPLE.org"));
}

#[tokio::test]
async fn empty_domain_is_never_stored_or_trusted() {
    let (registry, _) = empty_registry().await;
    registry.remember("");
    registry.remember("   ");
    assert!(registry.domains().is_empty());
    assert!(!registry.is_trusted(""));
}

#[tokio::test]
async fn subdomains_are_distinct() {
    let (registry, _) = empty_registry().await;
    registry.remember("example.org");
    assert!(!registry.is_trusted("www.example.org"));
    assert!(!registry.is_trusted("api.example.org"));
}

#[tokio::test]
async fn preserves_insertion_order() {
    let (registry, store) = empty_registry().await;
    registry.remember("b.example");
    registry.remember("a.example");
    registry.remember("c.example");
    registry.flush().await;

    let expected = vec![
        "b.example".to_owned(),
        "a.example".to_owned(),
        "c.example".to_owned(),
    ];
    assert_eq!(registry.domains(), expected);
    assert_eq!(store.get(TEST_KEY).await.expect("get"), Some(expected));
}

#[tokio::test]
async fn load_sanitizes_stored_sequence() {
    let store = Arc::new(MemoryStore::with_entry(
        TEST_KEY,
        vec![
            "Example.org".to_owned(),
            String::new(),
            "example.org".to_owned(),
            " news.example ".to_owned(),
        ],
    ));
    let registry = TrustRegistry::load(store, TEST_KEY).await;
    assert_eq!(
        registry.domains(),
        vec!["example.org".to_owned(), "news.example".to_owned()]
    );
}

#[tokio::test]
async fn reload_sees_flushed_writes() {
    let store = Arc::new(MemoryStore::new());
    let first = TrustRegistry::load(store.clone(), TEST_KEY).await;
    first.remember("example.org");
    first.shutdown().await;

    let second = TrustRegistry::load(store, TEST_KEY).await;
    assert!(second.is_trusted("example.org"));
}

#[tokio::test]
async fn namespaces_are_isolated() {
    let store = Arc::new(MemoryStore::new());
    let a = TrustRegistry::load(store.clone(), "a:trusted-external-link").await;
    a.remember("example.org");
    a.flush().await;

    let b = TrustRegistry::load(store, "b:trusted-external-link").await;
    assert!(!b.is_trusted("example.org"));
}

#[tokio::test]
async fn unavailable_storage_degrades_silently() {
    let store = Arc::new(UnavailableStore::default());
    let registry = TrustRegistry::load(store.clone(), TEST_KEY).await;
    assert!(registry.is_degraded());
    assert!(!registry.is_trusted("example.org"));

    registry.remember("example.org");
    registry.flush().await;

    // Session-only trust, and no snapshot pushed over the unreadable data.
    assert!(registry.is_trusted("example.org"));
    assert_eq!(store.set_attempts(), 0);
}

#[tokio::test]
async fn failed_write_keeps_in_memory_trust() {
    let registry = TrustRegistry::load(Arc::new(ReadOnlyStore), TEST_KEY).await;
    assert!(!registry.is_degraded());

    registry.remember("example.org");
    registry.flush().await;

    assert!(registry.is_trusted("example.org"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_remember_persists_latest_sequence() {
    for round in 0..50 {
        let (registry, store) = empty_registry().await;
        let registry = Arc::new(registry);

        let threads: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.remember(&format!("d{i}.example")))
            })
            .collect();
        for thread in threads {
            thread.join().expect("remember thread");
        }

        registry.flush().await;
        let in_memory = registry.domains();
        assert_eq!(in_memory.len(), 8);
        let stored = store.get(TEST_KEY).await.expect("get");
        assert_eq!(stored, Some(in_memory), "round {round}");
    }
}

#[test]
fn load_outside_runtime_degrades_instead_of_panicking() {
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    let store = Arc::new(MemoryStore::with_entry(
        TEST_KEY,
        vec!["example.org".to_owned()],
    ));
    let mut cx = Context::from_waker(Waker::noop());
    let mut load = pin!(TrustRegistry::load(store.clone(), TEST_KEY));
    let registry = match load.as_mut().poll(&mut cx) {
        Poll::Ready(registry) => registry,
        Poll::Pending => panic!("memory-backed load should complete immediately"),
    };

    assert!(registry.is_degraded());
    assert!(registry.is_trusted("example.org"));

    registry.remember("other.org");
    assert!(registry.is_trusted("other.org"));
    let mut get = store.get(TEST_KEY);
    let stored = match get.as_mut().poll(&mut cx) {
        Poll::Ready(stored) => stored.expect("get"),
        Poll::Pending => panic!("memory get should complete immediately"),
    };
    assert_eq!(stored, Some(vec!["example.org".to_owned()]));
}
