//! Atomic removal semantics.

use crate::in_memory::helpers::{MemoryStore, clock, store};
use missive::message::domain::Message;
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn remove_returns_message_then_none(store: MemoryStore, clock: DefaultClock) {
    let message = Message::new("take me", &clock);
    store.add(message.clone()).await.expect("add");

    assert_eq!(store.remove(message.id()).await.expect("remove"), Some(message.clone()));
    assert_eq!(store.remove(message.id()).await.expect("remove"), None);
    assert_eq!(store.get(message.id()).await.expect("get"), None);
    assert_eq!(store.count().await.expect("count"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_removals_observe_message_exactly_once(
    store: MemoryStore,
    clock: DefaultClock,
) {
    let message = Message::new("contended", &clock);
    store.add(message.clone()).await.expect("add");

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let racer = store.clone();
            let id = message.id();
            tokio::spawn(async move { racer.remove(id).await })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        if let Some(removed) = handle.await.expect("task joins").expect("remove") {
            winners.push(removed);
        }
    }

    assert_eq!(winners, vec![message]);
    assert_eq!(store.count().await.expect("count"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_of_same_id_admit_one(store: MemoryStore, clock: DefaultClock) {
    let message = Message::new("contended", &clock);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let racer = store.clone();
            let copy = message.clone();
            tokio::spawn(async move { racer.add(copy).await })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        if handle.await.expect("task joins").is_ok() {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(store.count().await.expect("count"), 1);
}
