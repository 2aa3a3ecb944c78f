//! Add/get/remove/count against `PostgreSQL`.

use crate::postgres::helpers::{ParcelScanned, PgContext, clock, pg};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;
use missive::message::domain::{Message, MessageId, Payload};
use missive::message::error::MessageStoreError;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

#[rstest]
fn typed_message_round_trips(pg: PgContext, clock: DefaultClock) {
    let parcel = ParcelScanned {
        tracking: "1Z999".to_owned(),
        depot: "LHR-4".to_owned(),
    };
    let message = Message::builder(Payload::typed(parcel.clone()))
        .with_header("attempt", json!(2))
        .build(&clock)
        .expect("valid message");

    pg.rt.block_on(pg.store.add(message.clone())).expect("add");
    let fetched = pg
        .rt
        .block_on(pg.store.get(message.id()))
        .expect("get")
        .expect("message stored");

    assert_eq!(fetched, message);
    assert_eq!(fetched.payload().downcast_ref::<ParcelScanned>(), Some(&parcel));
}

#[rstest]
fn native_message_round_trips(pg: PgContext, clock: DefaultClock) {
    let message = Message::new(json!({"nested": {"list": [1, 2.5, null, true]}}), &clock);

    pg.rt.block_on(pg.store.add(message.clone())).expect("add");

    let fetched = pg.rt.block_on(pg.store.get(message.id())).expect("get");
    assert_eq!(fetched, Some(message));
}

#[rstest]
fn numbers_keep_integer_and_float_form(pg: PgContext, clock: DefaultClock) {
    let message = Message::new(
        json!({
            "whole_float": 1e16,
            "two": 2.0,
            "half": 0.5,
            "max": u64::MAX,
            "min": i64::MIN,
        }),
        &clock,
    );

    pg.rt.block_on(pg.store.add(message.clone())).expect("add");
    let fetched = pg
        .rt
        .block_on(pg.store.get(message.id()))
        .expect("get")
        .expect("message stored");

    let payload = fetched.payload().as_native().expect("native payload");
    assert!(payload["whole_float"].is_f64(), "got {}", payload["whole_float"]);
    assert!(payload["two"].is_f64(), "got {}", payload["two"]);
    assert_eq!(payload["max"].as_u64(), Some(u64::MAX));
    assert_eq!(payload["min"].as_i64(), Some(i64::MIN));
    assert_eq!(fetched, message);
}

#[rstest]
fn remove_is_single_shot(pg: PgContext, clock: DefaultClock) {
    let message = Message::new("once", &clock);
    pg.rt.block_on(pg.store.add(message.clone())).expect("add");

    let first = pg.rt.block_on(pg.store.remove(message.id())).expect("remove");
    let second = pg.rt.block_on(pg.store.remove(message.id())).expect("remove");

    assert_eq!(first, Some(message));
    assert_eq!(second, None);
    assert_eq!(pg.rt.block_on(pg.store.count()).expect("count"), 0);
}

#[rstest]
fn concurrent_removals_observe_message_once(pg: PgContext, clock: DefaultClock) {
    let message = Message::new("contended", &clock);
    pg.rt.block_on(pg.store.add(message.clone())).expect("add");

    let observed = pg.rt.block_on(async {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let racer = pg.store.clone();
                let id = message.id();
                tokio::spawn(async move { racer.remove(id).await })
            })
            .collect();

        let mut observed = 0;
        for handle in handles {
            if handle.await.expect("task joins").expect("remove").is_some() {
                observed += 1;
            }
        }
        observed
    });

    assert_eq!(observed, 1);
}

#[rstest]
fn duplicate_add_is_rejected(pg: PgContext, clock: DefaultClock) {
    let message = Message::new("dup", &clock);
    pg.rt.block_on(pg.store.add(message.clone())).expect("add");

    let result = pg.rt.block_on(pg.store.add(message.clone()));

    assert!(matches!(result, Err(MessageStoreError::DuplicateMessage(id)) if id == message.id()));
}

#[rstest]
fn count_is_scoped_to_collection(pg: PgContext, clock: DefaultClock) {
    let neighbour = pg
        .store_in(&format!("{}_other", pg.collection))
        .expect("valid collection");

    pg.rt.block_on(async {
        for index in 0..3 {
            pg.store
                .add(Message::new(format!("m{index}"), &clock))
                .await
                .expect("add");
        }
        neighbour
            .add(Message::new("elsewhere", &clock))
            .await
            .expect("add");

        assert_eq!(pg.store.count().await.expect("count"), 3);
        assert_eq!(neighbour.count().await.expect("count"), 1);
        assert!(pg.store.get(MessageId::new()).await.expect("get").is_none());
    });
}

#[rstest]
fn remove_blocked_past_deadline_is_unavailable_and_deletes_nothing(
    pg: PgContext,
    clock: DefaultClock,
) {
    let message = Message::new("locked", &clock);
    pg.rt.block_on(pg.store.add(message.clone())).expect("add");
    let impatient = pg
        .store_with_timeout(Duration::from_millis(200))
        .expect("non-zero timeout");

    let mut holder = pg.side_connection().expect("side connection");
    holder.batch_execute("BEGIN").expect("begin");
    diesel::sql_query(
        "SELECT document_key FROM message_documents \
         WHERE collection = $1 AND document_key = $2 FOR UPDATE",
    )
    .bind::<Text, _>(pg.collection.as_str())
    .bind::<Text, _>(message.id().to_key())
    .execute(&mut holder)
    .expect("row lock");

    let result = pg.rt.block_on(impatient.remove(message.id()));

    holder.batch_execute("ROLLBACK").expect("release lock");
    assert!(
        result.as_ref().is_err_and(MessageStoreError::is_unavailable),
        "unexpected result: {result:?}"
    );
    let still_stored = pg.rt.block_on(pg.store.get(message.id())).expect("get");
    assert_eq!(still_stored, Some(message));
}

#[rstest]
fn operations_within_deadline_succeed(pg: PgContext, clock: DefaultClock) {
    let bounded = pg
        .store_with_timeout(Duration::from_secs(5))
        .expect("non-zero timeout");
    let message = Message::new("prompt", &clock);

    pg.rt.block_on(async {
        bounded.add(message.clone()).await.expect("add");
        assert_eq!(bounded.count().await.expect("count"), 1);
        assert_eq!(
            bounded.get(message.id()).await.expect("get"),
            Some(message.clone())
        );
        assert_eq!(
            bounded.remove(message.id()).await.expect("remove"),
            Some(message.clone())
        );
    });
}
