//! Given steps for message store BDD scenarios.

use super::world::{MessageStoreWorld, SupportTicket, run_async};
use eyre::WrapErr;
use missive::message::{
    domain::{Message, MessageId, Payload},
    ports::DocumentDatabase,
};
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use serde_json::{Value, json};

#[given("an empty message store")]
fn an_empty_store(world: &mut MessageStoreWorld) -> Result<(), eyre::Report> {
    let total = run_async(world.store.count()).wrap_err("count empty store")?;
    if total != 0 {
        return Err(eyre::eyre!("expected an empty store, found {total} messages"));
    }
    Ok(())
}

#[given(r#"a message with text payload "{text}" and header "{key}" set to "{value}""#)]
fn a_message_with_header(
    world: &mut MessageStoreWorld,
    text: String,
    key: String,
    value: String,
) -> Result<(), eyre::Report> {
    let message = Message::builder(text)
        .with_header(key, Value::String(value))
        .build(&DefaultClock)
        .wrap_err("build scenario message")?;
    world.pending = Some(message);
    Ok(())
}

#[given(r#"a message carrying ticket "{reference}""#)]
fn a_message_carrying_ticket(world: &mut MessageStoreWorld, reference: String) {
    world.pending = Some(Message::new(
        Payload::typed(SupportTicket { reference }),
        &DefaultClock,
    ));
}

#[given(r#"a stored message with text payload "{text}""#)]
fn a_stored_message(world: &mut MessageStoreWorld, text: String) -> Result<(), eyre::Report> {
    let message = Message::new(text, &DefaultClock);
    let stored = run_async(world.store.add(message)).wrap_err("store scenario message")?;
    world.stored = Some(stored);
    Ok(())
}

#[given(r#"a document tagged with payload type "{tag}" written directly"#)]
fn a_raw_tagged_document(world: &mut MessageStoreWorld, tag: String) -> Result<(), eyre::Report> {
    let id = MessageId::new();
    let key = id.to_key();
    let Value::Object(document) = json!({
        "_id": key,
        "headers": {"id": key, "timestamp": 1_700_000_000_000_i64},
        "payload": {"retired": true},
        "_payloadType": tag,
    }) else {
        return Err(eyre::eyre!("document literal is not an object"));
    };

    run_async(
        world
            .database
            .insert(world.store.collection(), &key, document, None),
    )
    .wrap_err("write raw document")?;
    world.raw_id = Some(id);
    Ok(())
}
