//! Then steps for message store BDD scenarios.

use super::world::{MessageStoreWorld, SupportTicket, run_async};
use missive::message::error::MessageStoreError;
use rstest_bdd_macros::then;

#[then("fetching the message returns an equal copy")]
fn fetch_returns_equal_copy(world: &MessageStoreWorld) -> Result<(), eyre::Report> {
    let expected = world.subject()?;
    let fetched = run_async(world.store.get(expected.id()))
        .map_err(|err| eyre::eyre!("get failed: {err}"))?;
    if fetched.as_ref() != Some(expected) {
        return Err(eyre::eyre!("expected {expected:?}, fetched {fetched:?}"));
    }
    Ok(())
}

#[then(r#"fetching the message returns ticket "{reference}""#)]
fn fetch_returns_ticket(world: &MessageStoreWorld, reference: String) -> Result<(), eyre::Report> {
    let id = world.subject()?.id();
    let fetched = run_async(world.store.get(id))
        .map_err(|err| eyre::eyre!("get failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("message {id} not found"))?;
    let ticket = fetched
        .payload()
        .downcast_ref::<SupportTicket>()
        .ok_or_else(|| eyre::eyre!("payload is not a ticket: {:?}", fetched.payload()))?;
    if ticket.reference != reference {
        return Err(eyre::eyre!(
            "expected ticket {reference}, found {}",
            ticket.reference
        ));
    }
    Ok(())
}

#[then("the message count is {count:usize}")]
fn message_count_is(world: &MessageStoreWorld, count: usize) -> Result<(), eyre::Report> {
    let expected = u64::try_from(count)?;
    let total =
        run_async(world.store.count()).map_err(|err| eyre::eyre!("count failed: {err}"))?;
    if total != expected {
        return Err(eyre::eyre!("expected {expected} messages, found {total}"));
    }
    Ok(())
}

#[then("the removed message equals the stored one")]
fn removed_equals_stored(world: &MessageStoreWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_remove
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing removal result in scenario world"))?;
    match result {
        Ok(Some(removed)) if Some(removed) == world.stored.as_ref() => Ok(()),
        other => Err(eyre::eyre!("unexpected removal result: {other:?}")),
    }
}

#[then("removing it again finds nothing")]
fn second_removal_finds_nothing(world: &MessageStoreWorld) -> Result<(), eyre::Report> {
    let id = world.subject()?.id();
    let again = run_async(world.store.remove(id))
        .map_err(|err| eyre::eyre!("remove failed: {err}"))?;
    if again.is_some() {
        return Err(eyre::eyre!("message {id} was removed twice"));
    }
    Ok(())
}

#[then("the add fails with a duplicate message error")]
fn add_fails_with_duplicate(world: &MessageStoreWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_add
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing add result in scenario world"))?;
    if !matches!(result, Err(MessageStoreError::DuplicateMessage(_))) {
        return Err(eyre::eyre!("expected duplicate message error, got {result:?}"));
    }
    Ok(())
}

#[then("the fetch fails with a schema mismatch")]
fn fetch_fails_with_schema_mismatch(world: &MessageStoreWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_fetch
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing fetch result in scenario world"))?;
    if !matches!(result, Err(MessageStoreError::SchemaMismatch(_))) {
        return Err(eyre::eyre!("expected schema mismatch, got {result:?}"));
    }
    Ok(())
}
