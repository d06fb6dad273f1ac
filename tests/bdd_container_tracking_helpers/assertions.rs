//! Assertion steps for container tracking scenarios.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::TrackingState;
use crate::support::split_list;

fn no_error(tracking_state: &TrackingState) -> StepResult<()> {
    match tracking_state.error.get() {
        Some(message) => Err(format!("unexpected operation error: {message}")),
        None => Ok(()),
    }
}

#[then("the reported container IDs are {ids}")]
fn reported_ids_are(tracking_state: &TrackingState, ids: String) -> StepResult<()> {
    no_error(tracking_state)?;
    let reported = tracking_state
        .reported_ids
        .get()
        .ok_or_else(|| String::from("container IDs should have been reported"))?;
    let expected = split_list(&ids);
    if reported == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {reported:?}"))
    }
}

#[then("no container IDs are reported")]
fn no_ids_reported(tracking_state: &TrackingState) -> StepResult<()> {
    no_error(tracking_state)?;
    let reported = tracking_state
        .reported_ids
        .get()
        .ok_or_else(|| String::from("container IDs should have been reported"))?;
    if reported.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no IDs, got {reported:?}"))
    }
}

#[then("the remembered container IDs are {ids}")]
fn remembered_ids_are(tracking_state: &TrackingState, ids: String) -> StepResult<()> {
    no_error(tracking_state)?;
    let operator = tracking_state
        .operator
        .get()
        .ok_or_else(|| String::from("operator should be configured"))?;
    let remembered = operator.remembered_ids();
    let expected = split_list(&ids);
    if remembered == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {remembered:?}"))
    }
}

#[then("no container IDs are remembered")]
fn nothing_remembered(tracking_state: &TrackingState) -> StepResult<()> {
    let operator = tracking_state
        .operator
        .get()
        .ok_or_else(|| String::from("operator should be configured"))?;
    let remembered = operator.remembered_ids();
    if remembered.is_empty() {
        Ok(())
    } else {
        Err(format!("expected nothing remembered, got {remembered:?}"))
    }
}

#[then("the found container ID is {id}")]
fn found_id_is(tracking_state: &TrackingState, id: String) -> StepResult<()> {
    no_error(tracking_state)?;
    match tracking_state.found.get() {
        Some(Some(found)) if found == id => Ok(()),
        Some(Some(found)) => Err(format!("expected {id}, found {found}")),
        Some(None) => Err(format!("expected {id}, found nothing")),
        None => Err(String::from("lookup should have completed")),
    }
}

#[then("no container is found")]
fn nothing_found(tracking_state: &TrackingState) -> StepResult<()> {
    no_error(tracking_state)?;
    match tracking_state.found.get() {
        Some(None) => Ok(()),
        Some(Some(found)) => Err(format!("expected nothing, found {found}")),
        None => Err(String::from("lookup should have completed")),
    }
}

#[then("the operation fails with message \"{message}\"")]
fn operation_fails_with(tracking_state: &TrackingState, message: String) -> StepResult<()> {
    match tracking_state.error.get() {
        Some(actual) if actual == message => Ok(()),
        Some(actual) => Err(format!("expected error {message:?}, got {actual:?}")),
        None => Err(format!("expected error {message:?}, but the operation succeeded")),
    }
}
