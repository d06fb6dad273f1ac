//! Given/when steps for container tracking scenarios.

use std::future::Future;
use std::sync::Arc;

use cidtrack::operator::{OperationContext, Operator};
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::TrackingState;
use crate::support::{ScriptedRuntime, split_list};

fn operator(tracking_state: &TrackingState) -> StepResult<Arc<Operator<ScriptedRuntime>>> {
    tracking_state
        .operator
        .get()
        .ok_or_else(|| String::from("operator should be configured"))
}

fn ctx(tracking_state: &TrackingState) -> StepResult<OperationContext> {
    tracking_state
        .ctx
        .get()
        .ok_or_else(|| String::from("operation context should be configured"))
}

/// Drive `future` to completion, storing its error message in state.
fn block_on_recording<T, E, F>(tracking_state: &TrackingState, future: F) -> StepResult<Option<T>>
where
    E: std::fmt::Display,
    F: Future<Output = Result<T, E>>,
{
    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))?;
    match runtime.block_on(future) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracking_state.error.set(e.to_string());
            Ok(None)
        }
    }
}

fn start_all(tracking_state: &TrackingState, ids: &str) -> StepResult<()> {
    let tracked = operator(tracking_state)?;
    for id in split_list(ids) {
        tracked.runtime().start(&id, &[]);
    }
    Ok(())
}

fn start_named(tracking_state: &TrackingState, id: &str, name: &str) -> StepResult<()> {
    operator(tracking_state)?.runtime().start(id, &[name]);
    Ok(())
}

#[given("the engine is running containers {ids}")]
fn given_running_containers(tracking_state: &TrackingState, ids: String) -> StepResult<()> {
    start_all(tracking_state, &ids)
}

#[given("the engine is running container {id} named {name}")]
fn given_running_named_container(
    tracking_state: &TrackingState,
    id: String,
    name: String,
) -> StepResult<()> {
    start_named(tracking_state, &id, &name)
}

#[given("the engine cannot list containers")]
fn given_listing_fails(tracking_state: &TrackingState) -> StepResult<()> {
    operator(tracking_state)?.runtime().fail_listing();
    Ok(())
}

#[given("the operation context is cancelled")]
fn given_cancelled_context(tracking_state: &TrackingState) -> StepResult<()> {
    ctx(tracking_state)?.cancel();
    Ok(())
}

#[when("the engine starts containers {ids}")]
fn start_containers(tracking_state: &TrackingState, ids: String) -> StepResult<()> {
    start_all(tracking_state, &ids)
}

#[when("the engine starts container {id} named {name}")]
fn start_named_container(
    tracking_state: &TrackingState,
    id: String,
    name: String,
) -> StepResult<()> {
    start_named(tracking_state, &id, &name)
}

#[when("the engine stops container {id}")]
fn stop_container(tracking_state: &TrackingState, id: String) -> StepResult<()> {
    operator(tracking_state)?.runtime().stop(&id);
    Ok(())
}

#[when("the operator remembers the current containers")]
fn remember_current(tracking_state: &TrackingState) -> StepResult<()> {
    let tracked = operator(tracking_state)?;
    let context = ctx(tracking_state)?;
    block_on_recording(
        tracking_state,
        tracked.remember_current_container_ids(&context),
    )?;
    Ok(())
}

#[when("new container IDs are requested")]
fn request_new_ids(tracking_state: &TrackingState) -> StepResult<()> {
    let tracked = operator(tracking_state)?;
    let context = ctx(tracking_state)?;
    if let Some(ids) = block_on_recording(tracking_state, tracked.new_container_ids(&context))? {
        tracking_state.reported_ids.set(ids);
    }
    Ok(())
}

#[when("the new container named {name} is looked up")]
fn look_up_by_name(tracking_state: &TrackingState, name: String) -> StepResult<()> {
    let tracked = operator(tracking_state)?;
    let context = ctx(tracking_state)?;
    if let Some(found) = block_on_recording(
        tracking_state,
        tracked.new_container_id_by_name(&context, &name),
    )? {
        tracking_state.found.set(found);
    }
    Ok(())
}

#[when("container {id} is killed")]
fn kill_container(tracking_state: &TrackingState, id: String) -> StepResult<()> {
    let tracked = operator(tracking_state)?;
    let context = ctx(tracking_state)?;
    block_on_recording(tracking_state, tracked.kill_container(&context, &id))?;
    Ok(())
}

#[when("the live containers are listed")]
fn list_live(tracking_state: &TrackingState) -> StepResult<()> {
    let tracked = operator(tracking_state)?;
    let context = ctx(tracking_state)?;
    if let Some(containers) =
        block_on_recording(tracking_state, tracked.current_containers(&context))?
    {
        tracking_state
            .reported_ids
            .set(containers.into_iter().map(|container| container.id).collect());
    }
    Ok(())
}
