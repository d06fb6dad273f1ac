//! Scenario state for ID file resolution behavioural tests.

use std::sync::Arc;

use cidtrack::operator::Operator;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;

use crate::support::ScriptedRuntime;

/// Outcome of a resolution attempt.
#[derive(Debug, Clone)]
pub(crate) enum Resolution {
    Found(String),
    Missing,
    Failed(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct IdFileState {
    pub(crate) operator: Slot<Arc<Operator<ScriptedRuntime>>>,
    pub(crate) job_dir: Slot<Arc<TempDir>>,
    pub(crate) resolution: Slot<Resolution>,
}

#[fixture]
pub(crate) fn id_file_state() -> IdFileState {
    let state = IdFileState::default();
    state
        .operator
        .set(Arc::new(Operator::new(ScriptedRuntime::default())));
    state
}
