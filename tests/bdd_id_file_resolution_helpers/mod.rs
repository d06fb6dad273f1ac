//! Behavioural helpers for ID file resolution scenarios.

mod state;

pub(crate) type StepResult<T> = Result<T, String>;

pub(crate) use state::{IdFileState, id_file_state};
#[expect(
    unused_imports,
    reason = "rstest-bdd discovers step functions via attributes, not runtime usage"
)]
pub(crate) use steps::*;
