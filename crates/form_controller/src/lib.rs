pub mod controller;
pub mod error;
pub mod view;

pub use controller::{
    events::{FormEvent, Key, WorkflowOutcome},
    state::WorkflowPhase,
    workflow::{missing_required_fields, serialize, FormController},
};
pub use error::{ErrorDisplayPolicy, WorkflowError};
pub use view::{FormView, HeadlessView, Panel, PanelState, RenderedResult};

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod workflow_tests;

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod view_tests;
