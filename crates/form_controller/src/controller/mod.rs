//! Controller layer: form events, submission phases, and the workflow itself.

pub mod events;
pub mod state;
pub mod workflow;
