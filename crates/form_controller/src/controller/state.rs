//! Submission phases and the guard that owns the `Submitting` phase.

use tracing::debug;

use crate::view::FormView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
}

/// Holds the form disabled while a request is outstanding.
///
/// Dropping the guard re-enables the form and returns to `Idle`, whether the
/// request finished or the submitting future was dropped part way.
pub(crate) struct InFlight<'a, V: FormView> {
    view: &'a mut V,
    phase: &'a mut WorkflowPhase,
}

impl<'a, V: FormView> InFlight<'a, V> {
    pub(crate) fn begin(view: &'a mut V, phase: &'a mut WorkflowPhase) -> Self {
        *phase = WorkflowPhase::Submitting;
        view.set_submitting(true);
        debug!("submission in flight");
        Self { view, phase }
    }

    pub(crate) fn view(&mut self) -> &mut V {
        &mut *self.view
    }
}

impl<V: FormView> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        self.view.set_submitting(false);
        *self.phase = WorkflowPhase::Idle;
        debug!("submission settled");
    }
}
