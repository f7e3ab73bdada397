//! Form events fed to the controller and what each one produced.

use shared::protocol::PredictionResult;

use crate::error::WorkflowError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other(String),
}

impl Key {
    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Enter)
    }
}

/// Field events carry only the field name; the new value is already in the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Input { field: String },
    Blur { field: String },
    KeyDown { field: String, key: Key },
    Submit,
    Clear,
}

impl FormEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input { .. } => "input",
            Self::Blur { .. } => "blur",
            Self::KeyDown { .. } => "keydown",
            Self::Submit => "submit",
            Self::Clear => "clear",
        }
    }
}

#[derive(Debug)]
pub enum WorkflowOutcome {
    /// Per-field flags may have changed; nothing else.
    FieldChecked,
    FocusMoved { field: String },
    Invalid(WorkflowError),
    Predicted(PredictionResult),
    Failed(WorkflowError),
    Cleared,
    Ignored,
}

impl WorkflowOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Failed(_))
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        match self {
            Self::Invalid(error) | Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}
