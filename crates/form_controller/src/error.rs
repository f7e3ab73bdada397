use client_core::PredictionError;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("required fields are empty: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },
    #[error("fields are not valid numbers: {}", .fields.join(", "))]
    InvalidNumbers { fields: Vec<String> },
    #[error("prediction request failed: {0}")]
    Prediction(#[from] PredictionError),
}

impl WorkflowError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingFields { .. } | Self::InvalidNumbers { .. } => ErrorCode::Validation,
            Self::Prediction(error) => error.code(),
        }
    }
}

/// How much failure detail reaches the error panel.
///
/// `Generic` collapses network and service failures into one retry message.
/// `ServiceDetail` shows the reason a service put in its `error` field;
/// transport failures stay generic either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDisplayPolicy {
    #[default]
    Generic,
    ServiceDetail,
}

impl ErrorDisplayPolicy {
    pub fn from_show_service_errors(show: bool) -> Self {
        if show {
            Self::ServiceDetail
        } else {
            Self::Generic
        }
    }

    pub fn user_message(self, error: &WorkflowError) -> String {
        if let (Self::ServiceDetail, WorkflowError::Prediction(error)) = (self, error) {
            if let Some(message) = error.service_message() {
                return message.to_string();
            }
        }
        error.code().user_message().to_string()
    }
}
