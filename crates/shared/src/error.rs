use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Network,
    Service,
}

pub const VALIDATION_MESSAGE: &str = "Please fill in all required fields with valid values.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to get prediction. Please try again.";

impl ErrorCode {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Validation => VALIDATION_MESSAGE,
            Self::Network | Self::Service => GENERIC_FAILURE_MESSAGE,
        }
    }
}
