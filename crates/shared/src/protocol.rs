use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

pub fn predict_route() -> &'static str {
    "/predict"
}

pub fn model_info_route() -> &'static str {
    "/model_info"
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRequest {
    pub features: BTreeMap<String, f64>,
}

impl PredictionRequest {
    pub fn insert(&mut self, field: impl Into<String>, value: f64) {
        self.features.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.features.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// The service reports confidence either preformatted ("82.0%") or as a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Text(String),
    Number(f64),
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_order: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f64>>,
}

impl PredictionResult {
    pub fn new(prediction: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            prediction: prediction.into(),
            confidence,
            probability: None,
            probabilities: None,
        }
    }

    pub fn category_token(&self) -> String {
        self.prediction.trim().to_lowercase().replace(' ', "-")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub feature_importance: BTreeMap<String, f64>,
    pub n_estimators: Option<u32>,
    pub model_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_estimators: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
