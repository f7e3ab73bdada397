use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::protocol::{
    model_info_route, predict_route, ModelInfo, ModelInfoResponse, PredictionRequest,
    PredictionResponse, PredictionResult,
};
use tracing::debug;
use url::Url;

pub mod error;

pub use error::PredictionError;

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError>;

    async fn model_info(&self) -> Result<ModelInfo, PredictionError>;
}

pub struct PredictionClient {
    http: Client,
    server_url: Url,
}

impl PredictionClient {
    pub fn new(server_url: &str) -> Result<Self, PredictionError> {
        Self::with_http_client(server_url, Client::new())
    }

    /// No timeout unless one is given; a hung request stays pending until the
    /// transport gives up.
    pub fn with_timeout(
        server_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, PredictionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(PredictionError::ClientBuild)?;
        Self::with_http_client(server_url, http)
    }

    pub fn with_http_client(server_url: &str, http: Client) -> Result<Self, PredictionError> {
        let server_url = Url::parse(server_url.trim()).map_err(|source| {
            PredictionError::InvalidUrl {
                url: server_url.to_string(),
                source,
            }
        })?;
        Ok(Self { http, server_url })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, PredictionError> {
        self.server_url
            .join(route)
            .map_err(|source| PredictionError::InvalidUrl {
                url: format!("{}{route}", self.server_url),
                source,
            })
    }
}

fn check_status(response: Response) -> Result<Response, PredictionError> {
    response.error_for_status().map_err(|error| match error.status() {
        Some(status) => PredictionError::Status(status.as_u16()),
        None => PredictionError::Transport(error),
    })
}

pub fn decode_prediction(body: PredictionResponse) -> Result<PredictionResult, PredictionError> {
    if let Some(error) = body.error.filter(|error| !error.is_empty()) {
        return Err(PredictionError::Service(error));
    }
    let prediction = body
        .prediction
        .ok_or_else(|| PredictionError::Decode("missing 'prediction'".to_string()))?;
    let confidence = body
        .confidence
        .ok_or_else(|| PredictionError::Decode("missing 'confidence'".to_string()))?;
    Ok(PredictionResult {
        prediction,
        confidence,
        probability: body.probability,
        probabilities: body.probabilities,
    })
}

pub fn decode_model_info(body: ModelInfoResponse) -> Result<ModelInfo, PredictionError> {
    if let Some(error) = body.error.filter(|error| !error.is_empty()) {
        return Err(PredictionError::Service(error));
    }
    let model_type = body
        .model_type
        .ok_or_else(|| PredictionError::Decode("missing 'model_type'".to_string()))?;
    Ok(ModelInfo {
        feature_importance: body.feature_importance.unwrap_or_default(),
        n_estimators: body.n_estimators,
        model_type,
    })
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        let url = self.endpoint(predict_route())?;
        debug!(%url, fields = request.len(), "posting prediction request");
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(PredictionError::Transport)?;
        let body: PredictionResponse = check_status(response)?
            .json()
            .await
            .map_err(|error| PredictionError::Decode(error.to_string()))?;
        decode_prediction(body)
    }

    async fn model_info(&self) -> Result<ModelInfo, PredictionError> {
        let url = self.endpoint(model_info_route())?;
        debug!(%url, "fetching model info");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(PredictionError::Transport)?;
        let body: ModelInfoResponse = check_status(response)?
            .json()
            .await
            .map_err(|error| PredictionError::Decode(error.to_string()))?;
        decode_model_info(body)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
