use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{error::ErrorCode, protocol::Confidence};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

struct CapturedRequest {
    content_type: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: Value,
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedRequest>>>>,
}

async fn handle_predict(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(tx) = state.tx.lock().await.take() {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let _ = tx.send(CapturedRequest { content_type, body });
    }
    (state.status, Json(state.body.clone()))
}

async fn handle_model_info(State(state): State<ServerState>) -> (StatusCode, Json<Value>) {
    (state.status, Json(state.body.clone()))
}

async fn spawn_prediction_server(
    status: StatusCode,
    body: Value,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        status,
        body,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/predict", post(handle_predict))
        .route("/model_info", get(handle_model_info))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

fn sample_request() -> PredictionRequest {
    let mut request = PredictionRequest::default();
    request.insert("age", 45.0);
    request.insert("glucose", 148.0);
    request
}

#[tokio::test]
async fn predict_posts_json_and_decodes_result() {
    let (server_url, captured) = spawn_prediction_server(
        StatusCode::OK,
        json!({ "prediction": "Diabetic", "confidence": "82%", "probability": 0.82 }),
    )
    .await;
    let client = PredictionClient::new(&server_url).expect("client");

    let result = client.predict(&sample_request()).await.expect("predict");
    assert_eq!(result.prediction, "Diabetic");
    assert_eq!(result.confidence, Confidence::Text("82%".into()));
    assert_eq!(result.probability, Some(0.82));

    let captured = captured.await.expect("captured request");
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    assert_eq!(captured.body, json!({ "age": 45.0, "glucose": 148.0 }));
}

#[tokio::test]
async fn non_success_status_is_a_network_failure_even_with_error_body() {
    let (server_url, _captured) = spawn_prediction_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Model not loaded." }),
    )
    .await;
    let client = PredictionClient::new(&server_url).expect("client");

    let err = client
        .predict(&sample_request())
        .await
        .expect_err("500 must fail");
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.code(), ErrorCode::Network);
    assert!(err.service_message().is_none());
}

#[tokio::test]
async fn error_field_in_success_body_is_a_service_failure() {
    let (server_url, _captured) =
        spawn_prediction_server(StatusCode::OK, json!({ "error": "could not convert" })).await;
    let client = PredictionClient::new(&server_url).expect("client");

    let err = client
        .predict(&sample_request())
        .await
        .expect_err("service error");
    assert_eq!(err.code(), ErrorCode::Service);
    assert_eq!(err.service_message(), Some("could not convert"));
}

#[tokio::test]
async fn response_without_prediction_is_rejected_as_malformed() {
    let (server_url, _captured) =
        spawn_prediction_server(StatusCode::OK, json!({ "confidence": "50%" })).await;
    let client = PredictionClient::new(&server_url).expect("client");

    let err = client
        .predict(&sample_request())
        .await
        .expect_err("malformed");
    assert!(matches!(err, PredictionError::Decode(_)), "{err:?}");
    assert_eq!(err.code(), ErrorCode::Network);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = PredictionClient::new(&format!("http://{addr}")).expect("client");
    let err = client
        .predict(&sample_request())
        .await
        .expect_err("connection refused");
    assert!(matches!(err, PredictionError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn model_info_decodes_feature_importance() {
    let (server_url, _captured) = spawn_prediction_server(
        StatusCode::OK,
        json!({
            "feature_importance": { "Glucose": 0.41, "BMI": 0.2 },
            "n_estimators": 100,
            "model_type": "Decision Tree Classifier"
        }),
    )
    .await;
    let client = PredictionClient::new(&server_url).expect("client");

    let info = client.model_info().await.expect("model info");
    assert_eq!(info.model_type, "Decision Tree Classifier");
    assert_eq!(info.n_estimators, Some(100));
    assert_eq!(info.feature_importance.get("Glucose"), Some(&0.41));
}

#[test]
fn rejects_unparseable_server_url() {
    let err = PredictionClient::new("not a url").err().expect("invalid url");
    assert!(matches!(err, PredictionError::InvalidUrl { .. }));
}

#[test]
fn predict_route_replaces_base_path() {
    let client = PredictionClient::new("http://localhost:5000/ui/").expect("client");
    let url = client.endpoint(predict_route()).expect("endpoint");
    assert_eq!(url.as_str(), "http://localhost:5000/predict");
}

#[test]
fn empty_error_field_does_not_mask_a_result() {
    let body = PredictionResponse {
        prediction: Some("Diabetic".into()),
        confidence: Some(Confidence::Number(0.9)),
        error: Some(String::new()),
        ..PredictionResponse::default()
    };
    let result = decode_prediction(body).expect("result");
    assert_eq!(result.prediction, "Diabetic");
}
