//! Integration Tests for API Endpoints
//!
//! Drives the full router with `oneshot`, against either a scripted upstream
//! or a wiremock server behind the real reqwest client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use weather_proxy::{
    api::create_router,
    cache::{self, CacheStore},
    weather::{HttpUpstream, UpstreamFailure, UpstreamProvider, UpstreamRequest, UpstreamResponse},
    AppState, WeatherService,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// == Helper Functions ==

type Outcome = Result<UpstreamResponse, UpstreamFailure>;

struct ScriptedUpstream {
    outcome: Outcome,
    calls: AtomicUsize,
    locations: Mutex<Vec<String>>,
}

impl ScriptedUpstream {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            locations: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamProvider for ScriptedUpstream {
    async fn fetch(&self, request: &UpstreamRequest) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.locations.lock().unwrap().push(request.location.clone());
        self.outcome.clone()
    }
}

fn london_record() -> Value {
    let days: Vec<Value> = (1..=15)
        .map(|d| json!({"datetime": format!("2024-03-{:02}", d), "tempmax": 10 + d}))
        .collect();
    json!({
        "resolvedAddress": "London, England, United Kingdom",
        "address": "London",
        "latitude": 51.5064,
        "longitude": -0.12721,
        "timezone": "Europe/London",
        "currentConditions": {"temp": 12, "conditions": "Partially cloudy"},
        "days": days,
    })
}

fn create_test_app(upstream: Arc<ScriptedUpstream>) -> Router {
    let cache = cache::shared(CacheStore::new(300));
    let state = AppState::new(WeatherService::new(cache, upstream, 300));
    create_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn status_for(outcome: Outcome) -> (StatusCode, Value) {
    let app = create_test_app(ScriptedUpstream::new(outcome));
    let response = app.oneshot(get("/weather/Somewhere")).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record()))));

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}

// == Weather Endpoints ==

#[tokio::test]
async fn test_weather_endpoint_reads_through_cache() {
    let upstream = ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record())));
    let app = create_test_app(upstream.clone());

    let first = app
        .clone()
        .oneshot(get("/weather/London?unitGroup=metric"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_to_json(first.into_body()).await;
    assert_eq!(first["days"].as_array().unwrap().len(), 15);

    let second = app
        .clone()
        .oneshot(get("/weather/London?unitGroup=metric"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_to_json(second.into_body()).await, first);

    assert_eq!(upstream.calls(), 1);

    let stats = app.oneshot(get("/cache/stats")).await.unwrap();
    let stats = body_to_json(stats.into_body()).await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["keys"], 1);
    assert_eq!(stats["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_current_endpoint() {
    let app = create_test_app(ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record()))));

    let response = app.oneshot(get("/weather/London/current")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["location"], "London, England, United Kingdom");
    assert_eq!(json["coordinates"]["latitude"], 51.5064);
    assert_eq!(json["coordinates"]["longitude"], -0.12721);
    assert_eq!(json["current"]["temp"], 12);
    assert_eq!(json["timezone"], "Europe/London");
}

#[tokio::test]
async fn test_forecast_endpoint_truncates() {
    let app = create_test_app(ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record()))));

    let response = app
        .oneshot(get("/weather/London/forecast?days=3&unitGroup=metric"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let days = json["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["datetime"], "2024-03-01");
    assert_eq!(days[2]["datetime"], "2024-03-03");
}

#[tokio::test]
async fn test_forecast_endpoint_ignores_bad_day_counts() {
    let app = create_test_app(ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record()))));

    for uri in [
        "/weather/London/forecast",
        "/weather/London/forecast?days=0",
        "/weather/London/forecast?days=abc",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["days"].as_array().unwrap().len(), 15, "{}", uri);
    }
}

#[tokio::test]
async fn test_location_is_url_decoded() {
    let upstream = ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record())));
    let app = create_test_app(upstream.clone());

    let response = app.oneshot(get("/weather/New%20York%2C%20NY")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        upstream.locations.lock().unwrap().as_slice(),
        ["New York, NY".to_string()]
    );
}

// == Error Mapping ==

#[tokio::test]
async fn test_upstream_errors_map_to_status_codes() {
    let failure = |status: u16| -> Outcome {
        Err(UpstreamFailure::Status {
            status,
            message: "upstream says no".to_string(),
        })
    };

    let cases = [
        (failure(400), StatusCode::BAD_REQUEST, "invalid_request"),
        (failure(401), StatusCode::UNAUTHORIZED, "authentication_error"),
        (failure(404), StatusCode::NOT_FOUND, "location_not_found"),
        (failure(429), StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded"),
        (failure(500), StatusCode::INTERNAL_SERVER_ERROR, "upstream_error"),
        (
            Err(UpstreamFailure::NoResponse("timed out".to_string())),
            StatusCode::SERVICE_UNAVAILABLE,
            "upstream_unavailable",
        ),
        (
            Err(UpstreamFailure::InvalidRequest("bad request".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR,
            "configuration_error",
        ),
    ];

    for (outcome, expected_status, expected_kind) in cases {
        let (status, body) = status_for(outcome).await;
        assert_eq!(status, expected_status, "{}", expected_kind);
        assert_eq!(body["error"], expected_kind);
        assert!(body["message"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_failures_are_retried_not_cached() {
    let upstream = ScriptedUpstream::new(Err(UpstreamFailure::Status {
        status: 404,
        message: "not found".to_string(),
    }));
    let app = create_test_app(upstream.clone());

    for _ in 0..2 {
        let response = app.clone().oneshot(get("/weather/Atlantis")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_invalid_arguments_are_bad_requests() {
    let upstream = ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record())));
    let app = create_test_app(upstream.clone());

    let blank = app.clone().oneshot(get("/weather/%20%20")).await.unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(blank.into_body()).await;
    assert_eq!(json["error"], "invalid_argument");

    let half_range = app
        .oneshot(get("/weather/London?startDate=2024-03-01"))
        .await
        .unwrap();
    assert_eq!(half_range.status(), StatusCode::BAD_REQUEST);

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_malformed_query_is_json_invalid_argument() {
    let upstream = ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record())));
    let app = create_test_app(upstream.clone());

    for uri in [
        "/weather/London?unitGroup=us&unitGroup=metric",
        "/weather/London/current?include=days&include=hours",
        "/weather/London/forecast?days=1&days=2",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            response.headers()["content-type"],
            "application/json",
            "{}",
            uri
        );
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["error"], "invalid_argument", "{}", uri);
        assert!(json["message"].as_str().unwrap().contains("duplicate field"), "{}", uri);
    }

    assert_eq!(upstream.calls(), 0);
}

// == Cache Administration ==

#[tokio::test]
async fn test_flush_endpoint() {
    let upstream = ScriptedUpstream::new(Ok(UpstreamResponse::ok(london_record())));
    let app = create_test_app(upstream.clone());

    app.clone().oneshot(get("/weather/London")).await.unwrap();

    let flush = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(flush.status(), StatusCode::OK);

    let stats = app.clone().oneshot(get("/cache/stats")).await.unwrap();
    let stats = body_to_json(stats.into_body()).await;
    assert_eq!(stats["keys"], 0);
    assert_eq!(stats["misses"], 1);

    app.oneshot(get("/weather/London")).await.unwrap();
    assert_eq!(upstream.calls(), 2);
}

// == Real Client Against Mock Upstream ==

#[tokio::test]
async fn test_end_to_end_with_http_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeline/London"))
        .and(query_param("key", "integration-key"))
        .and(query_param("unitGroup", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_record()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/timeline/Atlantis"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad API Request:Invalid location"))
        .mount(&server)
        .await;

    let upstream = HttpUpstream::new(
        "integration-key",
        &format!("{}/timeline", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let cache = cache::shared(CacheStore::new(300));
    let app = create_router(AppState::new(WeatherService::new(
        cache,
        Arc::new(upstream),
        300,
    )));

    let current = app.clone().oneshot(get("/weather/London/current")).await.unwrap();
    assert_eq!(current.status(), StatusCode::OK);
    let current = body_to_json(current.into_body()).await;
    assert_eq!(current["current"]["temp"], 12);

    let forecast = app
        .clone()
        .oneshot(get("/weather/London/forecast?days=3"))
        .await
        .unwrap();
    let forecast = body_to_json(forecast.into_body()).await;
    assert_eq!(forecast["days"].as_array().unwrap().len(), 3);

    let missing = app.oneshot(get("/weather/Atlantis")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let missing = body_to_json(missing.into_body()).await;
    assert_eq!(missing["error"], "invalid_request");
}
