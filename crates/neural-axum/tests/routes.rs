//! Routing tests driven through `tower::ServiceExt::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use mockall::predicate::function;
use neural_core::{ChatCompletionRequest, Environment, ForwardError, GatewayConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{MockCompletions, TEST_MODEL, TEST_ORIGIN, app, completion, test_config};

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_chat(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/v1/chat/completions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn health_reports_model_and_version() {
    let mut completions = MockCompletions::new();
    completions.expect_is_reachable().never();

    let (status, body) = send(app(test_config(), completions), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "2.1.0");
    assert_eq!(body["model"], TEST_MODEL);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn status_reports_downstream_health() {
    for reachable in [true, false] {
        let mut completions = MockCompletions::new();
        completions
            .expect_is_reachable()
            .times(1)
            .return_const(reachable);

        let (status, body) = send(app(test_config(), completions), get("/status")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["model"], TEST_MODEL);
        assert_eq!(body["llm_health"], reachable);
        assert!(body["uptime"].as_str().unwrap().ends_with('s'));
    }
}

#[tokio::test]
async fn capabilities_are_static() {
    let (status, body) = send(
        app(test_config(), MockCompletions::new()),
        get("/mcp/capabilities"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"version": "1.0", "capabilities": ["chat", "completion"]})
    );
}

#[tokio::test]
async fn chat_returns_downstream_completion() {
    let mut completions = MockCompletions::new();
    completions
        .expect_complete()
        .with(function(|req: &ChatCompletionRequest| {
            req.messages.len() == 1 && req.messages[0].text() == "hello"
        }))
        .times(1)
        .returning(|_| Ok(completion("hi there")));

    let (status, body) = send(
        app(test_config(), completions),
        post_chat(r#"{"messages":[{"role":"user","content":"hello"}]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["choices"][0]["message"]["content"], "hi there");
    assert_eq!(body["usage"]["total_tokens"], 5);
}

#[tokio::test]
async fn chat_fills_configured_model_before_forwarding() {
    let mut completions = MockCompletions::new();
    completions
        .expect_complete()
        .with(function(|req: &ChatCompletionRequest| {
            req.model == TEST_MODEL && req.max_tokens.is_some() && req.temperature.is_some()
        }))
        .times(1)
        .returning(|_| Ok(completion("ok")));

    let (status, _) = send(
        app(test_config(), completions),
        post_chat(r#"{"messages":[{"role":"user","content":"hello"}]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn chat_accepts_history_with_null_assistant_content() {
    let mut completions = MockCompletions::new();
    completions
        .expect_complete()
        .with(function(|req: &ChatCompletionRequest| {
            req.messages.len() == 3
                && req.messages[1].content.is_none()
                && req.messages[1].extra["tool_calls"].is_array()
        }))
        .times(1)
        .returning(|_| Ok(completion("sunny")));

    let body = json!({
        "messages": [
            {"role": "user", "content": "weather in Oslo?"},
            {"role": "assistant", "content": null, "tool_calls": [{"id": "call_1"}]},
            {"role": "user", "content": "and tomorrow?"}
        ]
    })
    .to_string();
    let (status, value) = send(app(test_config(), completions), post_chat(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["choices"][0]["message"]["content"], "sunny");
}

#[tokio::test]
async fn chat_rejects_malformed_body_without_forwarding() {
    let mut completions = MockCompletions::new();
    completions.expect_complete().never();
    let router = app(test_config(), completions);

    for body in ["not json", r#"{"messages": "nope"}"#, ""] {
        let (status, value) = send(router.clone(), post_chat(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(value["error"]["code"], "invalid_json");
        assert_eq!(value["error"]["type"], "invalid_request_error");
        assert_eq!(value["error"]["message"], "Invalid request format");
    }
}

#[tokio::test]
async fn chat_rejects_missing_messages_without_forwarding() {
    let mut completions = MockCompletions::new();
    completions.expect_complete().never();
    let router = app(test_config(), completions);

    for body in [r#"{"messages": []}"#, r#"{"model": "x"}"#] {
        let (status, value) = send(router.clone(), post_chat(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(value["error"]["code"], "missing_messages");
        assert_eq!(value["error"]["message"], "At least one message is required");
    }
}

#[tokio::test]
async fn chat_maps_downstream_failures_to_503() {
    let failures = [
        ForwardError::Unreachable("connection refused".into()),
        ForwardError::UpstreamStatus {
            status: 500,
            body: "internal detail".into(),
        },
        ForwardError::MalformedResponse("expected value".into()),
    ];

    for failure in failures {
        let mut completions = MockCompletions::new();
        completions
            .expect_complete()
            .times(1)
            .return_once(move |_| Err(failure));

        let (status, body) = send(
            app(test_config(), completions),
            post_chat(r#"{"messages":[{"role":"user","content":"hi"}]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "llm_error");
        assert_eq!(body["error"]["type"], "service_unavailable");
        assert_eq!(body["error"]["message"], "LLM service unavailable");
        assert!(!body.to_string().contains("internal detail"));
    }
}

#[tokio::test]
async fn identical_requests_get_identical_bodies() {
    let mut completions = MockCompletions::new();
    completions
        .expect_complete()
        .times(2)
        .returning(|_| Ok(completion("same")));
    let router = app(test_config(), completions);
    let body = r#"{"messages":[{"role":"user","content":"same"}]}"#;

    let first = send(router.clone(), post_chat(body)).await;
    let second = send(router, post_chat(body)).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _) = send(app(test_config(), MockCompletions::new()), get("/v2/nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn production_cors_allows_configured_origin_only() {
    let config = GatewayConfig {
        environment: Environment::Production,
        ..test_config()
    };
    let router = app(config, MockCompletions::new());

    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/chat/completions")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = router.clone().oneshot(preflight(TEST_ORIGIN)).await.unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        TEST_ORIGIN
    );
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let denied = router.oneshot(preflight("http://evil.example")).await.unwrap();
    assert!(
        !denied
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[tokio::test]
async fn development_cors_allows_any_origin() {
    let router = app(test_config(), MockCompletions::new());
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://anything.example")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
