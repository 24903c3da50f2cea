use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tick_stats::server::{router, AppState};
use tick_stats::Config;
use tower::ServiceExt;

fn test_state(max_k: u32, max_batch_size: usize) -> AppState {
    AppState::new(Config {
        max_k,
        max_batch_size,
        bind: String::new(),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("request is handled");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    let body = serde_json::from_slice(&bytes).expect("body is JSON");

    (status, body)
}

fn add_batch(symbol: &str, values: &[f64]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/add_batch/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "symbol": symbol, "values": values }).to_string(),
        ))
        .expect("request is valid")
}

fn stats(symbol: &str, k: u32) -> Request<Body> {
    Request::builder()
        .uri(format!("/stats/?symbol={symbol}&k={k}"))
        .body(Body::empty())
        .expect("request is valid")
}

#[tokio::test]
async fn ingest_then_query() {
    let state = test_state(3, 10_000);

    let (status, body) = send(
        router(state.clone()),
        add_batch("AAPL", &[1.0, 2.0, 3.0]),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!({ "symbol": "AAPL", "message": "OK" }), body);

    let (status, body) = send(router(state), stats("AAPL", 1)).await;
    assert_eq!(StatusCode::OK, status);

    assert_eq!("AAPL", body["symbol"]);
    assert_eq!(1, body["k"]);

    let statistics = &body["statistics"];
    assert_eq!(1.0, statistics["min"].as_f64().expect("min is a number"));
    assert_eq!(3.0, statistics["max"].as_f64().expect("max is a number"));
    assert_eq!(3.0, statistics["last"].as_f64().expect("last is a number"));
    assert_eq!(2.0, statistics["avg"].as_f64().expect("avg is a number"));

    let var = statistics["var"].as_f64().expect("var is a number");
    assert!((var - 2.0 / 3.0).abs() < 1e-12);
}

#[tokio::test]
async fn query_unknown_symbol() {
    let state = test_state(3, 10_000);

    let (status, body) = send(router(state), stats("UNKNOWN", 2)).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(
        json!({ "detail": "No data points found for the symbol" }),
        body
    );
}

#[tokio::test]
async fn query_symbol_without_data() {
    let state = test_state(3, 10_000);

    // An empty batch registers the symbol but writes nothing
    let (status, _) = send(router(state.clone()), add_batch("AAPL", &[])).await;
    assert_eq!(StatusCode::OK, status);

    let (status, body) = send(router(state), stats("AAPL", 1)).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(
        json!({ "detail": "No data points found for the symbol" }),
        body
    );
}

#[tokio::test]
async fn query_with_invalid_k() {
    let state = test_state(3, 10_000);

    let (status, _) = send(router(state.clone()), add_batch("AAPL", &[1.0])).await;
    assert_eq!(StatusCode::OK, status);

    let (status, body) = send(router(state.clone()), stats("AAPL", 0)).await;
    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, status);
    assert!(body["detail"].is_string());

    let (status, _) = send(router(state), stats("AAPL", 4)).await;
    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, status);
}

#[tokio::test]
async fn ingest_oversized_batch() {
    let state = test_state(3, 10);

    let values = vec![1.0; 11];
    let (status, body) = send(router(state.clone()), add_batch("AAPL", &values)).await;
    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, status);
    assert!(body["detail"].is_string());

    // The rejected batch must not have registered the symbol
    let (status, _) = send(router(state), stats("AAPL", 1)).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
}

#[tokio::test]
async fn window_wraps_over_http() {
    let state = test_state(2, 10_000);

    let older = (1..=60).map(f64::from).collect::<Vec<_>>();
    let (status, _) = send(router(state.clone()), add_batch("AAPL", &older)).await;
    assert_eq!(StatusCode::OK, status);

    let newer = (61..=120).map(f64::from).collect::<Vec<_>>();
    let (status, _) = send(router(state.clone()), add_batch("AAPL", &newer)).await;
    assert_eq!(StatusCode::OK, status);

    // 120 values into a 100-slot window: 21..=120 remain
    let (status, body) = send(router(state), stats("AAPL", 2)).await;
    assert_eq!(StatusCode::OK, status);

    let statistics = &body["statistics"];
    assert_eq!(21.0, statistics["min"].as_f64().expect("min is a number"));
    assert_eq!(120.0, statistics["max"].as_f64().expect("max is a number"));
    assert_eq!(120.0, statistics["last"].as_f64().expect("last is a number"));
    assert_eq!(70.5, statistics["avg"].as_f64().expect("avg is a number"));

    let var = statistics["var"].as_f64().expect("var is a number");
    assert!((var - 833.25).abs() < 1e-9);
}
