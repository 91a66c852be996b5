//! Exercises the reqwest client against a local axum server bound to an
//! ephemeral port, mimicking the control API's answers.

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};
use vmdash_adapter_http_reqwest::{Config, HttpVmControlApi};
use vmdash_app::ports::VmControlApi;
use vmdash_domain::error::{ControlError, RejectedError};
use vmdash_domain::power_state::PowerState;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server runs");
    });
    format!("http://{addr}")
}

fn client(base_url: String, timeout: Option<Duration>) -> HttpVmControlApi {
    Config { base_url, timeout }
        .build()
        .expect("client should build")
}

fn failure(message: &str) -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({ "status": "error", "message": message })),
    )
}

fn success(body: Value) -> axum::Json<Value> {
    axum::Json(body)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_fetch_status() {
    let router = Router::new().route(
        "/api/vm/status",
        get(|| async {
            success(json!({
                "status": "success",
                "vmName": "build-agent",
                "powerState": "deallocated"
            }))
        }),
    );
    let api = client(serve(router).await, None);

    let status = api.status().await.unwrap();

    assert_eq!(status.vm_name, "build-agent");
    assert_eq!(status.state(), PowerState::Deallocated);
}

#[tokio::test]
async fn should_surface_server_message_on_http_500() {
    let router = Router::new().route(
        "/api/vm/status",
        get(|| async { failure("The Resource 'vm' was not found") }),
    );
    let api = client(serve(router).await, None);

    let err = api.status().await.unwrap_err();

    assert_eq!(
        err,
        ControlError::Rejected(RejectedError {
            message: Some("The Resource 'vm' was not found".to_string())
        })
    );
}

#[tokio::test]
async fn should_fetch_usage_with_unknown_hours() {
    let router = Router::new().route(
        "/api/vm/usage",
        get(|| async {
            success(json!({
                "status": "success",
                "month": "October 2026",
                "runningHours": "unknown",
                "estimatedCost": "unknown",
                "hourlyCost": 0.53
            }))
        }),
    );
    let api = client(serve(router).await, None);

    let usage = api.usage().await.unwrap();

    assert_eq!(usage.month, "October 2026");
    assert!(usage.is_unknown());
    assert_eq!(usage.display("€").hourly_cost, "€0.53");
}

#[tokio::test]
async fn should_fetch_numeric_usage() {
    let router = Router::new().route(
        "/api/vm/usage",
        get(|| async {
            success(json!({
                "status": "success",
                "month": "October 2026",
                "runningHours": 42.25,
                "estimatedCost": 22.39,
                "hourlyCost": 0.53
            }))
        }),
    );
    let api = client(serve(router).await, None);

    let display = api.usage().await.unwrap().display("€");

    assert_eq!(display.running_hours, "42.25 hours");
    assert_eq!(display.estimated_cost, "€22.39");
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_post_start_command() {
    let router = Router::new().route(
        "/api/vm/start",
        post(|| async {
            success(json!({ "status": "success", "message": "VM start initiated" }))
        }),
    );
    let api = client(serve(router).await, None);

    assert_eq!(api.start().await, Ok(()));
}

#[tokio::test]
async fn should_report_rejected_stop_without_message() {
    let router = Router::new().route(
        "/api/vm/stop",
        post(|| async {
            (
                StatusCode::CONFLICT,
                axum::Json(json!({ "status": "error" })),
            )
        }),
    );
    let api = client(serve(router).await, None);

    let err = api.stop().await.unwrap_err();

    assert_eq!(err, ControlError::Rejected(RejectedError { message: None }));
    assert_eq!(err.server_message(), None);
}

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_transport_error_for_non_json_body() {
    let router = Router::new().route(
        "/api/vm/status",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
    );
    let api = client(serve(router).await, None);

    let err = api.status().await.unwrap_err();

    assert!(matches!(err, ControlError::Transport(_)));
}

#[tokio::test]
async fn should_report_transport_error_when_nothing_listens() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(format!("http://{addr}"), None);

    let err = api.status().await.unwrap_err();

    assert!(matches!(err, ControlError::Transport(_)));
}

#[tokio::test]
async fn should_time_out_hung_command() {
    let router = Router::new().route(
        "/api/vm/start",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            success(json!({ "status": "success" }))
        }),
    );
    let api = client(serve(router).await, Some(Duration::from_millis(100)));

    let err = api.start().await.unwrap_err();

    assert!(matches!(err, ControlError::Transport(_)));
}
