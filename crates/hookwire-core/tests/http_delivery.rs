//! End-to-end delivery through `ReqwestTransport` against a local axum receiver.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
};
use hookwire_core::app::AppBuilder;
use hookwire_core::config::Settings;
use hookwire_core::domain::{
    DeliveryOutcome, NewWebhook, OrganizationId, OutcomeKind, WebhookActionKind,
};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct Received {
    hook: String,
    headers: HeaderMap,
    body: Value,
}

type Inbox = Arc<Mutex<Vec<Received>>>;

async fn receive(
    Path(hook): Path<String>,
    State(inbox): State<Inbox>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    inbox.lock().await.push(Received {
        hook: hook.clone(),
        headers,
        body,
    });
    match hook.as_str() {
        "gone" => (StatusCode::GONE, "unsubscribed"),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            (StatusCode::OK, "late")
        }
        _ => (StatusCode::OK, "ok"),
    }
}

/// Spawn the receiver on 127.0.0.1:0 and return its base URL.
async fn start_receiver() -> (String, Inbox) {
    let inbox: Inbox = Arc::default();
    let app = Router::new()
        .route("/hooks/{hook}", post(receive))
        .with_state(inbox.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}"), inbox)
}

/// A port nobody listens on.
async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/hooks/nobody")
}

const STALLED_RESPONSE: &[u8] =
    b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: 64\r\n\r\npartial";

/// Answers `200` with the first bytes of a 64-byte body, then stalls.
async fn start_stalling_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // リクエストを最後まで読んでから応答する
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        socket.write_all(STALLED_RESPONSE).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
    });
    format!("http://127.0.0.1:{port}/hooks/stalling")
}

fn settings(timeout_secs: f64) -> Settings {
    Settings {
        webhook_timeout: timeout_secs,
    }
}

#[tokio::test]
async fn emits_to_matching_webhooks_and_survives_unreachable_ones() {
    let (base, inbox) = start_receiver().await;
    let app = AppBuilder::new().settings(settings(5.0)).build().unwrap();
    let org = OrganizationId::random();

    let unreachable = app
        .webhooks
        .create_webhook(org, NewWebhook::new(closed_port_url().await))
        .await
        .unwrap();
    let w1 = app
        .webhooks
        .create_webhook(
            org,
            NewWebhook::new(format!("{base}/hooks/w1"))
                .with_headers(json!({"Authorization": "Token secret", "X-Source": "hookwire"})),
        )
        .await
        .unwrap();
    app.webhooks
        .create_webhook(
            org,
            NewWebhook::new(format!("{base}/hooks/w2"))
                .only_for([WebhookActionKind::ProjectDeleted]),
        )
        .await
        .unwrap();

    let payload = json!({"id": 5}).as_object().cloned();
    let report = app
        .dispatcher
        .emit_event(org, WebhookActionKind::TaskCreated, payload)
        .await;

    let received = inbox.lock().await.clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].hook, "w1");
    assert_eq!(received[0].body, json!({"action": "TASK_CREATED", "id": 5}));
    assert_eq!(received[0].headers["authorization"], "Token secret");
    assert_eq!(received[0].headers["x-source"], "hookwire");
    assert_eq!(received[0].headers["content-type"], "application/json");

    assert_eq!(report.counts.selected, 2);
    assert_eq!(report.counts.delivered, 1);
    assert_eq!(report.counts.failed, 1);
    assert_eq!(
        report.outcome_for(unreachable.id).map(DeliveryOutcome::kind),
        Some(OutcomeKind::Failed)
    );
    assert_eq!(
        report
            .outcome_for(w1.id)
            .and_then(DeliveryOutcome::response)
            .map(|r| r.body.as_str()),
        Some("ok")
    );
}

#[tokio::test]
async fn non_success_status_is_reported_as_rejected() {
    let (base, inbox) = start_receiver().await;
    let app = AppBuilder::new().settings(settings(5.0)).build().unwrap();
    let org = OrganizationId::random();

    let wh = app
        .webhooks
        .create_webhook(org, NewWebhook::new(format!("{base}/hooks/gone")))
        .await
        .unwrap();

    let outcome = app
        .dispatcher
        .run_webhook(&wh, WebhookActionKind::AnnotationDeleted, None)
        .await;

    assert_eq!(outcome.kind(), OutcomeKind::Rejected);
    let response = outcome.response().unwrap();
    assert_eq!(response.status, 410);
    assert_eq!(response.body, "unsubscribed");
    assert_eq!(inbox.lock().await.len(), 1);
}

#[tokio::test]
async fn slow_endpoint_is_cut_off_by_the_timeout() {
    let (base, _inbox) = start_receiver().await;
    let app = AppBuilder::new().settings(settings(0.2)).build().unwrap();
    let org = OrganizationId::random();

    let wh = app
        .webhooks
        .create_webhook(org, NewWebhook::new(format!("{base}/hooks/slow")))
        .await
        .unwrap();

    let started = tokio::time::Instant::now();
    let outcome = app
        .dispatcher
        .run_webhook(&wh, WebhookActionKind::ProjectUpdated, None)
        .await;

    assert_eq!(outcome.kind(), OutcomeKind::Failed);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn timeout_while_reading_the_body_is_a_failure() {
    let url = start_stalling_endpoint().await;
    let app = AppBuilder::new().settings(settings(0.3)).build().unwrap();
    let org = OrganizationId::random();

    let wh = app
        .webhooks
        .create_webhook(org, NewWebhook::new(url))
        .await
        .unwrap();

    let started = tokio::time::Instant::now();
    let outcome = app
        .dispatcher
        .run_webhook(&wh, WebhookActionKind::TaskUpdated, None)
        .await;

    assert_eq!(outcome.kind(), OutcomeKind::Failed);
    assert!(outcome.response().is_none());
    assert!(started.elapsed() < Duration::from_secs(2));
}
