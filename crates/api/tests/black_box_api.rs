use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use coldwire_api::app::{build_router, AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory backend, ephemeral port.
        let app = build_router(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn submit_fetch_claim_cycle() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Enqueue two commands for beacon 3.
    let res = client
        .post(format!("{}/user/command?beaconid=3", server.base_url))
        .json(&json!(["whoami", "ls"]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created.as_array().unwrap().len(), 2);
    assert_eq!(created[0]["status"], "pending");
    assert_eq!(created[0]["beaconid"], 3);
    assert_eq!(created[0]["content"], "whoami");
    assert_eq!(created[1]["content"], "ls");

    // First fetch claims both: post-transition view shows sent.
    let res = client
        .get(format!("{}/beacon/command?beaconid=3", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    let fetched = fetched.as_array().unwrap();
    assert_eq!(fetched.len(), 2);
    assert!(fetched.iter().all(|c| c["status"] == "sent"));

    // The pending queue drained.
    let res = client
        .get(format!(
            "{}/beacon/command?beaconid=3&status=pending",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let pending: serde_json::Value = res.json().await.unwrap();
    assert!(pending.as_array().unwrap().is_empty());

    // Filtering on sent still sees both, unchanged.
    let res = client
        .get(format!(
            "{}/beacon/command?beaconid=3&status=sent",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    let sent: serde_json::Value = res.json().await.unwrap();
    assert_eq!(sent.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn validation_rejects_bad_input_before_the_queue() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Negative beaconid on fetch.
    let res = client
        .get(format!("{}/beacon/command?beaconid=-1", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_beaconid");

    // Unknown status label.
    let res = client
        .get(format!(
            "{}/beacon/command?beaconid=5&status=bogus",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_status");

    // Negative beaconid on submit.
    let res = client
        .post(format!("{}/user/command?beaconid=-2", server.base_url))
        .json(&json!(["whoami"]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Empty content batch.
    let res = client
        .post(format!("{}/user/command?beaconid=2", server.base_url))
        .json(&json!([]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "empty_batch");
}

#[tokio::test]
async fn fetching_an_unknown_beacon_is_empty_not_an_error() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/beacon/command?beaconid=999", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn user_and_beacon_registration_flow() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Beacon registration requires an existing user.
    let res = client
        .post(format!("{}/beacon/register", server.base_url))
        .json(&json!({"username": "ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Register, then log in.
    let res = client
        .post(format!("{}/register", server.base_url))
        .json(&json!({"username": "alice", "password": "hunter2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let user: serde_json::Value = res.json().await.unwrap();
    assert_eq!(user["username"], "alice");
    assert!(user.get("encoded_password").is_none());

    // Duplicate registration is rejected.
    let res = client
        .post(format!("{}/register", server.base_url))
        .json(&json!({"username": "alice", "password": "other"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Empty password is rejected before the directory is consulted.
    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({"username": "alice", "password": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({"username": "alice", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({"username": "alice", "password": "hunter2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Now a beacon can be registered for the user.
    let res = client
        .post(format!("{}/beacon/register", server.base_url))
        .json(&json!({"username": "alice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["beacon_id"], 0);
    assert_eq!(body["path"], "/beacon/register");
}
