#![allow(clippy::unwrap_used)]
// Integration tests for `CollectorClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pwmon_api::{CollectorClient, ConfigUpdate, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CollectorClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = CollectorClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Status tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(query_param("device", "router-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_bytes": 1536,
            "local_bytes": 512,
            "lan_bytes": 1024,
            "total_packets": 30,
            "local_packets": 10,
            "lan_packets": 20,
            "rules": 7,
            "backend": "nft",
            "ts": "2024-06-15 10:30:00",
            "device": "router-1",
            "ip": "192.168.1.1",
            "received_at": 1_718_447_400
        })))
        .mount(&server)
        .await;

    let status = client.get_status("router-1").await.unwrap();

    assert_eq!(status.total_bytes, 1536);
    assert_eq!(status.lan_packets, 20);
    assert_eq!(status.rules, 7);
    assert_eq!(status.backend.as_deref(), Some("nft"));
    assert_eq!(status.ip.as_deref(), Some("192.168.1.1"));
}

#[tokio::test]
async fn test_get_status_unknown_device_is_empty_snapshot() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let status = client.get_status("nobody").await.unwrap();

    assert_eq!(status, pwmon_api::StatusSnapshot::default());
}

#[tokio::test]
async fn test_get_status_lenient_numbers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_bytes": "2048",
            "lan_bytes": 10.0,
            "local_bytes": null,
            "rules": "n/a",
            "ts": 1_718_447_400
        })))
        .mount(&server)
        .await;

    let status = client.get_status("default").await.unwrap();

    assert_eq!(status.total_bytes, 2048);
    assert_eq!(status.lan_bytes, 10);
    assert_eq!(status.local_bytes, 0);
    assert_eq!(status.rules, 0);
    assert_eq!(status.ts.as_deref(), Some("1718447400"));
}

#[tokio::test]
async fn test_device_key_is_url_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(query_param("device", "a b&c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rules": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.get_status("a b&c").await.unwrap();
    assert_eq!(status.rules, 1);
}

// ── Failure tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "total_bytes": 5 })))
        .mount(&server)
        .await;

    let result = client.get_status("default").await;

    assert!(
        matches!(result, Err(Error::Status { status: 401, .. })),
        "expected Status error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = CollectorClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
    );

    let result = client.list_devices().await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "key": "gw",
                "device": "gateway",
                "ip": "10.0.0.1",
                "received_at": 1_700_000_100,
                "total_bytes": 4096,
                "lan_bytes": 1024,
                "local_bytes": 2048
            },
            { "key": "ap", "device": "ap", "ip": "", "received_at": 0 }
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].key, "gw");
    assert_eq!(devices[0].label(), "gateway");
    assert_eq!(devices[0].received_at, 1_700_000_100);
    assert_eq!(devices[1].ip, None);
    assert_eq!(devices[1].total_bytes, 0);
}

#[tokio::test]
async fn test_list_devices_null_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert!(client.list_devices().await.unwrap().is_empty());
}

// ── History tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_get_history() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/history"))
        .and(query_param("device", "gw"))
        .and(query_param("since", "1700000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "t": 1_700_000_010, "total_bytes": 100, "lan_bytes": 40, "local_bytes": 60 },
            { "t": 1_700_000_020, "total_bytes": 250 }
        ])))
        .mount(&server)
        .await;

    let points = client.get_history("gw", 1_700_000_000).await.unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].t, 1_700_000_010);
    assert_eq!(points[1].total_bytes, 250);
}

// ── Config tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_config() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "router_url": "http://192.168.1.1/cgi-bin/stats",
            "router_user": "root",
            "interval": 15,
            "enabled": 1
        })))
        .mount(&server)
        .await;

    let cfg = client.get_config().await.unwrap();

    assert_eq!(cfg.router_url.as_deref(), Some("http://192.168.1.1/cgi-bin/stats"));
    assert_eq!(cfg.router_user.as_deref(), Some("root"));
    assert_eq!(cfg.interval, Some(15));
    assert!(cfg.enabled);
}

#[tokio::test]
async fn test_save_config_sends_full_object() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_json(json!({
            "router_url": "http://r",
            "router_user": "admin",
            "router_pass": "",
            "interval": 10,
            "enabled": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let update = ConfigUpdate {
        router_url: "http://r".into(),
        router_user: "admin".into(),
        router_pass: SecretString::from(String::new()),
        interval: 10,
        enabled: false,
    };

    let reply = client.save_config(&update).await.unwrap();
    assert_eq!(reply, json!({ "ok": true }));
}

#[tokio::test]
async fn test_config_update_debug_redacts_password() {
    let update = ConfigUpdate {
        router_url: String::new(),
        router_user: String::new(),
        router_pass: SecretString::from("hunter2".to_string()),
        interval: 10,
        enabled: true,
    };

    assert!(!format!("{update:?}").contains("hunter2"));
}

// ── Pull tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_pull_now_ok() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let resp = client.pull_now().await.unwrap();
    assert!(resp.ok);
}

#[tokio::test]
async fn test_pull_now_error_reply() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "router_url not set" })),
        )
        .mount(&server)
        .await;

    let resp = client.pull_now().await.unwrap();
    assert!(!resp.ok);
    assert_eq!(resp.error.as_deref(), Some("router_url not set"));
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/dash/", server.uri())).unwrap();
    let client = CollectorClient::with_client(reqwest::Client::new(), base_url);

    Mock::given(method("POST"))
        .and(path("/dash/api/pull"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.pull_now().await.unwrap().ok);
}
