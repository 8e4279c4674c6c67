/// Tests for the HTTP client's failure bounds: a server that accepts the
/// connection but never answers must fail the request at the configured
/// deadline instead of hanging its caller.
use std::time::Duration;

use tokio::net::TcpListener;

use crate::api::ApiClient;
use crate::config::Config;

#[tokio::test]
async fn stalled_server_fails_the_fetch_at_the_deadline() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and hold the connection open without ever responding.
        if let Ok((socket, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        }
    });

    let config = Config {
        server_http: format!("http://{addr}"),
        server_ws: format!("ws://{addr}/ws"),
        identity_token: String::new(),
        poll_interval_secs: 2,
        ws_reconnect_secs: 3,
        http_timeout_secs: 1,
        log_level: "info".to_string(),
    };
    let api = ApiClient::new(&config).unwrap();

    let fetch = tokio::time::timeout(Duration::from_secs(5), api.building_details("Ферма")).await;
    // The request's own deadline fires first, well inside the outer bound.
    let result = fetch.expect("request should resolve before the outer bound");
    assert!(result.is_err());
}
