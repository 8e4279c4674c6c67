use anyhow::{Context, Result};
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the game server, e.g. `http://localhost:8000`.
    pub server_http: String,
    /// Push channel endpoint, e.g. `ws://localhost:8000/ws`.
    pub server_ws: String,
    /// Host-platform identity token, attached verbatim to every request.
    pub identity_token: String,

    pub poll_interval_secs: u64,
    pub ws_reconnect_secs: u64,
    /// Hard deadline on every HTTP request; a stalled server fails the
    /// request instead of wedging whatever awaits it.
    pub http_timeout_secs: u64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server_http = trim_slash(env_or("BAZAAR_SERVER_URL", "http://localhost:8000"));
        Url::parse(&server_http)
            .with_context(|| format!("invalid BAZAAR_SERVER_URL: {server_http}"))?;

        let default_ws = derive_ws_url(&server_http);
        let server_ws = env_or("BAZAAR_WS_URL", &default_ws);
        Url::parse(&server_ws).with_context(|| format!("invalid BAZAAR_WS_URL: {server_ws}"))?;

        Ok(Self {
            server_http,
            server_ws,
            identity_token: env_or("BAZAAR_IDENTITY_TOKEN", ""),
            poll_interval_secs: env_or("POLL_INTERVAL_SECS", "2").parse()?,
            ws_reconnect_secs: env_or("WS_RECONNECT_SECS", "3").parse()?,
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", "10").parse()?,
            log_level: env_or("LOG_LEVEL", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// `http(s)://host` → `ws(s)://host/ws`, mirroring how the server exposes its push channel.
fn derive_ws_url(http_url: &str) -> String {
    let ws = if let Some(rest) = http_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = http_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        http_url.to_string()
    };
    format!("{ws}/ws")
}
