use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::config::Config;
use crate::types::{
    ActionResponse, BuildingDetails, BuildingOffer, PlayerState, PriceQuote, PricesEnvelope,
    ResourceDetails,
};

const IDENTITY_HEADER: &str = "X-Identity-Token";

#[derive(Debug, serde::Deserialize)]
struct RoundInfo {
    #[serde(default)]
    current_round: u32,
}

#[derive(Debug, serde::Deserialize)]
struct BuildingsOffered {
    #[serde(default)]
    buildings: Vec<BuildingOffer>,
}

#[derive(Debug, Serialize)]
struct AuthBody<'a> {
    nickname: &'a str,
    photo_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct TradeBody<'a> {
    resource: &'a str,
    amount: u32,
}

#[derive(Debug, Serialize)]
struct BuildBody<'a> {
    building_name: &'a str,
}

#[derive(Debug, Serialize)]
struct SellBuildingBody<'a> {
    building_id: &'a str,
}

/// One shared HTTP client for the pull channel, detail fetches and actions.
/// The host-platform identity token rides along on every request.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !config.identity_token.is_empty() {
            let value = HeaderValue::from_str(&config.identity_token)
                .context("identity token is not a valid header value")?;
            headers.insert(IDENTITY_HEADER, value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        let base = Url::parse(&config.server_http).context("invalid server base URL")?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("server URL cannot be a base"))?;
            // Url percent-encodes non-ASCII segments (catalog names are Cyrillic).
            path.extend(segments);
        }
        Ok(url)
    }

    pub async fn player_state(&self) -> Result<PlayerState> {
        let url = self.endpoint(&["api", "miniapp", "player", "state"])?;
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    pub async fn authorize(&self, nickname: &str, photo_url: Option<&str>) -> Result<ActionResponse> {
        let url = self.endpoint(&["api", "miniapp", "player", "auth"])?;
        let body = AuthBody { nickname, photo_url };
        self.post_action(url, &body).await
    }

    pub async fn prices(&self) -> Result<Vec<PriceQuote>> {
        let url = self.endpoint(&["api", "miniapp", "prices"])?;
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let envelope: PricesEnvelope = resp.json().await?;
        Ok(envelope.prices)
    }

    pub async fn round_info(&self) -> Result<u32> {
        let url = self.endpoint(&["api", "miniapp", "round-info"])?;
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let info: RoundInfo = resp.json().await?;
        Ok(info.current_round)
    }

    pub async fn building_offers(&self) -> Result<Vec<BuildingOffer>> {
        let url = self.endpoint(&["api", "miniapp", "buildings"])?;
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let offered: BuildingsOffered = resp.json().await?;
        Ok(offered.buildings)
    }

    pub async fn building_details(&self, name: &str) -> Result<BuildingDetails> {
        let url = self.endpoint(&["api", "building", name])?;
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    pub async fn resource_details(&self, name: &str) -> Result<ResourceDetails> {
        let url = self.endpoint(&["api", "resource", name])?;
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    pub async fn buy_resource(&self, resource: &str, amount: u32) -> Result<ActionResponse> {
        let url = self.endpoint(&["api", "miniapp", "player", "buy-resource"])?;
        self.post_action(url, &TradeBody { resource, amount }).await
    }

    pub async fn sell_resource(&self, resource: &str, amount: u32) -> Result<ActionResponse> {
        let url = self.endpoint(&["api", "miniapp", "player", "sell-resource"])?;
        self.post_action(url, &TradeBody { resource, amount }).await
    }

    pub async fn build(&self, building_name: &str) -> Result<ActionResponse> {
        let url = self.endpoint(&["api", "miniapp", "player", "build"])?;
        self.post_action(url, &BuildBody { building_name }).await
    }

    pub async fn sell_building(&self, building_id: &str) -> Result<ActionResponse> {
        let url = self.endpoint(&["api", "miniapp", "player", "sell-building"])?;
        self.post_action(url, &SellBuildingBody { building_id }).await
    }

    /// POST a mutation and decode the shared `{success, message}` shape.
    /// Non-2xx bodies still carry a message worth surfacing, so the decode is
    /// tolerant of the HTTP status.
    async fn post_action<B: Serialize>(&self, url: Url, body: &B) -> Result<ActionResponse> {
        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = %status, body = text, "action HTTP error");
        }
        let parsed: ActionResponse = serde_json::from_str(&text).unwrap_or(ActionResponse {
            success: false,
            message: Some(text),
        });
        Ok(parsed)
    }
}
