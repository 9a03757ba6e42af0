use super::types::{
    ApiEvent, ApiSession, Category, LiveTimingResponse, Season, StandingsResponse,
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("couldn't build request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("couldn't parse response body: {0}")]
    Json(#[source] reqwest::Error),
}

/// Thin typed client over the public results API. All endpoints are
/// read-only GETs keyed by query parameters.
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: Url, request_timeout: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .build()?;
        Ok(Self { base, client })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FetchError> {
        let url = self.base.join(endpoint)?;
        log::debug!("fetching {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Http)?
            .error_for_status()
            .map_err(FetchError::Http)?;
        response.json().await.map_err(FetchError::Json)
    }

    pub async fn seasons(&self) -> Result<Vec<Season>, FetchError> {
        self.get_json("results/seasons").await
    }

    pub async fn categories(&self, season_uuid: &str) -> Result<Vec<Category>, FetchError> {
        self.get_json(&format!("results/categories?seasonUuid={season_uuid}"))
            .await
    }

    pub async fn standings(
        &self,
        season_uuid: &str,
        category_uuid: &str,
    ) -> Result<StandingsResponse, FetchError> {
        self.get_json(&format!(
            "results/standings?seasonUuid={season_uuid}&categoryUuid={category_uuid}"
        ))
        .await
    }

    pub async fn events(&self, season_uuid: &str) -> Result<Vec<ApiEvent>, FetchError> {
        self.get_json(&format!("results/events?seasonUuid={season_uuid}"))
            .await
    }

    pub async fn sessions(
        &self,
        event_uuid: &str,
        category_uuid: &str,
    ) -> Result<Vec<ApiSession>, FetchError> {
        self.get_json(&format!(
            "results/sessions?eventUuid={event_uuid}&categoryUuid={category_uuid}"
        ))
        .await
    }

    pub async fn live_timing(&self, session_uuid: &str) -> Result<LiveTimingResponse, FetchError> {
        self.get_json(&format!(
            "timing-gateway/livetiming-lite?sessionUuid={session_uuid}"
        ))
        .await
    }
}
