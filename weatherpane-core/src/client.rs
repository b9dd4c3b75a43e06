use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    error::WidgetError,
    model::{CitySuggestion, WeatherQuery},
};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1/";

/// Days requested from `forecast.json` by the weekly panel.
pub const FORECAST_DAYS: u8 = 7;

/// Upper bound on suggestions kept from one `search.json` response.
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Forecast { days: u8 },
    Search,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "current.json",
            Endpoint::Forecast { .. } => "forecast.json",
            Endpoint::Search => "search.json",
        }
    }
}

/// Anything that can answer a weather API request with a decoded JSON body.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &WeatherQuery,
    ) -> Result<serde_json::Value, WidgetError>;
}

/// WeatherAPI.com over HTTPS.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point the client at another host. A trailing `/` is added if missing.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &WeatherQuery,
    ) -> Result<serde_json::Value, WidgetError> {
        let url = format!("{}{}", self.base_url, endpoint.path());

        let mut req =
            self.http.get(&url).query(&[("key", self.api_key.as_str()), ("q", query.as_str())]);
        if let Endpoint::Forecast { days } = endpoint {
            req = req.query(&[("days", days.to_string())]);
        }

        tracing::debug!(endpoint = endpoint.path(), %query, "sending request");

        let res = req.send().await.map_err(|e| {
            WidgetError::FetchFailed(format!("failed to send request to {}: {e}", endpoint.path()))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WidgetError::FetchFailed(format!("failed to read {} response body: {e}", endpoint.path()))
        })?;

        if !status.is_success() {
            tracing::warn!(
                endpoint = endpoint.path(),
                %status,
                body = %truncate_body(&body),
                "request rejected"
            );
            return Err(WidgetError::FetchFailed(format!(
                "{} request failed with status {status}",
                endpoint.path()
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WidgetError::FetchFailed(format!("failed to parse {} JSON: {e}", endpoint.path()))
        })
    }
}

/// Look up city names for autocomplete, keeping at most [`MAX_SUGGESTIONS`].
pub async fn search_cities(
    source: &dyn WeatherSource,
    query: &str,
) -> Result<Vec<CitySuggestion>, WidgetError> {
    let body = source
        .fetch(Endpoint::Search, &WeatherQuery::new(query))
        .await
        .map_err(|e| WidgetError::SuggestionFetchFailed(e.to_string()))?;

    let mut cities: Vec<CitySuggestion> = serde_json::from_value(body)
        .map_err(|e| WidgetError::SuggestionFetchFailed(format!("unexpected search body: {e}")))?;
    cities.truncate(MAX_SUGGESTIONS);

    Ok(cities)
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
