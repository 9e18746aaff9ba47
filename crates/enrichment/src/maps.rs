use std::fmt;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use travelbot_core::GeoPoint;

use crate::config::{redact, MapsConfig};
use crate::MapsEnricher;

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/";
const PLACES_TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<TextSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    geometry: TextSearchGeometry,
}

#[derive(Debug, Deserialize)]
struct TextSearchGeometry {
    location: GeoPoint,
}

#[derive(Clone)]
pub struct GoogleMapsClient {
    http_client: Client,
    api_key: Option<String>,
}

impl GoogleMapsClient {
    pub fn new(config: MapsConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build maps HTTP client")?;

        Ok(Self {
            http_client,
            api_key: config.api_key,
        })
    }
}

impl fmt::Debug for GoogleMapsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleMapsClient")
            .field("api_key", &redact(self.api_key.as_deref()))
            .finish_non_exhaustive()
    }
}

impl MapsEnricher for GoogleMapsClient {
    fn search_link(&self, name: &str, city: &str) -> String {
        search_link(name, city)
    }

    fn geocoding_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let response = self
            .http_client
            .get(PLACES_TEXT_SEARCH_URL)
            .query(&[("query", query), ("key", api_key)])
            .send()
            .await
            .context("places text search request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("places text search returned status {}", status.as_u16());
        }

        let body: TextSearchResponse = response
            .json()
            .await
            .context("places text search parse failed")?;
        let point = first_location(body);
        debug!(query = %query, found = point.is_some(), "geocoded itinerary item");
        Ok(point)
    }
}

/// Deterministic search link for `"{name} {city}"`.
pub fn search_link(name: &str, city: &str) -> String {
    let query = format!("{} {}", name, city);
    format!(
        "{}?api=1&query={}",
        MAPS_SEARCH_BASE,
        urlencoding::encode(&query)
    )
}

fn first_location(body: TextSearchResponse) -> Option<GeoPoint> {
    body.results
        .into_iter()
        .next()
        .map(|result| result.geometry.location)
}
