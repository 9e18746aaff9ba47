mod config;
mod maps;
mod narrative;

use std::future::Future;

use anyhow::Result;
use travelbot_core::{GeoPoint, Itinerary, PlanNarrative, Preference};

pub use config::{EnrichmentConfig, MapsConfig, OpenAiConfig};
pub use maps::{search_link, GoogleMapsClient};
pub use narrative::{parse_narrative_content, OpenAiNarrator};

/// Attaches map data to finished itinerary items.
pub trait MapsEnricher: Send + Sync {
    fn search_link(&self, name: &str, city: &str) -> String;

    fn geocoding_enabled(&self) -> bool;

    /// `Ok(None)` when the lookup ran but found nothing.
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Option<GeoPoint>>> + Send;
}

pub trait NarrativeGenerator: Send + Sync {
    fn llm_enabled(&self) -> bool;

    fn generate(
        &self,
        pref: &Preference,
        itinerary: &Itinerary,
    ) -> impl Future<Output = Result<PlanNarrative>> + Send;
}

#[derive(Debug, Clone)]
pub struct EnrichmentStack {
    pub maps: GoogleMapsClient,
    pub narrator: OpenAiNarrator,
}

impl EnrichmentStack {
    pub fn from_config(config: EnrichmentConfig) -> Result<Self> {
        Ok(Self {
            maps: GoogleMapsClient::new(config.maps)?,
            narrator: OpenAiNarrator::new(config.openai)?,
        })
    }
}
