use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, instrument, warn};
use travelbot_core::{
    fallback_narrative, plan_variants, CityInfo, Itinerary, MapDecoration, PlanNarrative,
    PlanSummary, PlanVariant, PoiCatalog, Preference, ResolvedPlanRequest,
};
use travelbot_enrichment::{MapsEnricher, NarrativeGenerator};
use travelbot_observability::AppMetrics;

#[derive(Debug, Clone, Serialize)]
pub struct PlanPayload {
    pub id: String,
    pub draft: Itinerary,
    pub narrative: String,
    pub summary: PlanSummary,
}

/// `draft` and `narrative` repeat the first plan for older clients.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub pref: Preference,
    pub plans: Vec<PlanPayload>,
    pub draft: Option<Itinerary>,
    pub narrative: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Capabilities {
    pub llm: bool,
    pub maps: bool,
}

pub struct TravelPlanner<M, N>
where
    M: MapsEnricher,
    N: NarrativeGenerator,
{
    catalog: Arc<PoiCatalog>,
    maps: Arc<M>,
    narrator: Arc<N>,
    metrics: Arc<AppMetrics>,
}

impl<M, N> TravelPlanner<M, N>
where
    M: MapsEnricher,
    N: NarrativeGenerator,
{
    pub fn new(
        catalog: Arc<PoiCatalog>,
        maps: Arc<M>,
        narrator: Arc<N>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            catalog,
            maps,
            narrator,
            metrics,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            llm: self.narrator.llm_enabled(),
            maps: self.maps.geocoding_enabled(),
        }
    }

    pub fn cities(&self) -> Vec<CityInfo> {
        self.catalog.list_cities()
    }

    #[instrument(
        skip(self, request),
        fields(
            city = %request.preference.city,
            days = request.preference.days,
            num_plans = request.num_plans
        )
    )]
    pub async fn plan(&self, request: ResolvedPlanRequest) -> Result<PlanResponse> {
        let started = Instant::now();
        self.metrics.inc_plan_request();

        let ResolvedPlanRequest {
            preference,
            num_plans,
        } = request;

        let variants = plan_variants(self.catalog.pois(), &preference, num_plans);
        for variant in &variants {
            self.metrics.add_variant(variant.draft.total_items());
        }

        let plans = join_all(
            variants
                .into_iter()
                .map(|variant| self.decorate_variant(&preference, variant)),
        )
        .await;

        let first = plans.first();
        let draft = first.map(|plan| plan.draft.clone());
        let narrative = first.map(|plan| plan.narrative.clone()).unwrap_or_default();

        self.metrics.observe_latency(started.elapsed());
        info!(
            plans = plans.len(),
            items = plans.iter().map(|plan| plan.draft.total_items()).sum::<usize>(),
            "plan handled"
        );

        Ok(PlanResponse {
            pref: preference,
            plans,
            draft,
            narrative,
        })
    }

    async fn decorate_variant(
        &self,
        pref: &Preference,
        variant: PlanVariant,
    ) -> PlanPayload {
        let PlanVariant { id, mut draft } = variant;

        self.attach_maps(&pref.city, &mut draft).await;
        let narrative = self.narrate(pref, &draft).await;

        PlanPayload {
            id,
            draft,
            narrative: narrative.narrative,
            summary: narrative.summary,
        }
    }

    async fn attach_maps(&self, city: &str, itinerary: &mut Itinerary) {
        let geocoding = self.maps.geocoding_enabled();

        let lookups = itinerary.items_mut().map(|item| async move {
            let point = if geocoding {
                let query = format!("{} {}", item.name, city);
                match self.maps.geocode(&query).await {
                    Ok(point) => point,
                    Err(error) => {
                        self.metrics.inc_geocode_failure();
                        warn!(item = %item.name, error = %error, "geocoding failed, omitting coordinates");
                        None
                    }
                }
            } else {
                None
            };
            item.map = Some(MapDecoration::new(
                self.maps.search_link(&item.name, city),
                point,
            ));
        });

        join_all(lookups).await;
    }

    async fn narrate(&self, pref: &Preference, itinerary: &Itinerary) -> PlanNarrative {
        if !self.narrator.llm_enabled() {
            self.metrics.inc_narrative_fallback();
            return fallback_narrative(pref);
        }

        match self.narrator.generate(pref, itinerary).await {
            Ok(narrative) => narrative,
            Err(error) => {
                self.metrics.inc_narrative_fallback();
                warn!(error = %error, "narrative generation failed, using template");
                fallback_narrative(pref)
            }
        }
    }
}
