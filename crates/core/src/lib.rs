pub mod catalog;
pub mod error;
pub mod models;
pub mod narrative;
pub mod planner;
pub mod request;
pub mod scoring;

pub use catalog::{curated_city_info, PoiCatalog};
pub use error::{CatalogError, PreferenceError};
pub use models::*;
pub use narrative::fallback_narrative;
pub use planner::{
    allocate, assemble, plan_itinerary, plan_variants, rank_and_select, variant_id, DayAllocation,
};
pub use request::{PlanRequest, ResolvedPlanRequest, MAX_PLANS};
pub use scoring::{score_poi, Eligibility, ExclusionReason};
