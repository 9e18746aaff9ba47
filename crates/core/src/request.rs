use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;
use crate::models::{Preference, TravelStyle};

pub const DEFAULT_CITY: &str = "osaka";
pub const DEFAULT_DAYS: i64 = 2;
pub const DEFAULT_INTERESTS: [&str; 2] = ["food", "night-view"];
pub const DEFAULT_BUDGET: &str = "$$";
pub const DEFAULT_MAX_WALK_MIN: i64 = 20;
pub const MAX_DAYS: u32 = 30;
pub const MAX_PLANS: usize = 3;

/// Raw plan request as it arrives from a client; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRequest {
    pub city: Option<String>,
    pub days: Option<i64>,
    pub interests: Option<Vec<String>>,
    pub with_kids: Option<bool>,
    pub budget: Option<String>,
    pub max_walk_min: Option<i64>,
    pub travel_style: Option<String>,
    pub num_plans: Option<i64>,
    /// Accepted for client compatibility; every plan carries its summary.
    pub with_summary: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlanRequest {
    pub preference: Preference,
    pub num_plans: usize,
}

impl PlanRequest {
    pub fn resolve(self) -> Result<ResolvedPlanRequest, PreferenceError> {
        let days = self.days.unwrap_or(DEFAULT_DAYS);
        let days = u32::try_from(days)
            .ok()
            .filter(|value| (1..=MAX_DAYS).contains(value))
            .ok_or(PreferenceError::InvalidDays {
                value: days,
                max: MAX_DAYS,
            })?;

        let max_walk_min = self.max_walk_min.unwrap_or(DEFAULT_MAX_WALK_MIN);
        let max_walk_min = u32::try_from(max_walk_min)
            .map_err(|_| PreferenceError::InvalidWalkLimit(max_walk_min))?;

        let city = self
            .city
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_CITY.to_string());

        let interests = match self.interests {
            Some(values) => values
                .iter()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_INTERESTS.iter().map(|v| v.to_string()).collect(),
        };

        let num_plans = self.num_plans.unwrap_or(1).clamp(1, MAX_PLANS as i64) as usize;

        Ok(ResolvedPlanRequest {
            preference: Preference {
                city,
                days,
                interests,
                with_kids: self.with_kids.unwrap_or(false),
                budget: self.budget.unwrap_or_else(|| DEFAULT_BUDGET.to_string()),
                max_walk_min,
                travel_style: self
                    .travel_style
                    .map(TravelStyle::from)
                    .unwrap_or_default(),
            },
            num_plans,
        })
    }
}
