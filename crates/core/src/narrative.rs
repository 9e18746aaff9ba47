use crate::catalog::title_case;
use crate::models::{PlanNarrative, PlanSummary, Preference};

/// Deterministic narrative used whenever the language model is unavailable.
pub fn fallback_narrative(pref: &Preference) -> PlanNarrative {
    let narrative = format!(
        "Draft {}-day itinerary for {}. Interests: {} / travel style: {} / walking limit {} min / with kids: {}. The main sights of the city are arranged across the Morning to Night slots.",
        pref.days,
        title_case(&pref.city),
        pref.interests.join(", "),
        pref.travel_style,
        pref.max_walk_min,
        pref.with_kids,
    );

    PlanNarrative {
        narrative,
        summary: PlanSummary {
            for_who: "Suits first-time visitors who want a quick tour of the city's signature spots."
                .to_string(),
            highlights: vec![
                "Built around representative spots that match your interests and travel style"
                    .to_string(),
                "Walking time between stops is capped so no leg runs too long".to_string(),
                "Indoor and family-friendly spots are weighted up when travelling with kids"
                    .to_string(),
            ],
            warnings: vec![
                "Opening hours, closing days and weather may require adjusting the plan on the day."
                    .to_string(),
                "Travel times and transport options can vary with local conditions.".to_string(),
            ],
        },
    }
}
