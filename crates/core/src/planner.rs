use std::cmp::Ordering;

use crate::models::{
    day_label, DayPlan, DaySchedule, Itinerary, ItineraryItem, PlanVariant, Poi, Preference, Slot,
};
use crate::scoring::{score_poi, SCENIC_TAGS};

/// Items per day, index 0 is "Day 1".
pub type DayAllocation = Vec<Vec<ItineraryItem>>;

/// Scores every POI, keeps strictly positive ones in descending score order
/// (stable, so ties keep catalog order) and rotates left by `variant`.
pub fn rank_and_select<'a>(pois: &'a [Poi], pref: &Preference, variant: usize) -> Vec<&'a Poi> {
    let mut scored = pois
        .iter()
        .filter_map(|poi| {
            score_poi(poi, pref)
                .rankable_score()
                .map(|score| (score, poi))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let mut ranked = scored.into_iter().map(|(_, poi)| poi).collect::<Vec<_>>();
    if variant > 0 && ranked.len() > 1 {
        let shift = variant % ranked.len();
        ranked.rotate_left(shift);
    }
    ranked
}

/// Round-robin over days; scenic POIs grab Night, then Dinner, then fall back
/// to the day's next cyclic slot even if that slot is already taken.
pub fn allocate(ranked: &[&Poi], days: u32) -> DayAllocation {
    let day_count = days as usize;
    let mut allocation: DayAllocation = vec![Vec::new(); day_count];
    if day_count == 0 {
        return allocation;
    }

    for (index, poi) in ranked.iter().enumerate() {
        let day_plan = &mut allocation[index % day_count];
        let slot = choose_slot(day_plan, poi);
        day_plan.push(ItineraryItem::from_poi(poi, slot));
    }

    allocation
}

fn choose_slot(day_plan: &[ItineraryItem], poi: &Poi) -> Slot {
    let default_slot = Slot::from_index(day_plan.len());
    if !poi.has_any_tag(&SCENIC_TAGS) {
        return default_slot;
    }

    let used = |slot: Slot| day_plan.iter().any(|item| item.slot == slot);
    if !used(Slot::Night) {
        Slot::Night
    } else if !used(Slot::Dinner) {
        Slot::Dinner
    } else {
        default_slot
    }
}

/// Labels `Day 1..=days`; days missing from `allocation` come out empty.
pub fn assemble(city: &str, days: u32, allocation: DayAllocation) -> Itinerary {
    let mut allocated = allocation.into_iter();
    let schedule = (1..=days)
        .map(|day| DayPlan {
            label: day_label(day),
            items: allocated.next().unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    Itinerary {
        city: city.to_string(),
        days,
        itinerary: DaySchedule::new(schedule),
    }
}

pub fn plan_itinerary(pois: &[Poi], pref: &Preference, variant: usize) -> Itinerary {
    let ranked = rank_and_select(pois, pref, variant);
    let allocation = allocate(&ranked, pref.days);
    assemble(&pref.city, pref.days, allocation)
}

pub fn plan_variants(pois: &[Poi], pref: &Preference, num_plans: usize) -> Vec<PlanVariant> {
    (0..num_plans)
        .map(|variant| PlanVariant {
            id: variant_id(variant),
            draft: plan_itinerary(pois, pref, variant),
        })
        .collect()
}

/// "A", "B", "C", ...
pub fn variant_id(index: usize) -> String {
    u32::try_from(index)
        .ok()
        .and_then(|offset| offset.checked_add(65))
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_else(|| format!("V{}", index))
}
