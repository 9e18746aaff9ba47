use std::collections::HashSet;

use crate::models::{Poi, Preference, TravelStyle};

pub const INTEREST_MATCH_POINTS: f64 = 2.0;
pub const FAMILY_BONUS: f64 = 1.5;
pub const SCENIC_BONUS: f64 = 0.8;

/// Tags that earn the flat scenic bonus and prefer the evening slots.
pub const SCENIC_TAGS: [&str; 2] = ["night-view", "scenic-overlook"];
const FAMILY_TAGS: [&str; 2] = ["family", "indoor"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    OtherCity,
    TooFarToWalk { walk_min: u32, max_walk_min: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Eligibility {
    Eligible(f64),
    Excluded(ExclusionReason),
}

impl Eligibility {
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Eligible(score) => Some(*score),
            Self::Excluded(_) => None,
        }
    }

    /// Only strictly positive scores make it into an itinerary.
    pub fn rankable_score(&self) -> Option<f64> {
        self.score().filter(|score| *score > 0.0)
    }
}

pub fn score_poi(poi: &Poi, pref: &Preference) -> Eligibility {
    if !poi.city.trim().eq_ignore_ascii_case(pref.city.trim()) {
        return Eligibility::Excluded(ExclusionReason::OtherCity);
    }
    if poi.walk_min > pref.max_walk_min {
        return Eligibility::Excluded(ExclusionReason::TooFarToWalk {
            walk_min: poi.walk_min,
            max_walk_min: pref.max_walk_min,
        });
    }

    let interests = pref
        .interests
        .iter()
        .map(|interest| interest.trim())
        .collect::<HashSet<_>>();
    let overlap = poi
        .tags
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&interests)
        .count();

    let mut score = overlap as f64 * INTEREST_MATCH_POINTS;

    if pref.with_kids && poi.has_any_tag(&FAMILY_TAGS) {
        score += FAMILY_BONUS;
    }

    if poi.has_any_tag(&SCENIC_TAGS) {
        score += SCENIC_BONUS;
    }

    Eligibility::Eligible(score + style_bonus(poi, &pref.travel_style))
}

fn style_bonus(poi: &Poi, style: &TravelStyle) -> f64 {
    let (tags, bonus): (&[&str], f64) = match style {
        TravelStyle::Relax => (&["nature", "walk", "cafe"], 1.5),
        TravelStyle::Foodie => (&["food"], 2.0),
        TravelStyle::Sightseeing => (&["history", "traditional", "scenic-overlook"], 1.5),
        TravelStyle::Shopping => (&["shopping", "traditional-market"], 1.5),
        TravelStyle::Mixed | TravelStyle::Other(_) => return 0.0,
    };

    if poi.has_any_tag(tags) {
        bonus
    } else {
        0.0
    }
}
