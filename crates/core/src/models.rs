use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "$")]
    Low,
    #[serde(rename = "$$")]
    Mid,
    #[serde(rename = "$$$")]
    High,
}

impl PriceTier {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "$" => Some(Self::Low),
            "$$" => Some(Self::Mid),
            "$$$" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            Self::Low => "$",
            Self::Mid => "$$",
            Self::High => "$$$",
        }
    }
}

/// Travel style as sent by the client. Unrecognised labels are kept verbatim
/// and earn no style bonus, exactly like `Mixed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TravelStyle {
    Relax,
    Foodie,
    Sightseeing,
    Shopping,
    Mixed,
    Other(String),
}

impl TravelStyle {
    pub fn parse(value: &str) -> Self {
        match value {
            "relax" => Self::Relax,
            "foodie" => Self::Foodie,
            "sightseeing" => Self::Sightseeing,
            "shopping" => Self::Shopping,
            "mixed" => Self::Mixed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Relax => "relax",
            Self::Foodie => "foodie",
            Self::Sightseeing => "sightseeing",
            Self::Shopping => "shopping",
            Self::Mixed => "mixed",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl Default for TravelStyle {
    fn default() -> Self {
        Self::Mixed
    }
}

impl From<String> for TravelStyle {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TravelStyle> for String {
    fn from(value: TravelStyle) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub city: String,
    pub name: String,
    pub tags: Vec<String>,
    pub avg_stay: u32,
    pub walk_min: u32,
    pub price: PriceTier,
    #[serde(default)]
    pub notes: String,
}

impl Poi {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    pub fn has_any_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub city: String,
    pub days: u32,
    pub interests: Vec<String>,
    pub with_kids: bool,
    pub budget: String,
    pub max_walk_min: u32,
    pub travel_style: TravelStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Morning,
    Lunch,
    Afternoon,
    Dinner,
    Night,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Morning,
        Slot::Lunch,
        Slot::Afternoon,
        Slot::Dinner,
        Slot::Night,
    ];

    /// Slot at `index` in cyclic order.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Lunch => "Lunch",
            Self::Afternoon => "Afternoon",
            Self::Dinner => "Dinner",
            Self::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Map data attached by the maps collaborator after the core has finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDecoration {
    pub maps_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl MapDecoration {
    pub fn new(maps_url: String, point: Option<GeoPoint>) -> Self {
        Self {
            maps_url,
            lat: point.map(|p| p.lat),
            lng: point.map(|p| p.lng),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub slot: Slot,
    pub name: String,
    pub tags: Vec<String>,
    pub eta_min: u32,
    pub walk_min: u32,
    pub price: PriceTier,
    pub notes: String,
    #[serde(flatten)]
    pub map: Option<MapDecoration>,
}

impl ItineraryItem {
    pub fn from_poi(poi: &Poi, slot: Slot) -> Self {
        Self {
            slot,
            name: poi.name.clone(),
            tags: poi.tags.clone(),
            eta_min: poi.avg_stay,
            walk_min: poi.walk_min,
            price: poi.price,
            notes: poi.notes.clone(),
            map: None,
        }
    }
}

pub fn day_label(day: u32) -> String {
    format!("Day {}", day)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    pub label: String,
    pub items: Vec<ItineraryItem>,
}

/// Day label to items, serialized as a JSON object in day order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaySchedule(Vec<DayPlan>);

impl DaySchedule {
    pub fn new(days: Vec<DayPlan>) -> Self {
        Self(days)
    }

    pub fn get(&self, label: &str) -> Option<&[ItineraryItem]> {
        self.0
            .iter()
            .find(|day| day.label == label)
            .map(|day| day.items.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayPlan> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DayPlan> {
        self.0.iter_mut()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|day| day.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for DaySchedule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for day in &self.0 {
            map.serialize_entry(&day.label, &day.items)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub city: String,
    pub days: u32,
    pub itinerary: DaySchedule,
}

impl Itinerary {
    pub fn total_items(&self) -> usize {
        self.itinerary.iter().map(|day| day.items.len()).sum()
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut ItineraryItem> {
        self.itinerary
            .iter_mut()
            .flat_map(|day| day.items.iter_mut())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanVariant {
    pub id: String,
    pub draft: Itinerary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    #[serde(default)]
    pub for_who: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanNarrative {
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub summary: PlanSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityInfo {
    pub code: String,
    pub label: String,
    pub description: String,
    pub image_path: String,
}
