use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::CatalogError;
use crate::models::{CityInfo, Poi, PriceTier};

static BUILTIN: OnceCell<Arc<PoiCatalog>> = OnceCell::new();

/// Read-only POI collection in declaration order. Declaration order is the
/// tie-break for equally scored POIs, so it is never re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiCatalog {
    pois: Vec<Poi>,
}

impl PoiCatalog {
    pub fn new(pois: Vec<Poi>) -> Result<Self, CatalogError> {
        let mut pois = pois;
        for (index, poi) in pois.iter_mut().enumerate() {
            poi.city = poi.city.trim().to_lowercase();
            if poi.city.is_empty() {
                return Err(CatalogError::InvalidRecord {
                    index,
                    reason: "city is empty",
                });
            }
            if poi.name.trim().is_empty() {
                return Err(CatalogError::InvalidRecord {
                    index,
                    reason: "name is empty",
                });
            }
            if poi.avg_stay == 0 {
                return Err(CatalogError::InvalidRecord {
                    index,
                    reason: "avg_stay must be positive",
                });
            }
        }
        Ok(Self { pois })
    }

    /// Process-wide built-in sample catalog.
    pub fn builtin() -> Arc<Self> {
        BUILTIN
            .get_or_init(|| Arc::new(Self { pois: builtin_pois() }))
            .clone()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let pois = serde_json::from_str::<Vec<Poi>>(raw)?;
        Self::new(pois)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    pub fn for_city<'a>(&'a self, city: &'a str) -> impl Iterator<Item = &'a Poi> + 'a {
        self.pois
            .iter()
            .filter(move |poi| poi.city.eq_ignore_ascii_case(city.trim()))
    }

    pub fn city_codes(&self) -> BTreeSet<String> {
        self.pois.iter().map(|poi| poi.city.clone()).collect()
    }

    /// Catalog cities plus curated cities, sorted by code.
    pub fn list_cities(&self) -> Vec<CityInfo> {
        let curated = curated_city_info();
        let mut codes = self.city_codes();
        codes.extend(curated.iter().map(|info| info.code.clone()));

        codes
            .into_iter()
            .map(|code| {
                curated
                    .iter()
                    .find(|info| info.code == code)
                    .cloned()
                    .unwrap_or_else(|| CityInfo {
                        label: title_case(&code),
                        code,
                        description: String::new(),
                        image_path: String::new(),
                    })
            })
            .collect()
    }
}

pub fn curated_city_info() -> Vec<CityInfo> {
    vec![
        CityInfo {
            code: "osaka".to_string(),
            label: "Osaka".to_string(),
            description: "The flagship city of the Kansai region, famous for street food, night views and shopping. Lively districts such as Namba, Umeda and Dotonbori are packed close together.".to_string(),
            image_path: "/static/cities/osaka.png".to_string(),
        },
        CityInfo {
            code: "seoul".to_string(),
            label: "Seoul".to_string(),
            description: "The capital of South Korea, where palaces and hanok villages sit next to high-rise skylines. Food, shopping and night views are all within easy reach.".to_string(),
            image_path: "/static/cities/seoul.jpg".to_string(),
        },
    ]
}

pub(crate) fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

fn builtin_pois() -> Vec<Poi> {
    vec![
        poi("osaka", "Dōtonbori", &["night-view", "food", "shopping"], 90, 10, PriceTier::Low, "Photo spot in front of the Glico sign"),
        poi("osaka", "Osaka Castle Park", &["history", "nature"], 120, 20, PriceTier::Low, "Busy in cherry blossom season"),
        poi("osaka", "Umeda Sky Building", &["night-view", "scenic-overlook"], 80, 15, PriceTier::Mid, "Observatory admission required"),
        poi("osaka", "Kaiyukan Aquarium", &["family", "indoor", "animals"], 150, 18, PriceTier::High, "Popular with families"),
        poi("osaka", "Hozenji Yokocho", &["retro", "food", "photo"], 60, 8, PriceTier::Mid, "Best atmosphere after dark"),
        poi("seoul", "Bukchon Hanok Village", &["traditional", "photo", "walk"], 90, 15, PriceTier::Low, "Pairs well with hanbok rental"),
        poi("seoul", "DDP", &["modern-architecture", "exhibition", "photo"], 70, 12, PriceTier::Low, "Exhibitions rotate"),
        poi("seoul", "N Seoul Tower", &["scenic-overlook", "night-view"], 80, 20, PriceTier::Mid, "Cable car option"),
        poi("seoul", "Gwangjang Market", &["food", "traditional-market"], 60, 10, PriceTier::Low, "Mung bean pancakes and mayak gimbap"),
    ]
}

fn poi(
    city: &str,
    name: &str,
    tags: &[&str],
    avg_stay: u32,
    walk_min: u32,
    price: PriceTier,
    notes: &str,
) -> Poi {
    Poi {
        city: city.to_string(),
        name: name.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        avg_stay,
        walk_min,
        price,
        notes: notes.to_string(),
    }
}
