use serde::Serialize;

use crate::model::Coordinates;

/// A cassava-growing town offered as a quick pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresetLocation {
    pub name: &'static str,
    pub region: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl PresetLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

pub const PRESET_LOCATIONS: &[PresetLocation] = &[
    PresetLocation { name: "Kampala", region: "Central", lat: 0.3476, lon: 32.5825 },
    PresetLocation { name: "Mbale", region: "Eastern", lat: 1.0467, lon: 34.1867 },
    PresetLocation { name: "Gulu", region: "Northern", lat: 2.7674, lon: 32.2903 },
    PresetLocation { name: "Mbarara", region: "Western", lat: -0.6117, lon: 29.7283 },
    PresetLocation { name: "Fort Portal", region: "Western", lat: 0.6710, lon: 30.2692 },
    PresetLocation { name: "Soroti", region: "Eastern", lat: 1.7125, lon: 33.5873 },
    PresetLocation { name: "Masaka", region: "Central", lat: -0.3281, lon: 31.7382 },
    PresetLocation { name: "Kabale", region: "Southwest", lat: -1.2500, lon: 29.9833 },
];

/// Case-insensitive lookup by name.
pub fn find_preset(name: &str) -> Option<&'static PresetLocation> {
    let name = name.trim();
    PRESET_LOCATIONS
        .iter()
        .find(|loc| loc.name.eq_ignore_ascii_case(name))
}
