//! Crop Knowledge Base
//!
//! Ideal growing conditions and harvest timing for the crops the advisor
//! knows in detail. Values are typical agronomic ranges for field crops
//! grown in South Asia (the region the classifier was trained on).

use serde::Serialize;
use std::fmt;

/// Inclusive numeric range with a display unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdealRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl IdealRange {
    const fn new(min: f64, max: f64, unit: &'static str) -> Self {
        Self { min, max, unit }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for IdealRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}–{}", self.min, self.max)
        } else {
            write!(f, "{}–{} {}", self.min, self.max, self.unit)
        }
    }
}

/// Structured ideal-condition data for one crop
#[derive(Debug, Clone, Serialize)]
pub struct CropKnowledgeEntry {
    pub crop: &'static str,
    pub temperature: IdealRange,
    pub ph: IdealRange,
    pub rainfall: IdealRange,
    pub tips: &'static str,
    pub harvest_time: &'static str,
}

pub const NO_DETAILS_MESSAGE: &str = "No detailed info available for this crop.";

// ============================================================================
// EMBEDDED CROP DATA
// ============================================================================

static CROP_INFO: &[CropKnowledgeEntry] = &[
    CropKnowledgeEntry {
        crop: "rice",
        temperature: IdealRange::new(20.0, 35.0, "°C"),
        ph: IdealRange::new(5.5, 7.0, ""),
        rainfall: IdealRange::new(1000.0, 2000.0, "mm"),
        tips: "Transplant 25-30 day old seedlings and keep 5 cm of standing water until grain filling.",
        harvest_time: "120-150 days after sowing",
    },
    CropKnowledgeEntry {
        crop: "wheat",
        temperature: IdealRange::new(10.0, 25.0, "°C"),
        ph: IdealRange::new(6.0, 7.5, ""),
        rainfall: IdealRange::new(450.0, 650.0, "mm"),
        tips: "Irrigate at crown root initiation, tillering, flowering and grain filling stages.",
        harvest_time: "110-130 days after sowing",
    },
    CropKnowledgeEntry {
        crop: "maize",
        temperature: IdealRange::new(18.0, 27.0, "°C"),
        ph: IdealRange::new(5.5, 7.5, ""),
        rainfall: IdealRange::new(500.0, 800.0, "mm"),
        tips: "Side-dress nitrogen at knee height and keep the field weed free for the first 45 days.",
        harvest_time: "90-120 days after sowing",
    },
    CropKnowledgeEntry {
        crop: "cotton",
        temperature: IdealRange::new(21.0, 30.0, "°C"),
        ph: IdealRange::new(5.8, 8.0, ""),
        rainfall: IdealRange::new(500.0, 1000.0, "mm"),
        tips: "Needs a long frost-free season; monitor for bollworm from square formation onwards.",
        harvest_time: "150-180 days after sowing",
    },
    CropKnowledgeEntry {
        crop: "sugarcane",
        temperature: IdealRange::new(20.0, 35.0, "°C"),
        ph: IdealRange::new(6.0, 7.5, ""),
        rainfall: IdealRange::new(1500.0, 2500.0, "mm"),
        tips: "Plant healthy three-bud setts and earth up the rows at 90 and 120 days.",
        harvest_time: "10-18 months after planting",
    },
    CropKnowledgeEntry {
        crop: "banana",
        temperature: IdealRange::new(15.0, 35.0, "°C"),
        ph: IdealRange::new(6.0, 7.5, ""),
        rainfall: IdealRange::new(1200.0, 2200.0, "mm"),
        tips: "Remove side suckers regularly and prop the pseudostem once the bunch emerges.",
        harvest_time: "11-15 months after planting",
    },
    CropKnowledgeEntry {
        crop: "millets",
        temperature: IdealRange::new(25.0, 35.0, "°C"),
        ph: IdealRange::new(5.5, 7.5, ""),
        rainfall: IdealRange::new(350.0, 600.0, "mm"),
        tips: "Sow at the onset of the monsoon; one or two weedings are usually enough.",
        harvest_time: "70-100 days after sowing",
    },
    CropKnowledgeEntry {
        crop: "ground nuts",
        temperature: IdealRange::new(22.0, 30.0, "°C"),
        ph: IdealRange::new(6.0, 7.0, ""),
        rainfall: IdealRange::new(500.0, 1000.0, "mm"),
        tips: "Avoid disturbing the soil once pegs start entering it after flowering.",
        harvest_time: "110-140 days after sowing",
    },
    CropKnowledgeEntry {
        crop: "orange",
        temperature: IdealRange::new(13.0, 37.0, "°C"),
        ph: IdealRange::new(5.5, 6.5, ""),
        rainfall: IdealRange::new(1000.0, 1500.0, "mm"),
        tips: "Prune water shoots after harvest and mulch the basin to hold soil moisture.",
        harvest_time: "8-10 months after flowering",
    },
    CropKnowledgeEntry {
        crop: "pulses",
        temperature: IdealRange::new(20.0, 30.0, "°C"),
        ph: IdealRange::new(6.0, 7.5, ""),
        rainfall: IdealRange::new(400.0, 650.0, "mm"),
        tips: "Treat seed with Rhizobium culture; pulses fix their own nitrogen and need little urea.",
        harvest_time: "90-120 days after sowing",
    },
];

/// Knowledge-base entry for a crop key, if the crop is covered
pub fn details_for(key: &str) -> Option<&'static CropKnowledgeEntry> {
    CROP_INFO.iter().find(|entry| entry.crop == key)
}

/// All entries (for testing/debugging)
pub fn entries() -> &'static [CropKnowledgeEntry] {
    CROP_INFO
}
