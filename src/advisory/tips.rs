//! Short crop-care tips keyed by normalized crop name.

pub const NO_TIPS_MESSAGE: &str = "Sorry, no tips available for this crop.";

static CROP_TIPS: &[(&str, &str)] = &[
    ("rice", "Keep soil flooded, apply fertilizer in 3 stages, and control weeds weekly."),
    ("wheat", "Sow in cool weather, irrigate after 20 days, and apply nitrogen in 2 doses."),
    ("maize", "Ensure full sunlight, water regularly, and protect from pests like stem borer."),
    ("cotton", "Use deep well-drained soil, avoid waterlogging, and spray neem-based pesticide."),
    ("sugarcane", "Use well-rotted compost, ensure drip irrigation, and remove dry leaves regularly."),
    ("banana", "Maintain high humidity, use potassium-rich fertilizer, and support the plant during wind."),
    ("millets", "Tolerates drought, grow in sandy soil, and avoid over-irrigation."),
    ("ground nuts", "Use sandy loam soil, apply gypsum during flowering, and avoid waterlogging for better yield."),
    ("orange", "Needs well-drained sandy loam soil with pH between 5.5 and 6.5. Regular watering and good sunlight are essential."),
];

/// Care tip for a crop key, or [`NO_TIPS_MESSAGE`] when the crop is unknown
pub fn tips_for(key: &str) -> &'static str {
    CROP_TIPS
        .iter()
        .find(|(crop, _)| *crop == key)
        .map(|(_, tip)| *tip)
        .unwrap_or(NO_TIPS_MESSAGE)
}

/// Crop keys that have a tip (for testing/debugging)
pub fn known_crops() -> impl Iterator<Item = &'static str> {
    CROP_TIPS.iter().map(|(crop, _)| *crop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nine_known_crops() {
        assert_eq!(known_crops().count(), 9);
        for crop in known_crops() {
            assert_ne!(tips_for(crop), NO_TIPS_MESSAGE, "missing tip for {}", crop);
        }
    }

    #[test]
    fn test_fixed_tip_text() {
        assert_eq!(
            tips_for("rice"),
            "Keep soil flooded, apply fertilizer in 3 stages, and control weeds weekly."
        );
        assert!(tips_for("ground nuts").contains("gypsum"));
    }

    #[test]
    fn test_unknown_crop_sentinel() {
        assert_eq!(tips_for("dragonfruit"), "Sorry, no tips available for this crop.");
        // Lookup is by normalized key only
        assert_eq!(tips_for("groundnut"), NO_TIPS_MESSAGE);
        assert_eq!(tips_for("Rice"), NO_TIPS_MESSAGE);
    }
}
