//! Fertilizer Advisor
//!
//! Maps soil N-P-K readings (kg/ha) to fertilizer advice using fixed
//! agronomic thresholds. Each nutrient is judged independently against its
//! own optimal band; readings inside every band yield a single "optimal"
//! sentinel instead of an empty result.
//!
//! No range validation happens here: negative readings fall into the "low"
//! branches exactly like any other reading below the band.

use serde::Serialize;

/// Primary soil nutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

/// Direction of a reading relative to the optimal band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientLevel {
    Low,
    High,
}

/// Threshold rule for one nutrient.
///
/// Optimal band is the inclusive range `[low_below, high_above]`.
#[derive(Debug, Clone)]
pub struct NutrientRule {
    pub nutrient: Nutrient,
    pub low_below: f64,
    pub high_above: f64,
    pub low_advice: &'static str,
    pub high_advice: &'static str,
}

// ============================================================================
// Decision table (evaluated in this order)
// ============================================================================

pub static FERTILIZER_RULES: &[NutrientRule] = &[
    NutrientRule {
        nutrient: Nutrient::Nitrogen,
        low_below: 90.0,
        high_above: 120.0,
        low_advice: "Nitrogen is low. Use Urea or Ammonium Sulphate.",
        high_advice: "Nitrogen is high. Avoid nitrogen-rich fertilizers.",
    },
    NutrientRule {
        nutrient: Nutrient::Phosphorus,
        low_below: 40.0,
        high_above: 60.0,
        low_advice: "Phosphorus is low. Use Single Super Phosphate (SSP).",
        high_advice: "Phosphorus is high. Avoid over-fertilizing.",
    },
    NutrientRule {
        nutrient: Nutrient::Potassium,
        low_below: 40.0,
        high_above: 60.0,
        low_advice: "Potassium is low. Use Muriate of Potash (MOP).",
        high_advice: "Potassium is high. Reduce potash-based fertilizers.",
    },
];

const LOW_ICON: &str = "🌿";
const HIGH_ICON: &str = "🚫";
const OPTIMAL_ICON: &str = "✅";

pub const OPTIMAL_MESSAGE: &str = "NPK levels are in optimal range. No extra fertilizers needed.";

/// One line of fertilizer advice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceLine {
    pub nutrient: Nutrient,
    pub level: NutrientLevel,
    pub icon: &'static str,
    pub message: &'static str,
}

impl AdviceLine {
    /// "{icon} {message}" as shown to the user
    pub fn display(&self) -> String {
        format!("{} {}", self.icon, self.message)
    }
}

/// Result of [`advise`]. `Adjust` always carries at least one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "lines", rename_all = "snake_case")]
pub enum FertilizerAdvice {
    Optimal,
    Adjust(Vec<AdviceLine>),
}

impl FertilizerAdvice {
    pub fn is_optimal(&self) -> bool {
        matches!(self, FertilizerAdvice::Optimal)
    }

    /// Nutrient-specific lines (empty for the optimal sentinel)
    pub fn lines(&self) -> &[AdviceLine] {
        match self {
            FertilizerAdvice::Optimal => &[],
            FertilizerAdvice::Adjust(lines) => lines,
        }
    }

    pub fn contains(&self, nutrient: Nutrient, level: NutrientLevel) -> bool {
        self.lines()
            .iter()
            .any(|l| l.nutrient == nutrient && l.level == level)
    }

    /// Display strings, one per line. Never empty.
    pub fn messages(&self) -> Vec<String> {
        match self {
            FertilizerAdvice::Optimal => vec![format!("{} {}", OPTIMAL_ICON, OPTIMAL_MESSAGE)],
            FertilizerAdvice::Adjust(lines) => lines.iter().map(AdviceLine::display).collect(),
        }
    }

    /// Newline-separated text for display
    pub fn to_text(&self) -> String {
        self.messages().join("\n")
    }

    /// Single-sentence text for speech, icons stripped
    pub fn to_speech(&self) -> String {
        match self {
            FertilizerAdvice::Optimal => OPTIMAL_MESSAGE.to_string(),
            FertilizerAdvice::Adjust(lines) => lines
                .iter()
                .map(|l| l.message)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn evaluate(rule: &NutrientRule, value: f64) -> Option<AdviceLine> {
    if value < rule.low_below {
        Some(AdviceLine {
            nutrient: rule.nutrient,
            level: NutrientLevel::Low,
            icon: LOW_ICON,
            message: rule.low_advice,
        })
    } else if value > rule.high_above {
        Some(AdviceLine {
            nutrient: rule.nutrient,
            level: NutrientLevel::High,
            icon: HIGH_ICON,
            message: rule.high_advice,
        })
    } else {
        None
    }
}

/// Recommend fertilizer adjustments for the given N, P, K readings.
///
/// Lines are ordered nitrogen → phosphorus → potassium.
pub fn advise(n: f64, p: f64, k: f64) -> FertilizerAdvice {
    let lines: Vec<AdviceLine> = FERTILIZER_RULES
        .iter()
        .zip([n, p, k])
        .filter_map(|(rule, value)| evaluate(rule, value))
        .collect();

    if lines.is_empty() {
        FertilizerAdvice::Optimal
    } else {
        FertilizerAdvice::Adjust(lines)
    }
}
