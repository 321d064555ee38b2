// Predict a crop for one reading from the command line
//
// Usage:
//   cargo run --bin predict_sample
//   cargo run --bin predict_sample -- <N> <P> <K> <temperature> <humidity> <ph> <rainfall>

use anyhow::{bail, Context, Result};
use crop_advisor_rust::advisory::{CropKnowledgeEntry, NO_DETAILS_MESSAGE};
use crop_advisor_rust::flow::{run_advisory, AdvisoryInput, WeatherStatus};
use crop_advisor_rust::model::{EnvironmentReading, NutrientReading, WeatherSample, FEATURE_NAMES};
use crop_advisor_rust::{AppConfig, ForestModel};

const SAMPLE_INPUT: [f64; 7] = [90.0, 42.0, 43.0, 20.5, 80.0, 6.5, 200.0];

fn parse_args() -> Result<[f64; 7]> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        return Ok(SAMPLE_INPUT);
    }
    if args.len() != FEATURE_NAMES.len() {
        bail!("expected 7 values ({}), got {}", FEATURE_NAMES.join(", "), args.len());
    }

    let mut values = [0.0; 7];
    for (slot, (raw, name)) in values.iter_mut().zip(args.iter().zip(FEATURE_NAMES)) {
        *slot = raw.parse().with_context(|| format!("invalid value for {}: '{}'", name, raw))?;
    }
    Ok(values)
}

/// "Crop Details" block, or the no-details notice
fn details_lines(details: Option<&CropKnowledgeEntry>) -> Vec<String> {
    match details {
        Some(d) => vec![
            "\n📘 Crop Details:".to_string(),
            format!("  Ideal Temperature: {}", d.temperature),
            format!("  Ideal pH: {}", d.ph),
            format!("  Ideal Rainfall: {}", d.rainfall),
            format!("  Tips: {}", d.tips),
            format!("  Harvest Time: {}", d.harvest_time),
        ],
        None => vec![format!("\nℹ️ {}", NO_DETAILS_MESSAGE)],
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_advisor_rust=info,warn".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let model = ForestModel::from_path(&config.model_path)
        .with_context(|| format!("loading {}", config.model_path.display()))?;

    let [n, p, k, temperature, humidity, ph, rainfall] = parse_args()?;
    let input = AdvisoryInput {
        nutrients: NutrientReading { nitrogen: n, phosphorus: p, potassium: k },
        weather: WeatherSample { temperature, humidity },
        environment: EnvironmentReading { ph, rainfall },
        weather_status: WeatherStatus::NotRequested,
    };

    let proba = model.predict_proba(&input.features())?;
    let report = run_advisory(&model, &input)?;

    println!("🌱 Recommended Crop: {}", report.display_name);

    let mut ranked: Vec<(&String, f64)> = model.classes().iter().zip(proba).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    println!("\nTop candidates:");
    for (label, p) in ranked.iter().take(3) {
        println!("  {:<12} {:.1}%", label, p * 100.0);
    }

    println!("\n🧪 Fertilizer Suggestion:\n{}", report.fertilizer.to_text());
    println!("\n💡 Crop Growing Tips:\n{}", report.tips);

    for line in details_lines(report.details) {
        println!("{}", line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crop_advisor_rust::advisory::details_for;

    #[test]
    fn test_details_include_tips() {
        let rice = details_for("rice").unwrap();
        let lines = details_lines(Some(rice));
        assert!(lines.contains(&format!("  Tips: {}", rice.tips)));
        assert!(lines.iter().any(|l| l.starts_with("  Harvest Time:")));
    }

    #[test]
    fn test_missing_details_notice() {
        let lines = details_lines(details_for("coffee"));
        assert_eq!(lines, vec!["\nℹ️ No detailed info available for this crop.".to_string()]);
    }
}
