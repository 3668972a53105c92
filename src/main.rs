//! FitLap - Workout File Analysis Engine
//!
//! Command-line entry point: analyze one workout file and print the
//! markdown report.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fitlap::{detect_format, FileFormat, WorkoutAnalyzer};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("FitLap v{}", env!("CARGO_PKG_VERSION"));

    let path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: fitlap <workout.fit | swim.csv>")?;

    let Some(format) = detect_format(&path) else {
        bail!("unsupported file extension (expected .fit or .csv)");
    };

    let analyzer = WorkoutAnalyzer::new();
    let analysis = match format {
        FileFormat::Fit => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            analyzer.analyze_fit_bytes(&bytes)?
        }
        FileFormat::FormCsv => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            analyzer.analyze_form_csv(&text)?
        }
    };

    tracing::info!(
        sport = %analysis.session.sport,
        laps = analysis.laps.len(),
        records = analysis.records.len(),
        gps = analysis.has_gps_data(),
        "analysis complete"
    );

    match &analysis.report {
        Some(report) => println!("{}", report),
        None => println!("{}", serde_json::to_string_pretty(&analysis)?),
    }

    Ok(())
}
