//! Analysis engine: options, observability sink and the top-level entry
//! points.
//!
//! The engine holds configuration only; all parse state is per-invocation,
//! so one instance can serve concurrent callers through `&self`.

use chrono::{FixedOffset, Offset, Utc};

use crate::ingest::{decode, fit, form_csv, FitMessage, ParseError};
use crate::metrics::np;
use crate::model::WorkoutAnalysis;
use crate::report;

/// Observability sink injected into the engine.
///
/// Parsing never logs on its own; recoverable skips are reported through
/// this capability so hosts decide what to do with them. All methods have
/// empty defaults.
pub trait AnalysisObserver {
    /// A binary lap was dropped by the short-lap noise filter.
    fn lap_discarded(&self, _original_index: usize, _duration_seconds: f64) {}

    /// A CSV data row was dropped (fewer values than header columns).
    fn row_discarded(&self, _line_number: usize) {}

    /// No session message existed; the session was synthesized from laps.
    fn fallback_session(&self, _lap_count: usize) {}
}

/// Observer that forwards to the `tracing` ecosystem. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn lap_discarded(&self, original_index: usize, duration_seconds: f64) {
        tracing::debug!(
            lap = original_index,
            duration_seconds,
            "dropping sub-3s lap as GPS/pause artifact"
        );
    }

    fn row_discarded(&self, line_number: usize) {
        tracing::debug!(line = line_number, "dropping short CSV row");
    }

    fn fallback_session(&self, lap_count: usize) {
        tracing::warn!(laps = lap_count, "no session message; synthesizing from laps");
    }
}

/// Observer that swallows everything. Useful in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl AnalysisObserver for NullObserver {}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Fixed UTC offset (hours) applied when localizing device timestamps
    pub utc_offset_hours: i32,
    /// Whether to compose the markdown report into the result
    pub compose_report: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            utc_offset_hours: 0,
            compose_report: true,
        }
    }
}

impl AnalyzerOptions {
    /// The configured offset as a chrono type; out-of-range values fall
    /// back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

/// Normalizes workout captures into [`WorkoutAnalysis`] values.
pub struct WorkoutAnalyzer {
    /// Engine configuration
    options: AnalyzerOptions,
    /// Injected observability sink
    observer: Box<dyn AnalysisObserver + Send + Sync>,
}

impl Default for WorkoutAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutAnalyzer {
    /// Create an analyzer with default options and the tracing sink.
    pub fn new() -> Self {
        Self::with_options(AnalyzerOptions::default())
    }

    /// Create an analyzer with the given options and the tracing sink.
    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self {
            options,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replace the observability sink.
    pub fn with_observer(mut self, observer: Box<dyn AnalysisObserver + Send + Sync>) -> Self {
        self.observer = observer;
        self
    }

    /// The active configuration.
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze a decoded binary message stream.
    pub fn analyze_fit_messages(
        &self,
        messages: &[FitMessage],
    ) -> Result<WorkoutAnalysis, ParseError> {
        let (mut session, laps, records) =
            fit::assemble(messages, self.options.offset(), self.observer.as_ref())?;

        // Device NP wins; otherwise derive it from the power track
        if session.normalized_power.is_none() {
            session.normalized_power = np::normalized_power(&records);
        }

        Ok(self.finish(WorkoutAnalysis::new(session, laps, records)))
    }

    /// Decode a raw FIT byte buffer and analyze it.
    pub fn analyze_fit_bytes(&self, bytes: &[u8]) -> Result<WorkoutAnalysis, ParseError> {
        let messages = decode::decode_fit_bytes(bytes)?;
        self.analyze_fit_messages(&messages)
    }

    /// Analyze a swim CSV export.
    pub fn analyze_form_csv(&self, text: &str) -> Result<WorkoutAnalysis, ParseError> {
        let (session, laps) =
            form_csv::parse(text, self.options.offset(), self.observer.as_ref())?;

        Ok(self.finish(WorkoutAnalysis::new(session, laps, Vec::new())))
    }

    fn finish(&self, mut analysis: WorkoutAnalysis) -> WorkoutAnalysis {
        if self.options.compose_report {
            analysis.report = Some(report::compose_report(&analysis.session, &analysis.laps));
        }
        analysis
    }
}
