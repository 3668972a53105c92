//! FitLap - Workout File Analysis Engine
//!
//! Normalizes two workout-capture formats - binary FIT device exports and
//! swim-goggle CSV exports - into a single session/lap/record model with
//! derived metrics (pace, SWOLF, Normalized Power, HR route coloring) and
//! an optional markdown report. Processing is single-pass, in-memory and
//! stateless: each call returns one [`model::WorkoutAnalysis`] and retains
//! nothing.

pub mod analyzer;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod report;

// Re-export commonly used types
pub use analyzer::{AnalysisObserver, AnalyzerOptions, NullObserver, TracingObserver, WorkoutAnalyzer};
pub use ingest::{detect_format, FileFormat, FitMessage, ParseError};
pub use model::{RecordPoint, Sport, WorkoutAnalysis, WorkoutLap, WorkoutSession};
