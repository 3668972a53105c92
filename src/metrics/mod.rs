//! Derived metrics: pure, stateless transforms over the normalized model.
//!
//! Everything here is reusable by the report composer and by external
//! callers; nothing touches parse state.

pub mod format;
pub mod np;
pub mod route;
pub mod target;

pub use np::normalized_power;
pub use target::{PlannedTarget, TargetStatus};
