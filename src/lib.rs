//! Menu bar indicator of how much of the workday has elapsed. A ring in the
//! status bar fills as the configured periods pass, the dropdown shows the
//! percentage and the remaining time, and the period boundaries are edited
//! from a small settings panel.

pub mod app;
pub mod progress;
pub mod schedule;
pub mod surface;
pub mod utils;
