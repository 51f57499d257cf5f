//! Terminal stand-in for the status bar, picked with `--console`. Useful for
//! watching the indicator over ssh or when debugging the refresh loop.

use ansi_term::Colour;
use anyhow::Result;
use tracing::warn;

use crate::{
    progress::ProgressSnapshot,
    schedule::{Schedule, ScheduleUpdate},
};

use super::StatusSurface;

const BAR_WIDTH: usize = 24;

#[derive(Default)]
pub struct ConsoleSurface;

impl ConsoleSurface {
    pub fn new() -> Self {
        Self
    }
}

impl StatusSurface for ConsoleSurface {
    fn install(&mut self) -> Result<()> {
        Ok(())
    }

    fn render(&mut self, snapshot: &ProgressSnapshot) -> Result<()> {
        let filled = ((snapshot.fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        println!(
            "{} {:>3}%  {}",
            Colour::Blue.paint(bar),
            snapshot.percent(),
            snapshot.remaining_label
        );
        Ok(())
    }

    fn open_settings(&mut self, _current: &Schedule) -> Result<Option<ScheduleUpdate>> {
        warn!("The console backend has no settings editor");
        Ok(None)
    }

    fn dispose(&mut self) {}
}

#[cfg(test)]
mod tests {
    use crate::{progress, schedule::Schedule, surface::StatusSurface};

    use super::ConsoleSurface;

    #[test]
    fn renders_every_fraction_without_panicking() {
        let mut surface = ConsoleSurface::new();
        let schedule = Schedule::default();
        for minute in (0..(24 * 60)).step_by(7) {
            let now = chrono::NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap();
            surface
                .render(&progress::snapshot(now, &schedule))
                .unwrap();
        }
    }
}
