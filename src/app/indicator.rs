use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    progress,
    schedule::{kv::SettingsStore, store::ScheduleStore, Schedule},
    surface::{StatusSurface, SurfaceEvent},
    utils::clock::Clock,
};

/// Display granularity is minutes, so a minute cadence with late firing
/// tolerated is plenty. Out-of-band changes redraw immediately regardless.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Top-level module of the app: owns the status surface and the schedule
/// store, redraws on a fixed cadence and on every configuration change, and
/// applies settings edits coming back from the surface.
///
/// Construction does no OS work; [run](Self::run) installs the status item
/// once the runtime is up and releases it on the way out.
pub struct IndicatorModule<S> {
    surface: Box<dyn StatusSurface>,
    store: ScheduleStore<S>,
    schedule_changes: watch::Receiver<Schedule>,
    surface_events: mpsc::Receiver<SurfaceEvent>,
    shutdown: CancellationToken,
    clock: Box<dyn Clock>,
    refresh_interval: Duration,
}

impl<S: SettingsStore> IndicatorModule<S> {
    pub fn new(
        surface: Box<dyn StatusSurface>,
        store: ScheduleStore<S>,
        surface_events: mpsc::Receiver<SurfaceEvent>,
        shutdown: CancellationToken,
        clock: Box<dyn Clock>,
        refresh_interval: Duration,
    ) -> Self {
        let schedule_changes = store.subscribe();
        Self {
            surface,
            store,
            schedule_changes,
            surface_events,
            shutdown,
            clock,
            refresh_interval,
        }
    }

    fn redraw(&mut self) {
        let snapshot = progress::snapshot(self.clock.now().time(), &self.store.get());
        debug!("Redrawing {:?}", snapshot);
        if let Err(e) = self.surface.render(&snapshot) {
            error!("Encountered an error during redraw {:?}", e);
        }
    }

    fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::SettingsRequested => {
                let current = self.store.get();
                match self.surface.open_settings(&current) {
                    // set persists and publishes; the watch arm below picks
                    // the change up and redraws
                    Ok(Some(update)) => {
                        if let Err(e) = self.store.set(update) {
                            error!("Could not save the schedule {:?}", e);
                        }
                    }
                    Ok(None) => debug!("Settings edit discarded"),
                    Err(e) => error!("Could not open the settings editor {:?}", e),
                }
            }
            SurfaceEvent::QuitRequested => {
                info!("Quit requested from the menu");
                self.shutdown.cancel();
            }
        }
    }

    /// Executes the refresh loop until cancellation.
    pub async fn run(mut self) -> Result<()> {
        self.surface.install()?;
        self.redraw();

        let mut tick_point = self.clock.instant() + self.refresh_interval;
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    self.surface.dispose();
                    return Ok(());
                }
                _ = self.clock.sleep_until(tick_point) => {
                    tick_point += self.refresh_interval;
                    self.redraw();
                }
                Ok(()) = self.schedule_changes.changed() => {
                    self.redraw();
                }
                Some(event) = self.surface_events.recv() => {
                    self.handle_event(event);
                }
            }
        }
    }
}
