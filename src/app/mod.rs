//! Wires the schedule store, the status surface and the refresh loop
//! together: build everything up front, then join on the modules until
//! shutdown.

pub mod args;
pub mod indicator;
pub mod shutdown;

use std::path::PathBuf;

use anyhow::Result;
use indicator::{IndicatorModule, REFRESH_INTERVAL};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    schedule::{kv::JsonSettingsStore, store::ScheduleStore},
    surface::{console::ConsoleSurface, GenericStatusSurface, StatusSurface, SurfaceEvent},
    utils::clock::SystemClock,
};

const SETTINGS_FILE: &str = "settings.json";
const SURFACE_EVENT_BUFFER: usize = 8;

/// Represents the starting point for the app. `console` swaps the status bar
/// for the terminal backend.
pub async fn start_app(dir: PathBuf, console: bool) -> Result<()> {
    let (events_tx, events_rx) = mpsc::channel::<SurfaceEvent>(SURFACE_EVENT_BUFFER);
    let surface: Box<dyn StatusSurface> = if console {
        Box::new(ConsoleSurface::new())
    } else {
        Box::new(GenericStatusSurface::new(events_tx)?)
    };

    let shutdown_token = CancellationToken::new();
    let module = create_indicator(dir, surface, events_rx, &shutdown_token)?;

    let (_, run_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        module.run(),
    );

    if let Err(e) = &run_result {
        error!("Indicator module got an error {:?}", e);
    }
    run_result
}

fn create_indicator(
    dir: PathBuf,
    surface: Box<dyn StatusSurface>,
    surface_events: mpsc::Receiver<SurfaceEvent>,
    shutdown_token: &CancellationToken,
) -> Result<IndicatorModule<JsonSettingsStore>> {
    let settings = JsonSettingsStore::open(dir.join(SETTINGS_FILE))?;
    let store = ScheduleStore::load(settings, Box::new(SystemClock));
    Ok(IndicatorModule::new(
        surface,
        store,
        surface_events,
        shutdown_token.clone(),
        Box::new(SystemClock),
        REFRESH_INTERVAL,
    ))
}
