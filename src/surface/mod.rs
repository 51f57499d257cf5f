//! The status-bar surface the indicator draws on. [StatusSurface] is the
//! contract every backend implements; [GenericStatusSurface] selects the
//! compiled-in backend.

pub mod console;
pub mod glyph;
#[cfg(feature = "macos")]
pub mod macos;
pub mod settings_text;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::{
    progress::ProgressSnapshot,
    schedule::{Schedule, ScheduleUpdate},
};

/// Emitted by a backend when the user interacts with the dropdown menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    SettingsRequested,
    QuitRequested,
}

/// Contract between the indicator module and whatever actually draws. At most
/// one status item and one settings panel exist per surface; both are created
/// lazily and replaced rather than accumulated on redraw.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSurface {
    /// Creates the status item and its menu. Called once by the indicator
    /// module after the runtime is up, never at construction time.
    fn install(&mut self) -> Result<()>;

    /// Redraws the glyph and the dropdown detail block for `snapshot`.
    fn render(&mut self, snapshot: &ProgressSnapshot) -> Result<()>;

    /// Presents the boundary editor pre-filled from `current`. Returns the
    /// edited boundaries on save, `None` on cancel.
    fn open_settings(&mut self, current: &Schedule) -> Result<Option<ScheduleUpdate>>;

    /// Releases the status item. Safe to call more than once.
    fn dispose(&mut self);
}

/// Cross-backend [StatusSurface]. The menu bar backend is feature-gated the
/// way OS backends usually are; the console backend is picked explicitly with
/// `--console` and never lands here.
pub struct GenericStatusSurface {
    inner: Box<dyn StatusSurface>,
}

impl GenericStatusSurface {
    #[cfg_attr(not(feature = "macos"), allow(unused_variables))]
    pub fn new(events: mpsc::Sender<SurfaceEvent>) -> Result<Self> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "macos")] {
                Ok(Self {
                    inner: Box::new(macos::MacosSurface::new(events)?),
                })
            }
            else {
                // This runtime error keeps the crate compiling for testing on
                // hosts without a status bar backend.
                unimplemented!("No status bar backend was enabled")
            }
        }
    }
}

impl StatusSurface for GenericStatusSurface {
    fn install(&mut self) -> Result<()> {
        self.inner.install()
    }

    fn render(&mut self, snapshot: &ProgressSnapshot) -> Result<()> {
        self.inner.render(snapshot)
    }

    fn open_settings(&mut self, current: &Schedule) -> Result<Option<ScheduleUpdate>> {
        self.inner.open_settings(current)
    }

    fn dispose(&mut self) {
        self.inner.dispose()
    }
}
