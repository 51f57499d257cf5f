use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::time::Instant;

/// Provides dates across the application. The refresh loop and the settings
/// persistence both read time through this, which allows tests to drive them
/// with a fixed clock.
///
/// Wall-clock time is local on purpose: period boundaries are times of day
/// on the user's calendar.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    fn now(&self) -> DateTime<Local>;

    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: Instant);
}

pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}

/// Clock with a fixed wall-clock reading. Sleeps still go through the tokio
/// timer so paused-time tests control them.
#[cfg(test)]
pub struct FrozenClock(pub DateTime<Local>);

#[cfg(test)]
#[async_trait]
impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}
