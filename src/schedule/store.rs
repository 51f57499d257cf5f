use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Timelike};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::utils::clock::Clock;

use super::{
    default_afternoon, default_morning, default_work, kv::SettingsStore, Period, Schedule,
    ScheduleUpdate,
};

pub const MORNING_START_KEY: &str = "morningStartTime";
pub const MORNING_END_KEY: &str = "morningEndTime";
pub const AFTERNOON_START_KEY: &str = "afternoonStartTime";
pub const AFTERNOON_END_KEY: &str = "afternoonEndTime";
pub const WORK_START_KEY: &str = "workStartTime";
pub const WORK_END_KEY: &str = "workEndTime";

/// Owns the in-memory schedule and keeps the persisted store and the
/// indicator in line with it. Mutation goes through [set](Self::set) only:
/// one explicit step that validates nothing away, persists every boundary and
/// publishes the change for an immediate redraw.
pub struct ScheduleStore<S> {
    store: S,
    clock: Box<dyn Clock>,
    changes: watch::Sender<Schedule>,
}

impl<S: SettingsStore> ScheduleStore<S> {
    /// Starts from the hardcoded defaults and overlays whatever boundaries
    /// the store can produce. Absent or unreadable keys keep their default,
    /// which is the expected path on first run.
    pub fn load(store: S, clock: Box<dyn Clock>) -> Self {
        let schedule = read_schedule(&store);
        debug!("Loaded schedule {:?}", schedule);
        let (changes, _) = watch::channel(schedule);
        Self {
            store,
            clock,
            changes,
        }
    }

    pub fn get(&self) -> Schedule {
        *self.changes.borrow()
    }

    /// Receiver that wakes whenever [set](Self::set) commits a change.
    pub fn subscribe(&self) -> watch::Receiver<Schedule> {
        self.changes.subscribe()
    }

    pub fn set(&mut self, update: ScheduleUpdate) -> Result<()> {
        let next = self.get().apply(update);
        self.persist(next)?;
        self.changes.send_replace(next);
        Ok(())
    }

    /// Writes the boundaries of `schedule`'s shape and clears the other
    /// shape's keys, so a reload resolves to the same shape.
    fn persist(&mut self, schedule: Schedule) -> Result<()> {
        let today = self.clock.now().date_naive();
        match schedule {
            Schedule::Single { work } => {
                self.store
                    .put(WORK_START_KEY, boundary_epoch(today, work.start))?;
                self.store
                    .put(WORK_END_KEY, boundary_epoch(today, work.end))?;
                for key in [
                    MORNING_START_KEY,
                    MORNING_END_KEY,
                    AFTERNOON_START_KEY,
                    AFTERNOON_END_KEY,
                ] {
                    self.store.remove(key)?;
                }
            }
            Schedule::Split { morning, afternoon } => {
                self.store
                    .put(MORNING_START_KEY, boundary_epoch(today, morning.start))?;
                self.store
                    .put(MORNING_END_KEY, boundary_epoch(today, morning.end))?;
                self.store
                    .put(AFTERNOON_START_KEY, boundary_epoch(today, afternoon.start))?;
                self.store
                    .put(AFTERNOON_END_KEY, boundary_epoch(today, afternoon.end))?;
                for key in [WORK_START_KEY, WORK_END_KEY] {
                    self.store.remove(key)?;
                }
            }
        }
        Ok(())
    }
}

/// Persisted boundary values are full timestamps, today's date at the
/// boundary time in the local zone. Only the hour and minute are meaningful
/// on the way back in; the format is kept for compatibility with settings
/// written by the original builds.
fn boundary_epoch(date: NaiveDate, t: NaiveTime) -> i64 {
    let naive = date.and_time(t);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        // a boundary inside a DST gap has no local reading
        .unwrap_or_else(|| naive.and_utc().timestamp())
}

fn boundary_time(store: &impl SettingsStore, key: &str, default: NaiveTime) -> NaiveTime {
    let secs = match store.get(key) {
        Ok(Some(secs)) => secs,
        Ok(None) => return default,
        Err(e) => {
            debug!("Could not read {key}, keeping the default: {e:?}");
            return default;
        }
    };
    let Some(moment) = DateTime::from_timestamp(secs, 0) else {
        warn!("Persisted boundary {key} is out of range: {secs}");
        return default;
    };
    let local = moment.with_timezone(&Local);
    NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(default)
}

fn read_schedule(store: &impl SettingsStore) -> Schedule {
    let present = |key: &str| matches!(store.get(key), Ok(Some(_)));

    if [
        MORNING_START_KEY,
        MORNING_END_KEY,
        AFTERNOON_START_KEY,
        AFTERNOON_END_KEY,
    ]
    .iter()
    .any(|key| present(key))
    {
        Schedule::Split {
            morning: Period::new(
                boundary_time(store, MORNING_START_KEY, default_morning().start),
                boundary_time(store, MORNING_END_KEY, default_morning().end),
            ),
            afternoon: Period::new(
                boundary_time(store, AFTERNOON_START_KEY, default_afternoon().start),
                boundary_time(store, AFTERNOON_END_KEY, default_afternoon().end),
            ),
        }
    } else if present(WORK_START_KEY) || present(WORK_END_KEY) {
        Schedule::Single {
            work: Period::new(
                boundary_time(store, WORK_START_KEY, default_work().start),
                boundary_time(store, WORK_END_KEY, default_work().end),
            ),
        }
    } else {
        Schedule::default()
    }
}
