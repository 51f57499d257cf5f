//! Workday period configuration: the boundary types, the two schedule shapes
//! the app has shipped with, and the persisted store that owns them.

pub mod kv;
pub mod store;

use chrono::NaiveTime;

/// A configured time-of-day interval, hour+minute resolution, same-day only.
///
/// Nothing enforces `start <= end`; a backwards or zero-length period simply
/// contains no minute and progress degrades to the before/after rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Period {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Convenience constructor for defaults and tests.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start: hm(start.0, start.1),
            end: hm(end.0, end.1),
        }
    }

    /// Half-open containment on minute-of-day offsets: `start <= now < end`.
    pub fn contains(&self, now: NaiveTime) -> bool {
        minute_of_day(self.start) <= minute_of_day(now)
            && minute_of_day(now) < minute_of_day(self.end)
    }
}

/// Minute-of-day offset of a wall-clock time. Seconds are below display
/// granularity and are dropped.
pub fn minute_of_day(t: NaiveTime) -> u32 {
    use chrono::Timelike;
    t.hour() * 60 + t.minute()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .expect("boundary times are constructed from valid hour/minute pairs")
}

pub fn default_morning() -> Period {
    Period::from_hm((9, 0), (12, 0))
}

pub fn default_afternoon() -> Period {
    Period::from_hm((13, 0), (18, 0))
}

pub fn default_work() -> Period {
    Period::from_hm((9, 0), (18, 0))
}

/// The two configuration shapes. `Split` is the current one; `Single` is
/// still read from settings written by older builds and can be selected by
/// entering one range in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Single { work: Period },
    Split { morning: Period, afternoon: Period },
}

impl Default for Schedule {
    fn default() -> Self {
        Self::Split {
            morning: default_morning(),
            afternoon: default_afternoon(),
        }
    }
}

impl Schedule {
    pub fn single_default() -> Self {
        Self::Single {
            work: default_work(),
        }
    }

    /// Applies a partial update. Boundaries of the current shape are kept
    /// where the update leaves them `None`; an update carrying only the other
    /// shape's boundaries switches shape, falling back to defaults for
    /// whatever it doesn't name.
    pub fn apply(self, u: ScheduleUpdate) -> Schedule {
        let wants_split = u.morning_start.is_some()
            || u.morning_end.is_some()
            || u.afternoon_start.is_some()
            || u.afternoon_end.is_some();
        let wants_single = u.work_start.is_some() || u.work_end.is_some();

        match self {
            Schedule::Split { morning, afternoon } if !wants_single => Schedule::Split {
                morning: Period::new(
                    u.morning_start.unwrap_or(morning.start),
                    u.morning_end.unwrap_or(morning.end),
                ),
                afternoon: Period::new(
                    u.afternoon_start.unwrap_or(afternoon.start),
                    u.afternoon_end.unwrap_or(afternoon.end),
                ),
            },
            Schedule::Split { morning, afternoon } => Schedule::Single {
                // collapsing the split shape keeps the day's outer bounds
                work: Period::new(
                    u.work_start.unwrap_or(morning.start),
                    u.work_end.unwrap_or(afternoon.end),
                ),
            },
            Schedule::Single { work } if !wants_split => Schedule::Single {
                work: Period::new(
                    u.work_start.unwrap_or(work.start),
                    u.work_end.unwrap_or(work.end),
                ),
            },
            Schedule::Single { .. } => Schedule::Split {
                morning: Period::new(
                    u.morning_start.unwrap_or(default_morning().start),
                    u.morning_end.unwrap_or(default_morning().end),
                ),
                afternoon: Period::new(
                    u.afternoon_start.unwrap_or(default_afternoon().start),
                    u.afternoon_end.unwrap_or(default_afternoon().end),
                ),
            },
        }
    }
}

/// Partial boundary update as committed by the settings surface. `None`
/// leaves a boundary untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleUpdate {
    pub morning_start: Option<NaiveTime>,
    pub morning_end: Option<NaiveTime>,
    pub afternoon_start: Option<NaiveTime>,
    pub afternoon_end: Option<NaiveTime>,
    pub work_start: Option<NaiveTime>,
    pub work_end: Option<NaiveTime>,
}

impl ScheduleUpdate {
    /// Update that replaces every boundary of `schedule`'s shape.
    pub fn replacing(schedule: &Schedule) -> Self {
        match schedule {
            Schedule::Single { work } => Self {
                work_start: Some(work.start),
                work_end: Some(work.end),
                ..Self::default()
            },
            Schedule::Split { morning, afternoon } => Self {
                morning_start: Some(morning.start),
                morning_end: Some(morning.end),
                afternoon_start: Some(afternoon.start),
                afternoon_end: Some(afternoon.end),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_containment_is_half_open() {
        let p = Period::from_hm((9, 0), (12, 0));
        assert!(!p.contains(hm(8, 59)));
        assert!(p.contains(hm(9, 0)));
        assert!(p.contains(hm(11, 59)));
        assert!(!p.contains(hm(12, 0)));
    }

    #[test]
    fn zero_length_period_contains_nothing() {
        let p = Period::from_hm((9, 0), (9, 0));
        assert!(!p.contains(hm(9, 0)));
        assert!(!p.contains(hm(8, 59)));
    }

    #[test]
    fn containment_ignores_seconds() {
        let p = Period::from_hm((9, 0), (12, 0));
        let just_before_noon = NaiveTime::from_hms_opt(11, 59, 59).unwrap();
        assert!(p.contains(just_before_noon));
    }

    #[test]
    fn apply_keeps_unnamed_boundaries() {
        let updated = Schedule::default().apply(ScheduleUpdate {
            morning_end: Some(hm(12, 30)),
            ..ScheduleUpdate::default()
        });
        assert_eq!(
            updated,
            Schedule::Split {
                morning: Period::from_hm((9, 0), (12, 30)),
                afternoon: default_afternoon(),
            }
        );
    }

    #[test]
    fn apply_collapses_split_into_single() {
        let updated = Schedule::default().apply(ScheduleUpdate {
            work_start: Some(hm(8, 0)),
            ..ScheduleUpdate::default()
        });
        // the unnamed end falls back to the old afternoon end
        assert_eq!(
            updated,
            Schedule::Single {
                work: Period::from_hm((8, 0), (18, 0)),
            }
        );
    }

    #[test]
    fn apply_splits_single_with_defaults_for_the_rest() {
        let updated = Schedule::single_default().apply(ScheduleUpdate {
            afternoon_end: Some(hm(17, 0)),
            ..ScheduleUpdate::default()
        });
        assert_eq!(
            updated,
            Schedule::Split {
                morning: default_morning(),
                afternoon: Period::from_hm((13, 0), (17, 0)),
            }
        );
    }

    #[test]
    fn replacing_round_trips_through_apply() {
        let schedule = Schedule::Split {
            morning: Period::from_hm((8, 30), (11, 45)),
            afternoon: Period::from_hm((12, 15), (17, 30)),
        };
        assert_eq!(
            Schedule::default().apply(ScheduleUpdate::replacing(&schedule)),
            schedule
        );
    }
}
