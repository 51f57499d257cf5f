//! Progress math: pure functions from the current wall-clock time and the
//! configured schedule to everything the indicator displays. No state, no
//! failure modes; malformed schedules degrade to the clamped before/after
//! rules.

use chrono::NaiveTime;

use crate::schedule::{minute_of_day, Period, Schedule};

/// Which part of the day a snapshot describes. `Day` covers both the single
/// work period and the afternoon half of the split shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    NotStarted,
    Morning,
    Day,
    Ended,
}

/// One redraw's worth of display data. Recomputed on every tick and on every
/// configuration change, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub fraction: f64,
    pub remaining_label: String,
    pub period: PeriodKind,
}

impl ProgressSnapshot {
    /// Integer percentage as shown in the dropdown detail block.
    pub fn percent(&self) -> u32 {
        (self.fraction * 100.0).floor() as u32
    }
}

enum Location {
    BeforeWork,
    Within { period: Period, kind: PeriodKind },
    AfterWork,
}

/// Periods are checked in a fixed order, morning before afternoon. Anything
/// past the last containing minute reads as after work, which makes the gap
/// between morning and afternoon report a finished day. That quirk is kept
/// deliberately; see DESIGN.md.
fn locate(now: NaiveTime, schedule: &Schedule) -> Location {
    match schedule {
        Schedule::Single { work } => {
            if work.contains(now) {
                Location::Within {
                    period: *work,
                    kind: PeriodKind::Day,
                }
            } else if minute_of_day(now) < minute_of_day(work.start) {
                Location::BeforeWork
            } else {
                Location::AfterWork
            }
        }
        Schedule::Split { morning, afternoon } => {
            if morning.contains(now) {
                Location::Within {
                    period: *morning,
                    kind: PeriodKind::Morning,
                }
            } else if afternoon.contains(now) {
                Location::Within {
                    period: *afternoon,
                    kind: PeriodKind::Day,
                }
            } else if minute_of_day(now) < minute_of_day(morning.start) {
                Location::BeforeWork
            } else {
                Location::AfterWork
            }
        }
    }
}

/// Elapsed fraction of the active period, clamped to [0, 1]. Before the first
/// period it is 0, in the midday gap and after the last period it is 1.
///
/// A zero-length (or backwards) period contains no minute at all, so its
/// boundary reads as 0 before and 1 from the boundary minute onward and no
/// division is ever evaluated against its length.
pub fn fraction(now: NaiveTime, schedule: &Schedule) -> f64 {
    match locate(now, schedule) {
        Location::BeforeWork => 0.0,
        Location::AfterWork => 1.0,
        Location::Within { period, .. } => {
            // containment is non-empty here, so the length is >= 1 minute
            let length = (minute_of_day(period.end) - minute_of_day(period.start)) as f64;
            let elapsed = (minute_of_day(now) - minute_of_day(period.start)) as f64;
            (elapsed / length).clamp(0.0, 1.0)
        }
    }
}

/// Human-readable remaining time, e.g. `"1 hrs 30 min until end of morning"`.
pub fn remaining_label(now: NaiveTime, schedule: &Schedule) -> String {
    match locate(now, schedule) {
        Location::BeforeWork => "Work hasn't started".to_string(),
        Location::AfterWork => "Work day ended".to_string(),
        Location::Within { period, kind } => within_label(now, period, kind),
    }
}

fn within_label(now: NaiveTime, period: Period, kind: PeriodKind) -> String {
    let remaining = minute_of_day(period.end) - minute_of_day(now);
    let name = match kind {
        PeriodKind::Morning => "morning",
        _ => "day",
    };
    format!("{} hrs {} min until end of {name}", remaining / 60, remaining % 60)
}

pub fn snapshot(now: NaiveTime, schedule: &Schedule) -> ProgressSnapshot {
    match locate(now, schedule) {
        Location::BeforeWork => ProgressSnapshot {
            fraction: 0.0,
            remaining_label: "Work hasn't started".to_string(),
            period: PeriodKind::NotStarted,
        },
        Location::AfterWork => ProgressSnapshot {
            fraction: 1.0,
            remaining_label: "Work day ended".to_string(),
            period: PeriodKind::Ended,
        },
        Location::Within { period, kind } => ProgressSnapshot {
            fraction: fraction(now, schedule),
            remaining_label: within_label(now, period, kind),
            period: kind,
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use crate::schedule::{Period, Schedule};

    use super::{fraction, remaining_label, snapshot, PeriodKind};

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn split() -> Schedule {
        Schedule::Split {
            morning: Period::from_hm((9, 0), (12, 0)),
            afternoon: Period::from_hm((13, 0), (18, 0)),
        }
    }

    fn single() -> Schedule {
        Schedule::Single {
            work: Period::from_hm((8, 0), (17, 0)),
        }
    }

    #[test]
    fn halfway_through_the_morning() {
        let s = snapshot(t(10, 30), &split());
        assert_eq!(s.fraction, 0.5);
        assert_eq!(s.remaining_label, "1 hrs 30 min until end of morning");
        assert_eq!(s.period, PeriodKind::Morning);
        assert_eq!(s.percent(), 50);
    }

    #[test]
    fn afternoon_is_named_day() {
        let s = snapshot(t(16, 45), &split());
        assert_eq!(s.remaining_label, "1 hrs 15 min until end of day");
        assert_eq!(s.period, PeriodKind::Day);
    }

    #[test]
    fn split_gap_reads_as_ended() {
        // Inherited behavior: the lunch gap reports a finished day instead of
        // a distinct break state.
        let s = snapshot(t(12, 30), &split());
        assert_eq!(s.fraction, 1.0);
        assert_eq!(s.remaining_label, "Work day ended");
        assert_eq!(s.period, PeriodKind::Ended);
    }

    #[test]
    fn before_work_single() {
        let s = snapshot(t(7, 0), &single());
        assert_eq!(s.fraction, 0.0);
        assert_eq!(s.remaining_label, "Work hasn't started");
        assert_eq!(s.period, PeriodKind::NotStarted);
    }

    #[test]
    fn after_work_single() {
        let s = snapshot(t(18, 0), &single());
        assert_eq!(s.fraction, 1.0);
        assert_eq!(s.remaining_label, "Work day ended");
        assert_eq!(s.period, PeriodKind::Ended);
    }

    #[test]
    fn fraction_hits_both_ends_exactly() {
        assert_eq!(fraction(t(8, 0), &single()), 0.0);
        assert_eq!(fraction(t(17, 0), &single()), 1.0);
    }

    #[test]
    fn fraction_stays_bounded_all_day() {
        let schedule = split();
        for minute in 0..(24 * 60) {
            let f = fraction(t(minute / 60, minute % 60), &schedule);
            assert!((0.0..=1.0).contains(&f), "out of bounds at minute {minute}");
        }
    }

    #[test]
    fn fraction_is_monotone_within_each_period() {
        let schedule = split();
        for (from, to) in [(9 * 60, 12 * 60), (13 * 60, 18 * 60)] {
            let mut previous = -1.0;
            for minute in from..=to {
                let f = fraction(t(minute / 60, minute % 60), &schedule);
                assert!(f >= previous, "regressed at minute {minute}");
                previous = f;
            }
        }
    }

    #[test]
    fn snapshot_is_pure() {
        assert_eq!(snapshot(t(10, 30), &split()), snapshot(t(10, 30), &split()));
    }

    #[test]
    fn zero_length_period_never_divides() {
        let degenerate = Schedule::Single {
            work: Period::from_hm((9, 0), (9, 0)),
        };
        // defined as: not started before the boundary, ended from it onward
        assert_eq!(fraction(t(8, 59), &degenerate), 0.0);
        assert_eq!(fraction(t(9, 0), &degenerate), 1.0);
        assert_eq!(remaining_label(t(9, 0), &degenerate), "Work day ended");
    }

    #[test]
    fn backwards_period_clamps_the_same_way() {
        let degenerate = Schedule::Single {
            work: Period::from_hm((17, 0), (8, 0)),
        };
        assert_eq!(fraction(t(12, 0), &degenerate), 0.0);
        assert_eq!(fraction(t(17, 0), &degenerate), 1.0);
    }

    #[test]
    fn zero_length_morning_does_not_mask_the_afternoon() {
        let schedule = Schedule::Split {
            morning: Period::from_hm((9, 0), (9, 0)),
            afternoon: Period::from_hm((13, 0), (18, 0)),
        };
        assert_eq!(fraction(t(13, 0), &schedule), 0.0);
        assert_eq!(
            remaining_label(t(15, 30), &schedule),
            "2 hrs 30 min until end of day"
        );
    }

    #[test]
    fn percent_floors() {
        // 59/540 of the single day elapsed, just under 11%
        let s = snapshot(t(8, 59), &single());
        assert_eq!(s.percent(), 10);
    }
}
