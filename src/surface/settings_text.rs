//! Text form of the boundary editor: `"HH:MM-HH:MM"` for a single work
//! period, or `"HH:MM-HH:MM, HH:MM-HH:MM"` for morning and afternoon. Kept
//! pure so the panel round-trip is testable without a window.

use anyhow::{anyhow, bail, Result};
use chrono::NaiveTime;

use crate::schedule::{Period, Schedule, ScheduleUpdate};

pub fn format_schedule(schedule: &Schedule) -> String {
    match schedule {
        Schedule::Single { work } => format_period(work),
        Schedule::Split { morning, afternoon } => {
            format!("{}, {}", format_period(morning), format_period(afternoon))
        }
    }
}

fn format_period(period: &Period) -> String {
    format!(
        "{}-{}",
        period.start.format("%H:%M"),
        period.end.format("%H:%M")
    )
}

/// Parses the edited text back into an update. One range selects the single
/// shape, two ranges the split shape; anything else is an error the caller
/// reports and drops.
pub fn parse_update(text: &str) -> Result<ScheduleUpdate> {
    let periods = text
        .split(',')
        .map(parse_period)
        .collect::<Result<Vec<_>>>()?;

    match periods.as_slice() {
        [work] => Ok(ScheduleUpdate {
            work_start: Some(work.start),
            work_end: Some(work.end),
            ..ScheduleUpdate::default()
        }),
        [morning, afternoon] => Ok(ScheduleUpdate {
            morning_start: Some(morning.start),
            morning_end: Some(morning.end),
            afternoon_start: Some(afternoon.start),
            afternoon_end: Some(afternoon.end),
            ..ScheduleUpdate::default()
        }),
        other => bail!("expected one or two time ranges, got {}", other.len()),
    }
}

fn parse_period(text: &str) -> Result<Period> {
    let (start, end) = text
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("expected HH:MM-HH:MM, got {text:?}"))?;
    Ok(Period::new(parse_time(start)?, parse_time(end)?))
}

fn parse_time(text: &str) -> Result<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M").map_err(|e| anyhow!("bad time {text:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use crate::schedule::{Period, Schedule};

    use super::{format_schedule, parse_update};

    #[test]
    fn split_schedule_round_trips() {
        let schedule = Schedule::Split {
            morning: Period::from_hm((8, 30), (11, 45)),
            afternoon: Period::from_hm((12, 15), (17, 30)),
        };
        let update = parse_update(&format_schedule(&schedule)).unwrap();
        assert_eq!(Schedule::default().apply(update), schedule);
    }

    #[test]
    fn single_schedule_round_trips() {
        let schedule = Schedule::Single {
            work: Period::from_hm((9, 0), (18, 0)),
        };
        let update = parse_update(&format_schedule(&schedule)).unwrap();
        assert_eq!(Schedule::default().apply(update), schedule);
    }

    #[test]
    fn whitespace_is_tolerated() {
        let update = parse_update("  09:00 - 12:00 ,13:00-18:00 ").unwrap();
        assert_eq!(
            Schedule::single_default().apply(update),
            Schedule::default()
        );
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(parse_update("").is_err());
        assert!(parse_update("nine to five").is_err());
        assert!(parse_update("09:00").is_err());
        assert!(parse_update("25:00-26:00").is_err());
        assert!(parse_update("09:00-12:00, 13:00-18:00, 19:00-20:00").is_err());
    }
}
