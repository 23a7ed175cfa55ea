use chrono::{DateTime, TimeDelta, TimeZone, Timelike};

use crate::prelude::*;

/// Ticks in a full day of one-minute sampling.
pub const TICKS_PER_DAY: u32 = 1440;

/// Tick counters of the open day.
///
/// This only counts: the caller owns the timer, calls [`DaySchedule::advance`]
/// once per firing, and dispatches on the returned duties, which keeps the
/// rollover logic testable without a clock.
#[must_use]
pub struct DaySchedule {
    tick_count: u32,
    ticks_until_day_close: u32,
}

/// What the current tick must do besides sampling.
#[must_use]
pub struct TickDuties {
    pub open_day: bool,
    pub close_day: bool,
}

impl DaySchedule {
    pub const fn new(ticks_until_day_close: u32) -> Self {
        Self { tick_count: 0, ticks_until_day_close }
    }

    /// Account for one timer firing.
    ///
    /// The day closes when the tick counter *reaches* the budget: `>=` rather
    /// than `==`, so a tick lost to a clock jump or a system sleep cannot
    /// leave the day open indefinitely.
    pub fn advance(&mut self) -> TickDuties {
        let open_day = self.tick_count == 0;
        let close_day = self.tick_count >= self.ticks_until_day_close;
        if close_day {
            self.tick_count = 0;
            self.ticks_until_day_close = TICKS_PER_DAY;
        }
        self.tick_count += 1;
        TickDuties { open_day, close_day }
    }

    #[cfg(test)]
    const fn with_tick_count(mut self, tick_count: u32) -> Self {
        self.tick_count = tick_count;
        self
    }
}

/// First tick instant and day-close budget for a recorder starting at `now`.
#[must_use]
pub struct Alignment<Tz: TimeZone> {
    pub first_tick_at: DateTime<Tz>,
    pub ticks_until_day_close: u32,
}

/// Align the timer to the next wall-clock minute.
///
/// The first tick fires at second `1` of the next minute, and the day closes
/// at the first tick past local midnight. Starting within the last minute of
/// the day yields a zero budget: day-open and day-close then share the very
/// first tick.
pub fn align<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<Alignment<Tz>> {
    let first_tick_at = (now.clone() + TimeDelta::minutes(1))
        .with_second(1)
        .and_then(|tick| tick.with_nanosecond(0))
        .context("failed to compute the next minute boundary")?;
    let midnight = (now.clone() + TimeDelta::days(1))
        .with_hour(0)
        .and_then(|midnight| midnight.with_minute(0))
        .and_then(|midnight| midnight.with_second(0))
        .and_then(|midnight| midnight.with_nanosecond(0))
        .context("failed to compute the next midnight")?;
    let seconds_until_midnight = (midnight - first_tick_at.clone()).num_seconds().max(0);
    let ticks_until_day_close =
        u32::try_from(seconds_until_midnight / 60).context("the tick budget is out of range")?;
    Ok(Alignment { first_tick_at, ticks_until_day_close })
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn the_first_tick_opens_the_day() {
        let mut schedule = DaySchedule::new(3);
        let duties = schedule.advance();
        assert!(duties.open_day);
        assert!(!duties.close_day);
    }

    #[test]
    fn the_day_closes_exactly_once_at_the_budget() {
        let mut schedule = DaySchedule::new(3);
        let close_flags: Vec<bool> = (0..6).map(|_| schedule.advance().close_day).collect();
        assert_eq!(close_flags, [false, false, false, true, false, false]);
    }

    #[test]
    fn the_budget_resets_to_a_full_day_after_close() {
        let mut schedule = DaySchedule::new(1);
        let _ = schedule.advance();
        assert!(schedule.advance().close_day);

        let close_flags: Vec<bool> =
            (0..TICKS_PER_DAY).map(|_| schedule.advance().close_day).collect();
        assert_eq!(close_flags.iter().filter(|close| **close).count(), 1);
        assert!(close_flags[TICKS_PER_DAY as usize - 1]);
    }

    #[test]
    fn day_open_and_close_share_the_first_tick_on_a_zero_budget() {
        let mut schedule = DaySchedule::new(0);
        let duties = schedule.advance();
        assert!(duties.open_day);
        assert!(duties.close_day);
    }

    #[test]
    fn a_tick_count_past_the_budget_still_closes_the_day() {
        let mut schedule = DaySchedule::new(5).with_tick_count(7);
        assert!(schedule.advance().close_day);
    }

    #[test]
    fn alignment_lands_on_the_next_minute() -> Result {
        let timezone = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = timezone.with_ymd_and_hms(2025, 6, 15, 14, 30, 42).unwrap();
        let alignment = align(&now)?;
        assert_eq!(
            alignment.first_tick_at,
            timezone.with_ymd_and_hms(2025, 6, 15, 14, 31, 1).unwrap(),
        );
        assert_eq!(alignment.ticks_until_day_close, 568);
        Ok(())
    }

    #[test]
    fn alignment_just_before_midnight_leaves_no_ticks() -> Result {
        let timezone = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = timezone.with_ymd_and_hms(2025, 6, 15, 23, 59, 10).unwrap();
        let alignment = align(&now)?;
        assert_eq!(
            alignment.first_tick_at,
            timezone.with_ymd_and_hms(2025, 6, 16, 0, 0, 1).unwrap(),
        );
        assert_eq!(alignment.ticks_until_day_close, 0);
        Ok(())
    }

    #[test]
    fn alignment_at_a_whole_minute_waits_a_full_minute() -> Result {
        let timezone = FixedOffset::east_opt(0).unwrap();
        let now = timezone.with_ymd_and_hms(2025, 6, 15, 14, 30, 0).unwrap();
        let alignment = align(&now)?;
        assert_eq!(
            alignment.first_tick_at,
            timezone.with_ymd_and_hms(2025, 6, 15, 14, 31, 1).unwrap(),
        );
        Ok(())
    }
}
