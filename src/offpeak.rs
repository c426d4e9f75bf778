//! Daily off-peak windows
//!
//! An off-peak window is a recurring time-of-day interval such as `01:30`
//! to `07:30`. Windows never wrap past midnight: each timestamp is checked
//! against the window built on its own calendar day, in its own time zone.
//! An overnight tariff is written as two windows, `22:00`-`24:00` and
//! `00:00`-`06:00`; `24:00` is only accepted as an end and means the next
//! midnight.

use crate::error::ParseError;
use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone,
};
use std::fmt;

const END_OF_DAY: (u32, u32) = (24, 0);

/// Off-peak period with both endpoints normalised to hour/minute pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffpeakPeriod {
    from_hour: u32,
    from_minute: u32,
    to_hour: u32,
    to_minute: u32,
}

impl OffpeakPeriod {
    /// Parse a window from two `H:MM` / `HH:MM` strings
    pub fn parse(from: &str, to: &str) -> Result<Self, ParseError> {
        let (from_hour, from_minute) = parse_time_of_day(from, false)?;
        let (to_hour, to_minute) = parse_time_of_day(to, true)?;
        Ok(Self {
            from_hour,
            from_minute,
            to_hour,
            to_minute,
        })
    }

    /// Start of the window as `(hour, minute)`
    pub fn start(&self) -> (u32, u32) {
        (self.from_hour, self.from_minute)
    }

    /// End of the window as `(hour, minute)`
    pub fn end(&self) -> (u32, u32) {
        (self.to_hour, self.to_minute)
    }

    /// True when the window can never match, i.e. `to` is not after `from`.
    ///
    /// Overnight spans fall in this category since windows do not wrap.
    pub fn is_empty_interval(&self) -> bool {
        self.end() <= self.start()
    }

    /// Whether `t` lies strictly inside the window on its own calendar day.
    ///
    /// Both boundaries are exclusive. A boundary that does not exist on that
    /// day (DST gap) is moved forward by the gap, so `02:30` reads as `03:30`
    /// on a spring-forward day.
    pub fn contains<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> bool {
        let tz = t.timezone();
        let Some(day) = NaiveDate::from_ymd_opt(t.year(), t.month(), t.day()) else {
            return false;
        };

        let from = boundary(day, self.start()).and_then(|n| resolve_local(&tz, n));
        let to = boundary(day, self.end()).and_then(|n| resolve_local(&tz, n));

        match (from, to) {
            (Some(from), Some(to)) => *t > from && *t < to,
            _ => false,
        }
    }
}

fn boundary(day: NaiveDate, (hour, minute): (u32, u32)) -> Option<NaiveDateTime> {
    if (hour, minute) == END_OF_DAY {
        return day.succ_opt().map(|next| next.and_time(NaiveTime::MIN));
    }
    day.and_hms_opt(hour, minute, 0)
}

/// Map a wall-clock time to an instant in `tz`.
///
/// Ambiguous times take the earlier instant. Times skipped by a DST jump are
/// read with the offset in force before the jump, which lands them past the
/// gap by its length.
pub(crate) fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => Some(t),
        LocalResult::None => {
            let before = naive.checked_sub_signed(TimeDelta::days(1))?;
            let offset = tz.offset_from_utc_datetime(&before).fix();
            let utc = naive
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

impl fmt::Display for OffpeakPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.from_hour, self.from_minute, self.to_hour, self.to_minute
        )
    }
}

/// True when any of `periods` contains `t`; false for an empty slice
pub fn is_offpeak<Tz: TimeZone>(periods: &[OffpeakPeriod], t: &DateTime<Tz>) -> bool {
    periods.iter().any(|p| p.contains(t))
}

fn parse_time_of_day(value: &str, is_end: bool) -> Result<(u32, u32), ParseError> {
    // At most one leading zero is dropped before splitting
    let trimmed = value.strip_prefix('0').unwrap_or(value);

    let Some((hour, minute)) = trimmed.split_once(':') else {
        return Err(ParseError::MissingSeparator {
            value: value.to_string(),
        });
    };
    if hour.is_empty() || minute.is_empty() {
        return Err(ParseError::EmptyComponent {
            value: value.to_string(),
        });
    }

    let parse = |part: &str| {
        part.parse::<u32>().map_err(|source| ParseError::InvalidNumber {
            value: value.to_string(),
            source,
        })
    };
    let hour = parse(hour)?;
    let minute = parse(minute)?;

    if is_end && (hour, minute) == END_OF_DAY {
        return Ok(END_OF_DAY);
    }
    if hour > 23 || minute > 59 {
        return Err(ParseError::OutOfRange {
            value: value.to_string(),
        });
    }
    Ok((hour, minute))
}
