//! Dish preparation time.
//!
//! Accepted inputs: `[D ]HH:MM:SS[.ffffff]`, `MM:SS`, `SS[.ffffff]` or a plain
//! number of seconds. Rendered as `HH:MM:SS`, prefixed with `<days> ` for one
//! day or more and suffixed with `.ffffff` when sub-second precision is present.

use std::fmt;
use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;

use crate::validation::{TextOrNumber, DURATION_OUT_OF_RANGE, INVALID_DURATION};

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<days>\d+) (?:days?, )?)?(?:(?:(?P<hours>\d+):)?(?P<minutes>\d+):)?(?P<seconds>\d+)(?:\.(?P<micros>\d{1,6})\d*)?$",
    )
    .expect("duration pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreparationTime(TimeDelta);

impl PreparationTime {
    pub fn from_seconds(seconds: i64) -> Self {
        Self(TimeDelta::seconds(seconds))
    }

    pub fn from_microseconds(micros: i64) -> Self {
        Self(TimeDelta::microseconds(micros))
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }

    /// Values built through `parse` or `from_input` always fit in microseconds.
    pub fn total_microseconds(&self) -> i64 {
        self.0.num_microseconds().unwrap_or(i64::MAX)
    }

    fn checked(delta: TimeDelta) -> Result<Self, String> {
        match delta.num_microseconds() {
            Some(_) => Ok(Self(delta)),
            None => Err(DURATION_OUT_OF_RANGE.to_string()),
        }
    }

    pub fn parse(input: &str) -> Result<Self, String> {
        let caps = DURATION_RE
            .captures(input.trim())
            .ok_or_else(|| INVALID_DURATION.to_string())?;

        let part = |name: &str| -> Result<i64, String> {
            caps.name(name)
                .map(|m| m.as_str().parse::<i64>())
                .transpose()
                .map(|v| v.unwrap_or(0))
                .map_err(|_| INVALID_DURATION.to_string())
        };

        let micros = match caps.name("micros") {
            // right-pad so ".5" means 500000 microseconds
            Some(m) => format!("{:0<6}", m.as_str())
                .parse::<i64>()
                .map_err(|_| INVALID_DURATION.to_string())?,
            None => 0,
        };

        let delta = TimeDelta::try_days(part("days")?)
            .zip(TimeDelta::try_hours(part("hours")?))
            .zip(TimeDelta::try_minutes(part("minutes")?))
            .zip(TimeDelta::try_seconds(part("seconds")?))
            .and_then(|(((d, h), m), s)| {
                d.checked_add(&h)?
                    .checked_add(&m)?
                    .checked_add(&s)?
                    .checked_add(&TimeDelta::microseconds(micros))
            })
            .ok_or_else(|| DURATION_OUT_OF_RANGE.to_string())?;

        Self::checked(delta)
    }

    pub fn from_input(value: &TextOrNumber) -> Result<Self, String> {
        match value {
            TextOrNumber::Number(n) => match n.as_i64() {
                Some(seconds) if seconds >= 0 => TimeDelta::try_seconds(seconds)
                    .ok_or_else(|| DURATION_OUT_OF_RANGE.to_string())
                    .and_then(Self::checked),
                _ => Self::parse(&n.to_string()),
            },
            TextOrNumber::Text(s) => Self::parse(s),
        }
    }
}

impl fmt::Display for PreparationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.num_seconds();
        let micros = self.0.subsec_nanos() / 1_000;
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;

        if days > 0 {
            write!(f, "{} ", days)?;
        }
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)?;
        if micros > 0 {
            write!(f, ".{:06}", micros)?;
        }
        Ok(())
    }
}
