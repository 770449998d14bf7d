use std::fmt;
use std::time::Duration;

use crate::domain::errors::ScheduleError;

/// Unit the user picks for the refresh interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshUnit {
    Hours,
    Minutes,
    Seconds,
}

impl RefreshUnit {
    /// Upper bound for a value in this unit, mirroring a clock face.
    pub fn max_value(&self) -> u32 {
        match self {
            RefreshUnit::Hours => 23,
            RefreshUnit::Minutes | RefreshUnit::Seconds => 59,
        }
    }

    fn seconds_per_unit(&self) -> u64 {
        match self {
            RefreshUnit::Hours => 3_600,
            RefreshUnit::Minutes => 60,
            RefreshUnit::Seconds => 1,
        }
    }
}

impl fmt::Display for RefreshUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshUnit::Hours => write!(f, "hours"),
            RefreshUnit::Minutes => write!(f, "minutes"),
            RefreshUnit::Seconds => write!(f, "seconds"),
        }
    }
}

/// A committed refresh interval. Construction validates the value, so any
/// instance reaching the scheduler is already within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshInterval {
    value: u32,
    unit: RefreshUnit,
}

impl RefreshInterval {
    pub fn new(value: u32, unit: RefreshUnit) -> Result<Self, ScheduleError> {
        if value == 0 {
            return Err(ScheduleError::NonPositive);
        }
        if value > unit.max_value() {
            return Err(ScheduleError::OutOfRange {
                unit,
                max: unit.max_value(),
            });
        }
        Ok(Self { value, unit })
    }

    /// Startup default: one hour.
    pub fn hourly() -> Self {
        Self {
            value: 1,
            unit: RefreshUnit::Hours,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.value) * self.unit.seconds_per_unit()
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds())
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Progress through a countdown as an integer percentage.
///
/// Floored at 1% once any time has elapsed, otherwise rounded to the nearest
/// whole percent.
pub fn progress_percent(elapsed_seconds: u64, total_seconds: u64) -> u8 {
    let fraction = elapsed_seconds as f64 / total_seconds as f64;
    if fraction > 0.01 {
        (fraction * 100.0).round() as u8
    } else {
        1
    }
}

/// Remaining time formatted for display, `HH:MM:SS`.
pub fn format_remaining(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    format!("{:0>2}:{:0>2}:{:0>2}", hours, minutes, secs)
}
