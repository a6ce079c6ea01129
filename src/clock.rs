//! Fixed-timezone wall clock for the persona prompt and response metadata.
//!
//! All times are rendered in Asia/Dhaka. Bangladesh has observed UTC+6 with
//! no daylight saving since 2009, so a fixed offset is exact.

use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// UTC offset of Asia/Dhaka in seconds.
const DHAKA_UTC_OFFSET_SECS: i32 = 21_600;

/// Coarse period of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    /// 05:00 to 11:59.
    Morning,
    /// 12:00 to 16:59.
    Afternoon,
    /// 17:00 to 20:59.
    Evening,
    /// 21:00 to 04:59.
    Night,
}

impl DayPeriod {
    /// Classify a 24-hour clock hour. Lower bounds inclusive, upper exclusive.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Lower-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of "now" in the Dhaka timezone.
///
/// Stateless apart from an optional pinned instant, which exists so callers
/// can render a deterministic time.
#[derive(Debug, Clone, Copy)]
pub struct TimeContext {
    offset: FixedOffset,
    pinned: Option<DateTime<Utc>>,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self::dhaka()
    }
}

impl TimeContext {
    /// Clock following real time in Asia/Dhaka.
    pub fn dhaka() -> Self {
        Self {
            offset: FixedOffset::east_opt(DHAKA_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
            pinned: None,
        }
    }

    /// Clock frozen at `instant`.
    pub fn pinned_at(instant: DateTime<Utc>) -> Self {
        Self {
            pinned: Some(instant),
            ..Self::dhaka()
        }
    }

    /// Current local time in Dhaka.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.pinned
            .unwrap_or_else(Utc::now)
            .with_timezone(&self.offset)
    }

    /// Long-form current time, e.g.
    /// `Current time in Dhaka, Bangladesh: Friday, October 16, 2026 at 03:45 PM`.
    pub fn formatted_time(&self) -> String {
        format!(
            "Current time in Dhaka, Bangladesh: {}",
            format_local(&self.now())
        )
    }

    /// Period of the day for the current Dhaka hour.
    pub fn day_period(&self) -> DayPeriod {
        DayPeriod::from_hour(self.now().hour())
    }
}

/// Render a local instant as weekday, date and 12-hour clock.
pub fn format_local(local: &DateTime<FixedOffset>) -> String {
    local.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}
