//! Time unit table used by age predicates
//!
//! Months are 30 days and years are 365 days.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A unit of time with its accepted spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// 1 second
    Second,
    /// 60 seconds
    Minute,
    /// 3600 seconds
    Hour,
    /// 86400 seconds
    Day,
    /// 7 days
    Week,
    /// 30 days
    Month,
    /// 365 days
    Year,
}

impl TimeUnit {
    /// Every unit, shortest first
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Week,
        TimeUnit::Month,
        TimeUnit::Year,
    ];

    /// Length of one unit in seconds
    pub const fn seconds(self) -> u64 {
        match self {
            TimeUnit::Second => 1,
            TimeUnit::Minute => 60,
            TimeUnit::Hour => 3_600,
            TimeUnit::Day => 86_400,
            TimeUnit::Week => 604_800,
            TimeUnit::Month => 2_592_000,
            TimeUnit::Year => 31_536_000,
        }
    }

    /// Lowercase spellings accepted by [`FromStr`]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            TimeUnit::Second => &["s", "sec", "secs", "second", "seconds"],
            TimeUnit::Minute => &["min", "mins", "minute", "minutes"],
            TimeUnit::Hour => &["h", "hr", "hrs", "hour", "hours"],
            TimeUnit::Day => &["d", "day", "days"],
            TimeUnit::Week => &["w", "wk", "wks", "week", "weeks"],
            TimeUnit::Month => &["mon", "month", "months"],
            TimeUnit::Year => &["y", "yr", "yrs", "year", "years"],
        }
    }

    /// `amount` of this unit, in seconds
    pub fn to_seconds(self, amount: f64) -> f64 {
        amount * self.seconds() as f64
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        TimeUnit::ALL
            .into_iter()
            .find(|unit| unit.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| {
                let accepted: Vec<&str> = TimeUnit::ALL
                    .iter()
                    .flat_map(|unit| unit.aliases().iter().copied())
                    .collect();
                Error::invalid_argument(format!(
                    "'{}' is not a time unit, expected one of: {}",
                    s,
                    accepted.join(", ")
                ))
            })
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Longest alias is the full plural name
        let name = match self {
            TimeUnit::Second => "seconds",
            TimeUnit::Minute => "minutes",
            TimeUnit::Hour => "hours",
            TimeUnit::Day => "days",
            TimeUnit::Week => "weeks",
            TimeUnit::Month => "months",
            TimeUnit::Year => "years",
        };
        f.write_str(name)
    }
}

/// Convert `amount` of the unit spelled `unit` to seconds
pub fn get_seconds(amount: f64, unit: &str) -> Result<f64> {
    Ok(unit.parse::<TimeUnit>()?.to_seconds(amount))
}
