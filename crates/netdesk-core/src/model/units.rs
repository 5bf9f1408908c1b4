// ── Unit-qualified package quantities ──
//
// Session time is entered as minutes/hours/days and stored as minutes.
// Data limits are entered as MB/GB and stored as bytes (binary multiples).

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

const BYTES_PER_MB: u64 = 1024 * 1024;
const BYTES_PER_GB: u64 = 1024 * BYTES_PER_MB;

/// Unit selector paired with the Hotspot session time.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SessionTimeUnit {
    Minutes,
    #[default]
    Hours,
    Days,
}

impl SessionTimeUnit {
    pub fn minutes_per_unit(self) -> u32 {
        match self {
            Self::Minutes => 1,
            Self::Hours => 60,
            Self::Days => 24 * 60,
        }
    }
}

/// Unit selector paired with the Hotspot data limit.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DataLimitUnit {
    #[default]
    Mb,
    Gb,
}

impl DataLimitUnit {
    pub fn bytes_per_unit(self) -> u64 {
        match self {
            Self::Mb => BYTES_PER_MB,
            Self::Gb => BYTES_PER_GB,
        }
    }
}

/// A session time as entered: value plus unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTime {
    pub value: u32,
    pub unit: SessionTimeUnit,
}

impl SessionTime {
    pub fn new(value: u32, unit: SessionTimeUnit) -> Self {
        Self { value, unit }
    }

    /// Normalized minutes, or `None` on overflow.
    pub fn minutes(self) -> Option<u32> {
        self.value.checked_mul(self.unit.minutes_per_unit())
    }

    /// Express stored minutes in the largest unit that divides them exactly.
    pub fn from_minutes(minutes: u32) -> Self {
        SessionTimeUnit::iter()
            .rev()
            .find(|unit| minutes % unit.minutes_per_unit() == 0)
            .map_or(Self::new(minutes, SessionTimeUnit::Minutes), |unit| {
                Self::new(minutes / unit.minutes_per_unit(), unit)
            })
    }
}

/// A data limit as entered: value plus unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLimit {
    pub value: u64,
    pub unit: DataLimitUnit,
}

impl DataLimit {
    pub fn new(value: u64, unit: DataLimitUnit) -> Self {
        Self { value, unit }
    }

    /// Normalized bytes, or `None` on overflow.
    pub fn bytes(self) -> Option<u64> {
        self.value.checked_mul(self.unit.bytes_per_unit())
    }

    /// Express stored bytes in GB when exact, otherwise MB (rounded to
    /// the nearest whole megabyte for limits set outside this console).
    pub fn from_bytes(bytes: u64) -> Self {
        if bytes > 0 && bytes % BYTES_PER_GB == 0 {
            return Self::new(bytes / BYTES_PER_GB, DataLimitUnit::Gb);
        }
        let mb = bytes / BYTES_PER_MB + u64::from(bytes % BYTES_PER_MB >= BYTES_PER_MB / 2);
        Self::new(mb, DataLimitUnit::Mb)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn session_unit_parses_case_insensitively() {
        assert_eq!(
            "hours".parse::<SessionTimeUnit>().unwrap(),
            SessionTimeUnit::Hours
        );
        assert_eq!(SessionTimeUnit::Days.to_string(), "DAYS");
        assert_eq!(SessionTimeUnit::default(), SessionTimeUnit::Hours);
    }

    #[test]
    fn session_time_normalizes_to_minutes() {
        assert_eq!(
            SessionTime::new(2, SessionTimeUnit::Days).minutes(),
            Some(2880)
        );
        assert_eq!(
            SessionTime::new(u32::MAX, SessionTimeUnit::Hours).minutes(),
            None
        );
    }

    #[test]
    fn session_time_picks_largest_exact_unit() {
        assert_eq!(
            SessionTime::from_minutes(60),
            SessionTime::new(1, SessionTimeUnit::Hours)
        );
        assert_eq!(
            SessionTime::from_minutes(2880),
            SessionTime::new(2, SessionTimeUnit::Days)
        );
        assert_eq!(
            SessionTime::from_minutes(90),
            SessionTime::new(90, SessionTimeUnit::Minutes)
        );
    }

    #[test]
    fn data_limit_round_trips_through_bytes() {
        let gb = DataLimit::new(5, DataLimitUnit::Gb);
        assert_eq!(DataLimit::from_bytes(gb.bytes().unwrap()), gb);

        let mb = DataLimit::new(500, DataLimitUnit::Mb);
        assert_eq!(DataLimit::from_bytes(mb.bytes().unwrap()), mb);
        assert_eq!(DataLimitUnit::Gb.to_string(), "GB");
    }

    #[test]
    fn unaligned_bytes_round_to_nearest_megabyte() {
        assert_eq!(
            DataLimit::from_bytes(1_500_000),
            DataLimit::new(1, DataLimitUnit::Mb)
        );
        assert_eq!(
            DataLimit::from_bytes(BYTES_PER_MB + BYTES_PER_MB / 2),
            DataLimit::new(2, DataLimitUnit::Mb)
        );
    }

    #[test]
    fn huge_byte_counts_do_not_overflow() {
        assert_eq!(
            DataLimit::from_bytes(u64::MAX),
            DataLimit::new(u64::MAX / BYTES_PER_MB + 1, DataLimitUnit::Mb)
        );
    }

    #[test]
    fn zero_data_limit_stays_in_megabytes() {
        assert_eq!(
            DataLimit::from_bytes(0),
            DataLimit::new(0, DataLimitUnit::Mb)
        );
    }
}
