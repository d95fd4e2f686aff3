//! Publish dates.
//!
//! Accepts `YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SSZ`. Field order makes the
//! derived `Ord` chronological.

use anyhow::{Result, bail};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse from "YYYY-MM-DD" or "YYYY-MM-DDTHH:MM:SSZ".
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();
        if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        let month = parse_u8(&bytes[5..7])?;
        let day = parse_u8(&bytes[8..10])?;

        let (hour, minute, second) = match bytes.len() {
            10 => (0, 0, 0),
            20 if bytes[10] == b'T' && bytes[13] == b':' && bytes[16] == b':' && bytes[19] == b'Z' => (
                parse_u8(&bytes[11..13])?,
                parse_u8(&bytes[14..16])?,
                parse_u8(&bytes[17..19])?,
            ),
            _ => return None,
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        Some(dt)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            bail!("month is invalid: {}", self.month);
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            bail!("day is invalid: {}", self.day);
        }
        if self.hour > 23 || self.minute > 59 || self.second > 59 {
            bail!(
                "time is invalid: {:02}:{:02}:{:02}",
                self.hour,
                self.minute,
                self.second
            );
        }
        Ok(())
    }

    /// `YYYY-MM-DD`
    pub fn date_str(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{}T{:02}:{:02}:{:02}Z",
            self.date_str(),
            self.hour,
            self.minute,
            self.second
        )
    }

    /// Human-readable form used on rendered pages: `January 2, 2024`.
    pub fn display_long(&self) -> String {
        const MONTHS: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        let month = MONTHS[usize::from(self.month.clamp(1, 12) - 1)];
        format!("{month} {}, {:04}", self.day, self.year)
    }
}

impl fmt::Display for DateTimeUtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.hour, self.minute, self.second) == (0, 0, 0) {
            f.write_str(&self.date_str())
        } else {
            f.write_str(&self.to_rfc3339())
        }
    }
}

#[allow(clippy::manual_is_multiple_of)]
const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Parse 2-digit ASCII number
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Some((a - b'0') * 10 + (b - b'0')),
        _ => None,
    }
}

/// Parse 4-digit ASCII number
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(
        bytes
            .iter()
            .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0')),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = DateTimeUtc::parse("2024-06-15").unwrap();
        assert_eq!(dt, DateTimeUtc::from_ymd(2024, 6, 15));
        assert_eq!(dt.to_string(), "2024-06-15");
    }

    #[test]
    fn test_parse_datetime() {
        let dt = DateTimeUtc::parse("2024-06-15T14:30:45Z").unwrap();
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
        assert_eq!(dt.to_string(), "2024-06-15T14:30:45Z");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(DateTimeUtc::parse("2024-13-01").is_none());
        assert!(DateTimeUtc::parse("2023-02-29").is_none());
        assert!(DateTimeUtc::parse("2024-02-29").is_some());
        assert!(DateTimeUtc::parse("2024-1-01").is_none());
        assert!(DateTimeUtc::parse("yesterday").is_none());
        assert!(DateTimeUtc::parse("2024-01-01 trailing").is_none());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = DateTimeUtc::parse("2024-01-01").unwrap();
        let b = DateTimeUtc::parse("2024-01-01T08:00:00Z").unwrap();
        let c = DateTimeUtc::parse("2024-02-01").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_display_long() {
        let dt = DateTimeUtc::from_ymd(2024, 1, 2);
        assert_eq!(dt.display_long(), "January 2, 2024");
    }
}
