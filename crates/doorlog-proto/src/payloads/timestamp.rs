//! Calendar composition for record timestamps.
//!
//! The lock reports local wall-clock time as six separate fields and no
//! timezone. Fields are not range-checked: out-of-range values roll over into
//! the next larger unit (month 13 is January of the following year, day 0 is
//! the last day of the previous month, hour 24 is midnight of the next day).

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::errors::{ProtocolError, Result};

/// Date and time fields as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateFields {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateFields {
    /// Compose a local timestamp, normalizing overflow
    pub fn compose(self) -> NaiveDateTime {
        let months = i32::from(self.year) * 12 + i32::from(self.month) - 1;
        let year = months.div_euclid(12);
        // rem_euclid(12) is in 0..12
        let month = months.rem_euclid(12) as u32 + 1;

        // year is within -1..=65535 and month within 1..=12, both valid for chrono
        let first_of_month = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default();

        let offset = (i64::from(self.day) - 1) * 86_400
            + i64::from(self.hour) * 3_600
            + i64::from(self.minute) * 60
            + i64::from(self.second);

        first_of_month.and_time(NaiveTime::MIN) + TimeDelta::seconds(offset)
    }

    /// Split a timestamp into wire fields
    pub fn from_timestamp(timestamp: &NaiveDateTime) -> Result<Self> {
        let year = u16::try_from(timestamp.year())
            .map_err(|_| ProtocolError::FieldOutOfRange { field: "year", value: timestamp.year() })?;

        Ok(Self {
            year,
            month: timestamp.month() as u8,
            day: timestamp.day() as u8,
            hour: timestamp.hour() as u8,
            minute: timestamp.minute() as u8,
            second: timestamp.second() as u8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> DateFields {
        DateFields { year, month, day, hour, minute, second }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, s).unwrap()
    }

    #[test]
    fn valid_fields_compose_directly() {
        assert_eq!(fields(2024, 6, 15, 14, 30, 0).compose(), at(2024, 6, 15, 14, 30, 0));
    }

    #[test]
    fn month_overflow_rolls_into_next_year() {
        assert_eq!(fields(2024, 13, 1, 0, 0, 0).compose(), at(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn zero_month_and_day_roll_backwards() {
        assert_eq!(fields(2024, 0, 1, 0, 0, 0).compose(), at(2023, 12, 1, 0, 0, 0));
        assert_eq!(fields(2024, 3, 0, 0, 0, 0).compose(), at(2024, 2, 29, 0, 0, 0));
    }

    #[test]
    fn time_overflow_rolls_into_next_day() {
        assert_eq!(fields(2024, 2, 30, 24, 60, 60).compose(), at(2024, 3, 2, 1, 1, 0));
    }

    #[test]
    fn two_digit_years_are_literal() {
        assert_eq!(fields(99, 12, 31, 23, 59, 59).compose(), at(99, 12, 31, 23, 59, 59));
        assert_eq!(fields(0, 1, 1, 0, 0, 0).compose(), at(0, 1, 1, 0, 0, 0));
        assert_eq!(fields(100, 1, 1, 0, 0, 0).compose(), at(100, 1, 1, 0, 0, 0));
    }

    #[test]
    fn split_round_trips_valid_timestamps() {
        let ts = at(2024, 6, 15, 14, 30, 5);
        assert_eq!(DateFields::from_timestamp(&ts).unwrap().compose(), ts);
    }

    #[test]
    fn split_rejects_negative_years() {
        let ts = at(-1, 1, 1, 0, 0, 0);
        assert!(matches!(
            DateFields::from_timestamp(&ts),
            Err(ProtocolError::FieldOutOfRange { field: "year", .. })
        ));
    }
}
