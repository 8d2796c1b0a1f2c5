//! Time types for calendar items.
//!
//! The calendar API describes the start and end of an item either as an
//! instant (`{"dateTime": "..."}`) or as an all-day date (`{"date": "..."}`).
//! [`ItemTime`] models both and keeps the wire shape on (de)serialization.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when an item time cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemTimeError {
    /// Neither `dateTime` nor `date` was present.
    #[error("item time has neither dateTime nor date")]
    Missing,

    /// `dateTime` was not RFC 3339.
    #[error("invalid dateTime {value:?}: {reason}")]
    InvalidDateTime { value: String, reason: String },

    /// `date` was not `YYYY-MM-DD`.
    #[error("invalid date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },
}

/// The start or end of a calendar item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireItemTime", into = "WireItemTime")]
pub enum ItemTime {
    /// A specific instant, stored in UTC.
    DateTime(DateTime<Utc>),
    /// An all-day date.
    AllDay(NaiveDate),
}

impl ItemTime {
    /// Creates an instant from a datetime in any timezone.
    pub fn from_datetime<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.with_timezone(&Utc))
    }

    /// Creates an all-day time.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns `true` for all-day items.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns the instant, if this is not an all-day time.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            Self::AllDay(_) => None,
        }
    }

    /// Returns the date, if this is an all-day time.
    pub fn as_date(&self) -> Option<&NaiveDate> {
        match self {
            Self::AllDay(d) => Some(d),
            Self::DateTime(_) => None,
        }
    }

    /// Converts to a UTC instant for ordering. All-day dates map to midnight UTC.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => *dt,
            Self::AllDay(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Returns the calendar date as seen from `tz`.
    ///
    /// All-day dates are not shifted.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.with_timezone(tz).date_naive(),
            Self::AllDay(date) => *date,
        }
    }
}

/// Wire shape used by the calendar API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItemTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl TryFrom<WireItemTime> for ItemTime {
    type Error = ItemTimeError;

    fn try_from(wire: WireItemTime) -> Result<Self, Self::Error> {
        match (wire.date_time, wire.date) {
            (Some(value), _) => DateTime::parse_from_rfc3339(&value)
                .map(Self::from_datetime)
                .map_err(|e| ItemTimeError::InvalidDateTime {
                    reason: e.to_string(),
                    value,
                }),
            (None, Some(value)) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .map(Self::AllDay)
                .map_err(|e| ItemTimeError::InvalidDate {
                    reason: e.to_string(),
                    value,
                }),
            (None, None) => Err(ItemTimeError::Missing),
        }
    }
}

impl From<ItemTime> for WireItemTime {
    fn from(time: ItemTime) -> Self {
        match time {
            ItemTime::DateTime(dt) => Self {
                date_time: Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ..Default::default()
            },
            ItemTime::AllDay(date) => Self {
                date: Some(date.format("%Y-%m-%d").to_string()),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn parses_datetime_with_offset() {
        let time: ItemTime =
            serde_json::from_str(r#"{"dateTime": "2024-03-15T10:00:00-03:00", "timeZone": "America/Sao_Paulo"}"#)
                .unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 13, 0, 0).unwrap();
        assert_eq!(time, ItemTime::DateTime(expected));
        assert!(!time.is_all_day());
    }

    #[test]
    fn parses_all_day_date() {
        let time: ItemTime = serde_json::from_str(r#"{"date": "2024-03-15"}"#).unwrap();
        assert!(time.is_all_day());
        assert_eq!(
            time.as_date(),
            Some(&NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn datetime_wins_over_date() {
        let time: ItemTime =
            serde_json::from_str(r#"{"dateTime": "2024-03-15T10:00:00Z", "date": "2024-03-20"}"#)
                .unwrap();
        assert!(time.as_datetime().is_some());
    }

    #[test]
    fn rejects_empty_object() {
        let err = serde_json::from_str::<ItemTime>("{}").unwrap_err();
        assert!(err.to_string().contains("neither dateTime nor date"));
    }

    #[test]
    fn rejects_malformed_date() {
        let err = serde_json::from_str::<ItemTime>(r#"{"date": "15/03/2024"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let time = ItemTime::DateTime(Utc.with_ymd_and_hms(2024, 3, 15, 13, 0, 0).unwrap());
        let json = serde_json::to_value(&time).unwrap();
        assert_eq!(json, serde_json::json!({"dateTime": "2024-03-15T13:00:00Z"}));

        let all_day = ItemTime::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let json = serde_json::to_value(&all_day).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2024-03-15"}));
    }

    #[test]
    fn date_in_timezone_shifts_instants_only() {
        let late = ItemTime::DateTime(Utc.with_ymd_and_hms(2024, 3, 15, 1, 30, 0).unwrap());
        let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            late.date_in(&sao_paulo),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );

        let all_day = ItemTime::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(
            all_day.date_in(&sao_paulo),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn all_day_orders_at_midnight_utc() {
        let all_day = ItemTime::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(
            all_day.to_utc_datetime(),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        );
    }
}
