//! Total ordering over coerced cell values

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use crate::column::ColumnType;
use crate::model::Value;

/// A cell value coerced for comparison according to its column type.
///
/// Ordering is total: `Null` sorts below everything, numbers compare with
/// `f64::total_cmp`, text compares lower-cased.
#[derive(Debug, Clone)]
pub enum SortKey {
    Null,
    Number(f64),
    /// Milliseconds since the Unix epoch.
    Time(i64),
    Text(String),
}

impl SortKey {
    pub fn from_value(value: &Value, column_type: ColumnType) -> Self {
        if value.is_null() {
            return SortKey::Null;
        }
        match column_type {
            ColumnType::Number => number(value).map_or(SortKey::Null, SortKey::Number),
            ColumnType::Date => time(value).map_or(SortKey::Null, SortKey::Time),
            ColumnType::Boolean => match value {
                Value::Bool(b) => SortKey::Number(if *b { 1.0 } else { 0.0 }),
                other => number(other).map_or(SortKey::Null, SortKey::Number),
            },
            ColumnType::Array => match value {
                Value::List(items) => SortKey::Number(items.len() as f64),
                Value::Json(serde_json::Value::Array(items)) => SortKey::Number(items.len() as f64),
                _ => SortKey::Number(0.0),
            },
            ColumnType::String | ColumnType::Object | ColumnType::Component => {
                SortKey::Text(value.display_text().to_lowercase())
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SortKey::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SortKey::Number(n) => Some(*n),
            SortKey::Time(t) => Some(*t as f64),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Null => 0,
            SortKey::Number(_) => 1,
            SortKey::Time(_) => 2,
            SortKey::Text(_) => 3,
        }
    }
}

/// Numeric view of a value. Strings are parsed after dropping everything but
/// digits, `.` and `-`, so "$1,200.50" reads as 1200.5.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(_) | Value::Float(_) | Value::Decimal(_) => value.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::DateTime(dt) => Some(dt.timestamp_millis() as f64),
        Value::List(items) => Some(items.len() as f64),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        Value::Json(serde_json::Value::Number(n)) => n.as_f64(),
        Value::Null | Value::Json(_) => None,
    }
}

/// Timestamp view of a value. Accepts RFC 3339 and plain `YYYY-MM-DD`
/// strings; numbers are taken as epoch milliseconds.
fn time(value: &Value) -> Option<i64> {
    match value {
        Value::DateTime(dt) => Some(dt.timestamp_millis()),
        Value::Int(n) => Some(*n),
        Value::Float(n) if n.is_finite() => Some(*n as i64),
        Value::String(s) => parse_time(s).map(|dt| dt.timestamp_millis()),
        _ => None,
    }
}

/// Parses RFC 3339 or `YYYY-MM-DD` (midnight UTC).
pub fn parse_time(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Time(a), SortKey::Time(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}
