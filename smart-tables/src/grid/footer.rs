//! Footer aggregates

use chrono::DateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use serde::Serialize;

use crate::cell::format;
use crate::column::ColumnType;
use crate::model::Value;
use crate::query::SortKey;

/// Built-in summary of a column over the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregation {
    /// Rows with a present, truthy value.
    Count,
    Sum,
    /// Sum rendered as US dollars.
    Currency,
    /// Earliest to latest date.
    DateRange,
    /// Most frequent values, at most this many.
    Top(usize),
}

impl Aggregation {
    /// Summarises `values`. Returns an empty string when there is nothing
    /// to show.
    pub fn compute(&self, values: &[Value]) -> String {
        match self {
            Aggregation::Count => {
                let count = values.iter().filter(|v| is_present(v)).count();
                format::thousands(count as f64, 0)
            }
            Aggregation::Sum => {
                let sum: f64 = values
                    .iter()
                    .filter_map(|v| SortKey::from_value(v, ColumnType::Number).as_f64())
                    .sum();
                format::number(sum)
            }
            Aggregation::Currency => {
                let total: Decimal = values.iter().filter_map(decimal).sum();
                format!("{} USD", format::usd(total))
            }
            Aggregation::DateRange => date_range(values),
            Aggregation::Top(limit) => top_values(values, *limit),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.trim().is_empty(),
        Value::List(items) => !items.is_empty(),
        _ => true,
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Decimal(d) => Some(*d),
        Value::Int(n) => Some(Decimal::from(*n)),
        other => SortKey::from_value(other, ColumnType::Number)
            .as_f64()
            .and_then(Decimal::from_f64),
    }
}

fn date_range(values: &[Value]) -> String {
    let millis: Vec<i64> = values
        .iter()
        .filter_map(|v| match SortKey::from_value(v, ColumnType::Date) {
            SortKey::Time(ms) => Some(ms),
            _ => None,
        })
        .collect();
    let (Some(min), Some(max)) = (millis.iter().min(), millis.iter().max()) else {
        return String::new();
    };
    let (Some(first), Some(last)) = (DateTime::from_timestamp_millis(*min), DateTime::from_timestamp_millis(*max))
    else {
        return String::new();
    };
    let (first, last) = (format::date(first), format::date(last));
    if first == last { first } else { format!("{first} - {last}") }
}

fn top_values(values: &[Value], limit: usize) -> String {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values.iter().filter(|v| is_present(v)) {
        let label = value.display_text();
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(label, n)| format!("{label} ({n})"))
        .collect::<Vec<_>>()
        .join(", ")
}
