//! Renderer-neutral cell fragments

use super::format;
use crate::column::ColumnType;
use crate::model::Value;
use crate::query::SortKey;
use crate::query::parse_time;

/// What a cell shows, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    /// De-emphasised text.
    Muted(String),
    Badge(String),
    Identity {
        name: Option<String>,
        address: String,
        avatar: Option<String>,
    },
    Checkmark(bool),
    /// Leading token symbols plus how many more were left out.
    TokenStack {
        symbols: Vec<String>,
        overflow: usize,
    },
    Activity {
        summary: String,
        when: String,
    },
    Lines(Vec<CellContent>),
    /// Async data still loading.
    Skeleton,
    /// The column does not apply to this row, or the value is absent.
    Placeholder,
    Blank,
}

impl CellContent {
    pub const PLACEHOLDER: &'static str = "—";

    /// Default rendering of an accessor value for generic columns.
    pub fn from_value(value: &Value, column_type: ColumnType) -> Self {
        match (value, column_type) {
            (Value::Null, _) => CellContent::Placeholder,
            (Value::Bool(b), _) => CellContent::Checkmark(*b),
            (Value::DateTime(at), _) => CellContent::Text(format::date(*at)),
            (Value::String(s), ColumnType::Date) => match parse_time(s) {
                Some(at) => CellContent::Text(format::date(at)),
                None => CellContent::Text(s.clone()),
            },
            (other, ColumnType::Number) => match SortKey::from_value(other, ColumnType::Number).as_f64() {
                Some(n) => CellContent::Text(format::number(n)),
                None => CellContent::Text(other.display_text()),
            },
            (Value::List(items), _) if items.is_empty() => CellContent::Placeholder,
            (other, _) => CellContent::Text(other.display_text()),
        }
    }

    /// Builds a token stack showing at most `limit` symbols.
    pub fn token_stack<S: AsRef<str>>(symbols: &[S], limit: usize) -> Self {
        CellContent::TokenStack {
            symbols: symbols.iter().take(limit).map(|s| s.as_ref().to_string()).collect(),
            overflow: symbols.len().saturating_sub(limit),
        }
    }

    /// Single-line text form, as drawn by the text renderer.
    pub fn plain_text(&self) -> String {
        match self {
            CellContent::Text(s) | CellContent::Muted(s) => s.clone(),
            CellContent::Badge(s) => format!("[{s}]"),
            CellContent::Identity { name, address, .. } => match name {
                Some(name) => format!("{name} ({address})"),
                None => address.clone(),
            },
            CellContent::Checkmark(true) => "✓".to_string(),
            CellContent::Checkmark(false) => String::new(),
            CellContent::TokenStack { symbols, overflow } => {
                let mut text = symbols.join(" ");
                if *overflow > 0 {
                    text.push_str(&format!(" +{overflow}"));
                }
                text
            }
            CellContent::Activity { summary, when } => format!("{summary} · {when}"),
            CellContent::Lines(lines) => lines.iter().map(CellContent::plain_text).collect::<Vec<_>>().join(" / "),
            CellContent::Skeleton => "…".to_string(),
            CellContent::Placeholder => Self::PLACEHOLDER.to_string(),
            CellContent::Blank => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_stack_overflow() {
        let stack = CellContent::token_stack(&["ETH", "USDC", "OP", "ARB", "DAI"], 3);
        assert_eq!(stack.plain_text(), "ETH USDC OP +2");
    }

    #[test]
    fn test_from_value() {
        assert_eq!(CellContent::from_value(&Value::Null, ColumnType::String), CellContent::Placeholder);
        assert_eq!(
            CellContent::from_value(&Value::from(12500i64), ColumnType::Number),
            CellContent::Text("12,500".to_string())
        );
        assert_eq!(
            CellContent::from_value(&Value::from("2024-02-01"), ColumnType::Date),
            CellContent::Text("01/02/2024".to_string())
        );
    }

    #[test]
    fn test_identity_text() {
        let cell = CellContent::Identity {
            name: Some("Alice".into()),
            address: "0x1234...abcd".into(),
            avatar: None,
        };
        assert_eq!(cell.plain_text(), "Alice (0x1234...abcd)");
    }
}
