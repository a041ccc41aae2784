//! Column filters

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use super::SortKey;
use crate::column::ColumnType;
use crate::error::FilterError;
use crate::model::Value;

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl FilterOperator {
    /// Operators a column of the given type accepts.
    pub fn for_type(column_type: ColumnType) -> &'static [FilterOperator] {
        use FilterOperator::*;
        match column_type {
            ColumnType::String => &[Equals, NotEquals, Contains, StartsWith, EndsWith],
            ColumnType::Number | ColumnType::Date => {
                &[Equals, NotEquals, GreaterThan, LessThan, GreaterOrEqual, LessOrEqual]
            }
            ColumnType::Boolean => &[Equals, NotEquals],
            ColumnType::Array => &[Contains],
            ColumnType::Object | ColumnType::Component => &[],
        }
    }

    pub fn supports(&self, column_type: ColumnType) -> bool {
        Self::for_type(column_type).contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "notEquals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::GreaterOrEqual => "greaterOrEqual",
            FilterOperator::LessOrEqual => "lessOrEqual",
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    /// Accepts the camelCase names plus the short forms `eq`, `ne`, `gt`,
    /// `lt`, `gte`/`ge` and `lte`/`le`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "eq" | "equals" => FilterOperator::Equals,
            "ne" | "notequals" => FilterOperator::NotEquals,
            "contains" => FilterOperator::Contains,
            "startswith" => FilterOperator::StartsWith,
            "endswith" => FilterOperator::EndsWith,
            "gt" | "greaterthan" => FilterOperator::GreaterThan,
            "lt" | "lessthan" => FilterOperator::LessThan,
            "gte" | "ge" | "greaterorequal" => FilterOperator::GreaterOrEqual,
            "lte" | "le" | "lessorequal" => FilterOperator::LessOrEqual,
            _ => return Err(FilterError::UnknownOperator(s.to_string())),
        };
        Ok(op)
    }
}

/// A predicate on one column. Filters on a grid are ANDed.
///
/// # Example
///
/// ```
/// use smart_tables::column::ColumnType;
/// use smart_tables::model::Value;
/// use smart_tables::query::Filter;
///
/// let filter = Filter::gt("value", 5i64);
/// assert!(filter.matches(&Value::from(10i64), ColumnType::Number));
///
/// let filter = Filter::contains("name", "LIC");
/// assert!(filter.matches(&Value::from("Alice"), ColumnType::String));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Equals, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::NotEquals, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::GreaterOrEqual, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::LessThan, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::LessOrEqual, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Contains, Value::String(value.into()))
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::StartsWith, Value::String(value.into()))
    }

    pub fn ends_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::EndsWith, Value::String(value.into()))
    }

    /// Parses `FIELD:OP:VALUE`. The value may itself contain colons.
    pub fn parse_expression(expr: &str) -> Result<Self, FilterError> {
        let mut parts = expr.splitn(3, ':');
        let (Some(field), Some(op), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(FilterError::InvalidExpression(expr.to_string()));
        };
        if field.is_empty() {
            return Err(FilterError::InvalidExpression(expr.to_string()));
        }
        Ok(Self::new(field, op.parse()?, Value::parse_literal(value)))
    }

    /// Checks that the operator is valid for the column type.
    pub fn validate(&self, column_type: ColumnType) -> Result<(), FilterError> {
        if self.operator.supports(column_type) {
            Ok(())
        } else {
            Err(FilterError::UnsupportedOperator {
                field: self.field.clone(),
                operator: self.operator,
                column_type,
            })
        }
    }

    /// Tests a cell value. String comparisons ignore case.
    pub fn matches(&self, cell: &Value, column_type: ColumnType) -> bool {
        match column_type {
            ColumnType::String => self.matches_text(cell),
            ColumnType::Number | ColumnType::Date => self.matches_ordered(cell, column_type),
            ColumnType::Boolean => self.matches_bool(cell),
            ColumnType::Array => self.matches_list(cell),
            ColumnType::Object | ColumnType::Component => false,
        }
    }

    fn matches_text(&self, cell: &Value) -> bool {
        let haystack = cell.display_text().to_lowercase();
        let needle = self.value.display_text().to_lowercase();
        match self.operator {
            FilterOperator::Equals => haystack == needle,
            FilterOperator::NotEquals => haystack != needle,
            FilterOperator::Contains => haystack.contains(&needle),
            FilterOperator::StartsWith => haystack.starts_with(&needle),
            FilterOperator::EndsWith => haystack.ends_with(&needle),
            _ => false,
        }
    }

    fn matches_ordered(&self, cell: &Value, column_type: ColumnType) -> bool {
        let lhs = SortKey::from_value(cell, column_type);
        let rhs = SortKey::from_value(&self.value, column_type);
        if lhs.is_null() || rhs.is_null() {
            return self.operator == FilterOperator::NotEquals;
        }
        match self.operator {
            FilterOperator::Equals => lhs == rhs,
            FilterOperator::NotEquals => lhs != rhs,
            FilterOperator::GreaterThan => lhs > rhs,
            FilterOperator::LessThan => lhs < rhs,
            FilterOperator::GreaterOrEqual => lhs >= rhs,
            FilterOperator::LessOrEqual => lhs <= rhs,
            _ => false,
        }
    }

    fn matches_bool(&self, cell: &Value) -> bool {
        let wanted = match &self.value {
            Value::Bool(b) => Some(*b),
            Value::Int(n) => Some(*n != 0),
            Value::String(s) => s.trim().parse::<bool>().ok(),
            _ => None,
        };
        let (Some(actual), Some(wanted)) = (cell.as_bool(), wanted) else {
            return self.operator == FilterOperator::NotEquals;
        };
        match self.operator {
            FilterOperator::Equals => actual == wanted,
            FilterOperator::NotEquals => actual != wanted,
            _ => false,
        }
    }

    fn matches_list(&self, cell: &Value) -> bool {
        if self.operator != FilterOperator::Contains {
            return false;
        }
        let needle = self.value.display_text().to_lowercase();
        let holds = |value: &Value| value.display_text().to_lowercase().contains(&needle);
        match cell {
            Value::List(items) => items.iter().any(holds),
            Value::Null => false,
            other => holds(other),
        }
    }
}
