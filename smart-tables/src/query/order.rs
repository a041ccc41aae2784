//! Sort state and stable ordering

use serde::Deserialize;
use serde::Serialize;

use super::SortKey;
use crate::column::ColumnDescriptor;
use crate::column::ColumnType;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9), nulls first.
    Asc,
    /// Descending order (Z-A, 9-0), nulls last.
    Desc,
}

impl SortDirection {
    /// The first direction a header click applies: numbers and dates start
    /// with the largest value, everything else alphabetically.
    pub fn first_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Number | ColumnType::Date => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The grid's single-column sort.
///
/// Key and direction are either both set or both unset.
///
/// # Example
///
/// ```
/// use smart_tables::column::ColumnType;
/// use smart_tables::query::SortDirection;
/// use smart_tables::query::SortState;
///
/// let mut sort = SortState::unsorted();
/// sort.cycle("value", ColumnType::Number);
/// assert_eq!(sort.direction(), Some(SortDirection::Desc));
/// sort.cycle("value", ColumnType::Number);
/// assert_eq!(sort.direction(), Some(SortDirection::Asc));
/// sort.cycle("value", ColumnType::Number);
/// assert!(!sort.is_sorted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<ActiveSort>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveSort {
    key: String,
    direction: SortDirection,
}

impl SortState {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::by(key, SortDirection::Asc)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::by(key, SortDirection::Desc)
    }

    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            active: Some(ActiveSort {
                key: key.into(),
                direction,
            }),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.key.as_str())
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.active.as_ref().map(|a| a.direction)
    }

    pub fn is_sorted(&self) -> bool {
        self.active.is_some()
    }

    /// Direction for `key` if it is the sorted column.
    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        self.active
            .as_ref()
            .filter(|a| a.key == key)
            .map(|a| a.direction)
    }

    /// Advances the header-click cycle for `key`:
    /// unsorted, first direction, opposite direction, unsorted.
    ///
    /// Clicking a different column starts its cycle from the beginning.
    pub fn cycle(&mut self, key: &str, column_type: ColumnType) {
        let first = SortDirection::first_for(column_type);
        self.active = match self.direction_for(key) {
            None => Some(ActiveSort {
                key: key.to_string(),
                direction: first,
            }),
            Some(direction) if direction == first => Some(ActiveSort {
                key: key.to_string(),
                direction: first.reverse(),
            }),
            Some(_) => None,
        };
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Stably sorts `indices` into `rows` by `column`.
///
/// Keys are computed once per row. Equal keys keep their relative order in
/// both directions, so sorting an already sorted slice is a no-op.
pub fn sort_indices<R>(rows: &[R], indices: &mut Vec<usize>, column: &ColumnDescriptor<R>, direction: SortDirection) {
    let mut keyed: Vec<(SortKey, usize)> = indices
        .iter()
        .map(|&index| (SortKey::from_value(&column.value(&rows[index]), column.column_type), index))
        .collect();
    match direction {
        SortDirection::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortDirection::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }
    indices.clear();
    indices.extend(keyed.into_iter().map(|(_, index)| index));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::model::Value;

    fn value_column() -> ColumnDescriptor<Record> {
        ColumnDescriptor::text("value", "Value", ColumnType::Number, |row: &Record| {
            row.get("value").cloned().unwrap_or_default()
        })
    }

    fn rows() -> Vec<Record> {
        vec![
            Record::new("a").set("value", 3i64),
            Record::new("b").set("value", Value::Null),
            Record::new("c").set("value", 1i64),
            Record::new("d").set("value", 3i64),
        ]
    }

    #[test]
    fn test_string_cycle_starts_ascending() {
        let mut sort = SortState::unsorted();
        sort.cycle("name", ColumnType::String);
        assert_eq!(sort, SortState::asc("name"));
        sort.cycle("name", ColumnType::String);
        assert_eq!(sort, SortState::desc("name"));
        sort.cycle("name", ColumnType::String);
        assert_eq!(sort, SortState::unsorted());
    }

    #[test]
    fn test_switching_column_restarts_cycle() {
        let mut sort = SortState::desc("value");
        sort.cycle("name", ColumnType::String);
        assert_eq!(sort, SortState::asc("name"));
    }

    #[test]
    fn test_sort_nulls_and_ties() {
        let rows = rows();
        let column = value_column();

        let mut asc: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut asc, &column, SortDirection::Asc);
        assert_eq!(asc, vec![1, 2, 0, 3]);

        let mut desc: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut desc, &column, SortDirection::Desc);
        assert_eq!(desc, vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let rows = rows();
        let column = value_column();
        let mut once: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut once, &column, SortDirection::Desc);
        let mut twice = once.clone();
        sort_indices(&rows, &mut twice, &column, SortDirection::Desc);
        assert_eq!(once, twice);
    }
}
