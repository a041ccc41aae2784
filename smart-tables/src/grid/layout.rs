//! Column order, widths and visibility

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::column::ColumnDescriptor;

/// User-adjustable column layout.
///
/// Serialisable so callers can persist it and pass it back through
/// [`GridConfig::with_layout`](super::GridConfig::with_layout). Frozen
/// columns always lead the order and can never be hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnLayout {
    pub order: Vec<String>,
    pub widths: BTreeMap<String, u16>,
    pub hidden: BTreeSet<String>,
}

impl ColumnLayout {
    /// Reconciles the layout with a (possibly new) column list.
    ///
    /// Known keys keep their position, new keys are appended in column
    /// order, and entries for removed columns are dropped.
    pub fn sync<R>(&mut self, columns: &[ColumnDescriptor<R>]) {
        let exists = |key: &str| columns.iter().any(|c| c.key == key);
        self.order.retain(|key| exists(key));
        for column in columns {
            if !self.order.contains(&column.key) {
                self.order.push(column.key.clone());
            }
        }
        let is_frozen = |key: &str| columns.iter().any(|c| c.key == key && c.frozen);
        let (frozen, scrollable): (Vec<String>, Vec<String>) = self.order.drain(..).partition(|key| is_frozen(key));
        self.order = frozen.into_iter().chain(scrollable).collect();

        self.widths.retain(|key, _| exists(key));
        self.hidden.retain(|key| exists(key) && !is_frozen(key));
    }

    /// Effective width of a column, never below its minimum.
    pub fn width<R>(&self, column: &ColumnDescriptor<R>) -> u16 {
        self.widths
            .get(&column.key)
            .copied()
            .unwrap_or(column.size)
            .max(column.min_size)
    }

    /// Sets a width, clamped to the column's minimum. Returns the width
    /// applied.
    pub fn resize<R>(&mut self, column: &ColumnDescriptor<R>, width: u16) -> u16 {
        let width = width.max(column.min_size);
        self.widths.insert(column.key.clone(), width);
        width
    }

    /// Moves a scrollable column to `to` in the display order.
    ///
    /// The target is clamped behind the frozen columns. Frozen columns
    /// themselves cannot move. Returns `true` if the order changed.
    pub fn move_column<R>(&mut self, columns: &[ColumnDescriptor<R>], key: &str, to: usize) -> bool {
        let is_frozen = |key: &str| columns.iter().any(|c| c.key == key && c.frozen);
        if is_frozen(key) {
            return false;
        }
        let Some(from) = self.order.iter().position(|k| k == key) else {
            return false;
        };
        let moved = self.order.remove(from);
        let frozen_count = self.order.iter().filter(|k| is_frozen(k)).count();
        let to = to.clamp(frozen_count, self.order.len());
        self.order.insert(to, moved);
        from != to
    }

    /// Shows or hides a column. Frozen columns cannot be hidden. Returns
    /// `true` if visibility changed.
    pub fn set_visible<R>(&mut self, columns: &[ColumnDescriptor<R>], key: &str, visible: bool) -> bool {
        let Some(column) = columns.iter().find(|c| c.key == key) else {
            return false;
        };
        if visible {
            self.hidden.remove(key)
        } else if column.frozen {
            false
        } else {
            self.hidden.insert(key.to_string())
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        !self.hidden.contains(key)
    }

    /// Indices into `columns` of the visible columns, in display order.
    pub fn visible_indices<R>(&self, columns: &[ColumnDescriptor<R>]) -> Vec<usize> {
        self.order
            .iter()
            .filter(|key| self.is_visible(key))
            .filter_map(|key| columns.iter().position(|c| &c.key == key))
            .collect()
    }
}
