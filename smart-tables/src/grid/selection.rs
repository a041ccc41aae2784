//! Row selection

use std::collections::BTreeMap;

/// Selected rows keyed by row id.
///
/// Keys are row ids rather than positions, so selection survives paging,
/// sorting and filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    rows: BTreeMap<String, bool>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.rows.get(id).copied().unwrap_or(false)
    }

    /// Flips one row. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let selected = !self.is_selected(id);
        self.rows.insert(id.to_string(), selected);
        selected
    }

    /// Sets one row. Returns `true` if that changed anything.
    pub fn set(&mut self, id: &str, selected: bool) -> bool {
        let before = self.is_selected(id);
        self.rows.insert(id.to_string(), selected);
        before != selected
    }

    /// Sets every listed row. Returns `true` if any changed.
    pub fn set_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>, selected: bool) -> bool {
        let mut changed = false;
        for id in ids {
            changed |= self.set(id, selected);
        }
        changed
    }

    /// `true` if every listed row is selected and the list is not empty.
    pub fn all_selected<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for id in ids {
            if !self.is_selected(id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Deselects everything. Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_selection = self.count() > 0;
        self.rows.clear();
        had_selection
    }

    pub fn count(&self) -> usize {
        self.rows.values().filter(|selected| **selected).count()
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.as_str())
    }

    /// The full id → selected map, as handed to selection callbacks.
    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_count() {
        let mut selection = SelectionState::new();
        assert!(selection.toggle("a"));
        assert!(selection.toggle("b"));
        assert!(!selection.toggle("a"));
        assert_eq!(selection.count(), 1);
        assert_eq!(selection.selected_ids().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_set_all_reports_change() {
        let mut selection = SelectionState::new();
        assert!(selection.set_all(["a", "b"], true));
        assert!(!selection.set_all(["a", "b"], true));
        assert!(selection.all_selected(["a", "b"]));
        assert!(!selection.all_selected(std::iter::empty()));
    }
}
