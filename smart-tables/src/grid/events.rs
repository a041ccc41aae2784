//! Grid events and caller callbacks

use std::collections::BTreeMap;

use super::ColumnLayout;
use crate::query::Filter;
use crate::query::LoadMoreRequest;
use crate::query::SortState;

/// A user interaction, dispatched through [`Grid::handle`](super::Grid::handle).
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Header click on the column with this key.
    HeaderClicked(String),
    SortChanged(SortState),
    FilterAdded(Filter),
    /// Removes the filter at this index.
    FilterRemoved(usize),
    FiltersCleared,
    SearchChanged(String),
    PageChanged(usize),
    /// One of [`PAGE_SIZE_OPTIONS`](super::PAGE_SIZE_OPTIONS) or any other
    /// positive size.
    PageSizeChanged(usize),
    LoadMore,
    /// The caller finished a load-more request.
    LoadFinished { has_more: bool },
    RowToggled(String),
    /// Selects or deselects every row passing search and filters.
    AllVisibleToggled(bool),
    SelectionCleared,
    /// Click on the row at this position in the filtered order.
    RowClicked(usize),
    ColumnResized { key: String, width: u16 },
    ColumnMoved { key: String, to: usize },
    ColumnVisibilityChanged { key: String, visible: bool },
}

pub type RowClickFn<R> = Box<dyn FnMut(&R)>;
pub type LoadMoreFn = Box<dyn FnMut(LoadMoreRequest)>;
pub type SelectionChangeFn = Box<dyn FnMut(&BTreeMap<String, bool>)>;
pub type SortChangeFn = Box<dyn FnMut(&SortState)>;
pub type LayoutChangeFn = Box<dyn FnMut(&ColumnLayout)>;

pub(crate) struct GridCallbacks<R> {
    pub on_row_click: Option<RowClickFn<R>>,
    pub on_load_more: Option<LoadMoreFn>,
    pub on_selection_change: Option<SelectionChangeFn>,
    pub on_sort_change: Option<SortChangeFn>,
    pub on_layout_change: Option<LayoutChangeFn>,
}

impl<R> Default for GridCallbacks<R> {
    fn default() -> Self {
        Self {
            on_row_click: None,
            on_load_more: None,
            on_selection_change: None,
            on_sort_change: None,
            on_layout_change: None,
        }
    }
}
