//! Derived, render-ready grid state

use super::PaginationMode;
use crate::cell::CellContent;
use crate::query::SortDirection;

/// Which of the grid's display states applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridStatus {
    /// The caller is loading and there are no rows yet.
    Loading,
    /// There are no rows at all.
    Empty,
    /// Rows exist but none pass the search and filters.
    NoMatches,
    Rows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    /// Width in pixels.
    pub width: u16,
    pub frozen: bool,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone)]
pub struct ViewRow<'a, R> {
    /// Position in the filtered, sorted order.
    pub position: usize,
    pub id: Option<String>,
    pub row: &'a R,
    pub selected: bool,
    /// One entry per visible column, in header order.
    pub cells: Vec<CellContent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub mode: PaginationMode,
    pub current_page: usize,
    pub total_pages: usize,
    pub start_index: usize,
    /// Rows held by the grid.
    pub total_rows: usize,
    /// Rows passing search and filters.
    pub matched_rows: usize,
    pub shown_rows: usize,
    pub has_more: bool,
    pub loading_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    pub enabled: bool,
    pub selected: usize,
    /// Every row passing search and filters is selected.
    pub all_visible_selected: bool,
}

/// Everything a renderer needs to draw the grid once.
#[derive(Debug, Clone)]
pub struct GridView<'a, R> {
    pub status: GridStatus,
    pub message: Option<StatusMessage>,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<ViewRow<'a, R>>,
    /// One entry per header when the footer is enabled.
    pub footer: Option<Vec<String>>,
    pub page: PageInfo,
    pub selection: SelectionSummary,
}
