//! Sortable, filterable, paginated grid
//!
//! A [`Grid`] owns rows, columns and all derived UI state. Every mutation
//! re-runs the pipeline (search, filters, stable sort) over the full row
//! list and keeps the result as an index list; the rows themselves are never
//! reordered. Pagination or the load-more window then picks the visible
//! slice when a [`GridView`] is built.

mod config;
mod events;
mod footer;
mod layout;
mod selection;
mod view;

pub use config::*;
pub use events::*;
pub use footer::*;
pub use layout::*;
pub use selection::*;
pub use view::*;

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use log::debug;

use crate::cell::CellContent;
use crate::cell::RenderContext;
use crate::column::ColumnDescriptor;
use crate::column::ColumnType;
use crate::error::ConfigurationError;
use crate::error::FilterError;
use crate::error::GridError;
use crate::query::Filter;
use crate::query::LoadMoreCursor;
use crate::query::LoadMoreOutcome;
use crate::query::LoadMoreRequest;
use crate::query::Pagination;
use crate::query::SearchQuery;
use crate::query::SortDirection;
use crate::query::SortState;
use crate::query::sort_indices;

pub type RowIdFn<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;
pub type SearchTextFn<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;
/// Caller-supplied footer text by column key. `None` falls back to the
/// column's built-in aggregation.
pub type FooterFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Checks the structural rules every column list must satisfy.
pub fn validate_columns<R>(columns: &[ColumnDescriptor<R>]) -> Result<(), ConfigurationError> {
    if columns.is_empty() {
        return Err(ConfigurationError::NoColumns);
    }
    let mut seen = HashSet::new();
    let mut scrollable_seen = false;
    for column in columns {
        if !seen.insert(column.key.as_str()) {
            return Err(ConfigurationError::DuplicateColumn(column.key.clone()));
        }
        if column.min_size > column.size {
            return Err(ConfigurationError::InvalidColumnSize {
                key: column.key.clone(),
                size: column.size,
                min_size: column.min_size,
            });
        }
        if column.frozen && scrollable_seen {
            return Err(ConfigurationError::FrozenNotLeading(column.key.clone()));
        }
        scrollable_seen |= !column.frozen;
    }
    Ok(())
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a [`Grid`], validating the configuration up front.
///
/// # Example
///
/// ```
/// use smart_tables::column::ColumnDescriptor;
/// use smart_tables::column::ColumnType;
/// use smart_tables::grid::Grid;
/// use smart_tables::grid::GridConfig;
/// use smart_tables::model::Record;
/// use smart_tables::model::Value;
///
/// let name = ColumnDescriptor::text("name", "Name", ColumnType::String, |r: &Record| {
///     r.get("name").cloned().unwrap_or(Value::Null)
/// })
/// .frozen();
///
/// let grid = Grid::builder(vec![name])
///     .config(GridConfig::default().with_row_selection(true))
///     .row_id(|r: &Record| r.id().to_string())
///     .rows(vec![Record::new("1").set("name", "Alice")])
///     .build()
///     .unwrap();
/// assert_eq!(grid.matched_len(), 1);
/// ```
pub struct GridBuilder<R> {
    columns: Vec<ColumnDescriptor<R>>,
    rows: Vec<R>,
    config: GridConfig,
    row_id: Option<RowIdFn<R>>,
    search_text: Option<SearchTextFn<R>>,
    footer_value: Option<FooterFn>,
    callbacks: GridCallbacks<R>,
}

impl<R> GridBuilder<R> {
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rows(mut self, rows: Vec<R>) -> Self {
        self.rows = rows;
        self
    }

    /// Stable id per row. Required for row selection.
    pub fn row_id(mut self, f: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.row_id = Some(Arc::new(f));
        self
    }

    /// Text the toolbar search matches against. Defaults to the values of
    /// all string columns.
    pub fn search_text(mut self, f: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.search_text = Some(Arc::new(f));
        self
    }

    pub fn footer_value(mut self, f: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.footer_value = Some(Arc::new(f));
        self
    }

    pub fn on_row_click(mut self, f: impl FnMut(&R) + 'static) -> Self {
        self.callbacks.on_row_click = Some(Box::new(f));
        self
    }

    pub fn on_load_more(mut self, f: impl FnMut(LoadMoreRequest) + 'static) -> Self {
        self.callbacks.on_load_more = Some(Box::new(f));
        self
    }

    pub fn on_selection_change(mut self, f: impl FnMut(&BTreeMap<String, bool>) + 'static) -> Self {
        self.callbacks.on_selection_change = Some(Box::new(f));
        self
    }

    pub fn on_sort_change(mut self, f: impl FnMut(&SortState) + 'static) -> Self {
        self.callbacks.on_sort_change = Some(Box::new(f));
        self
    }

    pub fn on_layout_change(mut self, f: impl FnMut(&ColumnLayout) + 'static) -> Self {
        self.callbacks.on_layout_change = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<Grid<R>, ConfigurationError> {
        self.config.validate()?;
        validate_columns(&self.columns)?;
        if self.config.enable_row_selection && self.row_id.is_none() {
            return Err(ConfigurationError::MissingRowId);
        }

        let sort = match &self.config.default_sort {
            Some(key) => {
                let column = self
                    .columns
                    .iter()
                    .find(|c| &c.key == key && c.sortable)
                    .ok_or_else(|| ConfigurationError::InvalidSortColumn(key.clone()))?;
                let direction = self
                    .config
                    .default_sort_direction
                    .unwrap_or_else(|| SortDirection::first_for(column.column_type));
                SortState::by(key.clone(), direction)
            }
            None => SortState::unsorted(),
        };

        let mut layout = self.config.layout.clone().unwrap_or_default();
        layout.sync(&self.columns);

        let mut grid = Grid {
            pagination: Pagination::new(self.config.page_size),
            load_more: LoadMoreCursor::new(self.config.page_size, self.config.has_more),
            config: self.config,
            columns: self.columns,
            rows: self.rows,
            loading: false,
            sort,
            filters: Vec::new(),
            search: SearchQuery::default(),
            selection: SelectionState::new(),
            layout,
            row_id: self.row_id,
            search_text: self.search_text,
            footer_value: self.footer_value,
            callbacks: self.callbacks,
            matched: Vec::new(),
        };
        grid.refresh();
        Ok(grid)
    }
}

// =============================================================================
// Grid
// =============================================================================

pub struct Grid<R> {
    config: GridConfig,
    columns: Vec<ColumnDescriptor<R>>,
    rows: Vec<R>,
    loading: bool,
    sort: SortState,
    filters: Vec<Filter>,
    search: SearchQuery,
    pagination: Pagination,
    load_more: LoadMoreCursor,
    selection: SelectionState,
    layout: ColumnLayout,
    row_id: Option<RowIdFn<R>>,
    search_text: Option<SearchTextFn<R>>,
    footer_value: Option<FooterFn>,
    callbacks: GridCallbacks<R>,
    /// Indices into `rows` passing search and filters, in sorted order.
    matched: Vec<usize>,
}

impl<R> Grid<R> {
    pub fn builder(columns: Vec<ColumnDescriptor<R>>) -> GridBuilder<R> {
        GridBuilder {
            columns,
            rows: Vec::new(),
            config: GridConfig::default(),
            row_id: None,
            search_text: None,
            footer_value: None,
            callbacks: GridCallbacks::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn search(&self) -> &str {
        self.search.text()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of rows passing search and filters.
    pub fn matched_len(&self) -> usize {
        self.matched.len()
    }

    /// Rows passing search and filters, in display order, across all pages.
    pub fn matched_rows(&self) -> impl Iterator<Item = &R> {
        self.matched.iter().map(|&i| &self.rows[i])
    }

    /// Rows on the current page or inside the load-more window.
    pub fn visible_rows(&self) -> impl Iterator<Item = &R> {
        self.matched[self.visible_range()].iter().map(|&i| &self.rows[i])
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page(self.matched.len())
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.matched.len())
    }

    pub fn row_id_of(&self, row: &R) -> Option<String> {
        self.row_id.as_ref().map(|f| f(row))
    }

    pub fn status(&self) -> GridStatus {
        if self.rows.is_empty() {
            if self.loading { GridStatus::Loading } else { GridStatus::Empty }
        } else if self.matched.is_empty() {
            GridStatus::NoMatches
        } else {
            GridStatus::Rows
        }
    }

    fn visible_range(&self) -> Range<usize> {
        let total = self.matched.len();
        match self.config.pagination {
            PaginationMode::Pages => self.pagination.range(total),
            PaginationMode::LoadMore => 0..self.load_more.visible_len(total),
        }
    }

    fn searchable_text(&self, row: &R) -> String {
        match &self.search_text {
            Some(f) => f(row),
            None => self
                .columns
                .iter()
                .filter(|c| c.column_type == ColumnType::String)
                .map(|c| c.value(row).display_text())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Re-derives the matched index list.
    fn refresh(&mut self) {
        let mut indices: Vec<usize> = (0..self.rows.len()).collect();

        if !self.search.is_empty() {
            let texts: Vec<String> = self.rows.iter().map(|row| self.searchable_text(row)).collect();
            indices = self
                .search
                .filter(texts.iter().enumerate().map(|(i, text)| (i, text.as_str())));
        }

        for filter in &self.filters {
            if let Some(column) = self.columns.iter().find(|c| c.key == filter.field) {
                indices.retain(|&i| filter.matches(&column.value(&self.rows[i]), column.column_type));
            }
        }

        if let (Some(key), Some(direction)) = (self.sort.key(), self.sort.direction())
            && let Some(column) = self.columns.iter().find(|c| c.key == key)
        {
            sort_indices(&self.rows, &mut indices, column, direction);
        }

        debug!(
            "Grid refreshed: {} of {} rows match ({} filters, search {:?}, sort {:?})",
            indices.len(),
            self.rows.len(),
            self.filters.len(),
            self.search.text(),
            self.sort
        );
        self.matched = indices;
    }

    // -------------------------------------------------------------------------
    // Rows and columns
    // -------------------------------------------------------------------------

    /// Replaces the rows. Selection, sort, filters and page are kept.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.refresh();
    }

    /// Appends rows delivered for a load-more request and completes it.
    pub fn append_rows(&mut self, rows: impl IntoIterator<Item = R>, has_more: bool) {
        self.rows.extend(rows);
        self.load_more.finish_loading(has_more);
        self.refresh();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replaces the columns, keeping layout, filters and sort for keys that
    /// still exist.
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor<R>>) -> Result<(), ConfigurationError> {
        validate_columns(&columns)?;
        self.columns = columns;
        self.layout.sync(&self.columns);
        let columns = &self.columns;
        self.filters.retain(|f| columns.iter().any(|c| c.key == f.field));
        if let Some(key) = self.sort.key()
            && !columns.iter().any(|c| c.key == key && c.sortable)
        {
            self.sort.clear();
        }
        self.refresh();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Advances the sort cycle for a header click. Returns `false` when
    /// sorting is disabled or the column cannot be sorted.
    pub fn click_header(&mut self, key: &str) -> bool {
        if !self.config.enable_sorting {
            return false;
        }
        let Some(column) = self.columns.iter().find(|c| c.key == key && c.sortable) else {
            return false;
        };
        let column_type = column.column_type;
        self.sort.cycle(key, column_type);
        self.sort_changed();
        true
    }

    pub fn set_sort(&mut self, sort: SortState) -> Result<(), GridError> {
        if let Some(key) = sort.key()
            && !self.columns.iter().any(|c| c.key == key && c.sortable)
        {
            return Err(ConfigurationError::InvalidSortColumn(key.to_string()).into());
        }
        self.sort = sort;
        self.sort_changed();
        Ok(())
    }

    fn sort_changed(&mut self) {
        self.refresh();
        if let Some(callback) = &mut self.callbacks.on_sort_change {
            callback(&self.sort);
        }
    }

    // -------------------------------------------------------------------------
    // Filtering and search
    // -------------------------------------------------------------------------

    pub fn add_filter(&mut self, filter: Filter) -> Result<(), FilterError> {
        if !self.config.enable_filtering {
            return Err(FilterError::Disabled);
        }
        let column = self
            .column(&filter.field)
            .ok_or_else(|| FilterError::UnknownField(filter.field.clone()))?;
        filter.validate(column.column_type)?;
        self.filters.push(filter);
        self.refresh();
        Ok(())
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<Filter> {
        if index >= self.filters.len() {
            return None;
        }
        let removed = self.filters.remove(index);
        self.refresh();
        Some(removed)
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.refresh();
        }
    }

    /// Sets the toolbar search. Ignored when search is disabled.
    pub fn set_search(&mut self, text: &str) {
        if !self.config.enable_search || text.trim() == self.search.text() {
            return;
        }
        self.search = SearchQuery::new(text);
        self.refresh();
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    /// Moves to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.pagination.set_page(page, self.matched.len())
    }

    /// Changes the page size, returning to page 1 and shrinking the
    /// load-more window to a single page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ConfigurationError> {
        if page_size == 0 {
            return Err(ConfigurationError::InvalidPageSize);
        }
        if page_size == self.config.page_size {
            return Ok(());
        }
        debug!("Page size {} -> {}", self.config.page_size, page_size);
        self.config.page_size = page_size;
        self.pagination.set_items_per_page(page_size);
        self.load_more.set_page_size(page_size);
        Ok(())
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.current_page() + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.current_page().saturating_sub(1))
    }

    /// Grows the load-more window, asking the caller for data when the
    /// resident rows are exhausted.
    pub fn load_more(&mut self) -> LoadMoreOutcome {
        if self.config.pagination != PaginationMode::LoadMore {
            return LoadMoreOutcome::Exhausted;
        }
        let outcome = self.load_more.request(self.matched.len());
        if let LoadMoreOutcome::Requested(request) = outcome {
            debug!("Requesting page {} ({} rows)", request.page, request.page_size);
            if let Some(callback) = &mut self.callbacks.on_load_more {
                callback(request);
            }
        }
        outcome
    }

    /// Completes a load-more request whose rows arrived through
    /// [`set_rows`](Self::set_rows).
    pub fn finish_loading(&mut self, has_more: bool) {
        self.load_more.finish_loading(has_more);
    }

    /// Abandons a load-more request that failed.
    pub fn abort_loading(&mut self) {
        self.load_more.abort_loading();
    }

    /// Records whether the caller can deliver rows past the resident ones.
    pub fn set_has_more(&mut self, has_more: bool) {
        self.config.has_more = has_more;
        self.load_more.set_has_more(has_more);
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Toggles one row. Returns the new state, or `false` when selection is
    /// disabled.
    pub fn toggle_row(&mut self, id: &str) -> Result<bool, GridError> {
        let Some(row_id) = self.row_id.as_ref().filter(|_| self.config.enable_row_selection) else {
            return Ok(false);
        };
        if !self.rows.iter().any(|row| row_id(row) == id) {
            return Err(GridError::UnknownRow(id.to_string()));
        }
        let selected = self.selection.toggle(id);
        self.selection_changed();
        Ok(selected)
    }

    /// Selects or deselects every row passing search and filters, on every
    /// page. Rows hidden by filters are untouched.
    pub fn set_all_visible_selected(&mut self, selected: bool) -> bool {
        let Some(row_id) = self.row_id.as_ref().filter(|_| self.config.enable_row_selection) else {
            return false;
        };
        let ids: Vec<String> = self.matched.iter().map(|&i| row_id(&self.rows[i])).collect();
        let changed = self.selection.set_all(ids.iter().map(String::as_str), selected);
        if changed {
            self.selection_changed();
        }
        changed
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.selection_changed();
        }
    }

    /// `true` when every row passing search and filters is selected.
    pub fn all_visible_selected(&self) -> bool {
        let Some(row_id) = &self.row_id else {
            return false;
        };
        let ids: Vec<String> = self.matched.iter().map(|&i| row_id(&self.rows[i])).collect();
        self.selection.all_selected(ids.iter().map(String::as_str))
    }

    fn selection_changed(&mut self) {
        if let Some(callback) = &mut self.callbacks.on_selection_change {
            callback(self.selection.as_map());
        }
    }

    /// Invokes the row-click callback for the row at `position` in the
    /// filtered order.
    pub fn click_row(&mut self, position: usize) -> Result<(), GridError> {
        let Some(&index) = self.matched.get(position) else {
            return Err(GridError::UnknownRow(position.to_string()));
        };
        if let Some(callback) = &mut self.callbacks.on_row_click {
            callback(&self.rows[index]);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    fn known_column(&self, key: &str) -> Result<&ColumnDescriptor<R>, GridError> {
        self.column(key).ok_or_else(|| GridError::UnknownColumn(key.to_string()))
    }

    /// Resizes a column, clamped to its minimum width. Returns the width in
    /// effect afterwards.
    pub fn resize_column(&mut self, key: &str, width: u16) -> Result<u16, GridError> {
        let index = self
            .columns
            .iter()
            .position(|c| c.key == key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))?;
        let column = &self.columns[index];
        if !self.config.enable_column_resizing || !column.resizable {
            return Ok(self.layout.width(column));
        }
        let applied = self.layout.resize(&self.columns[index], width);
        self.layout_changed();
        Ok(applied)
    }

    pub fn move_column(&mut self, key: &str, to: usize) -> Result<bool, GridError> {
        self.known_column(key)?;
        if !self.config.enable_column_reordering {
            return Ok(false);
        }
        let moved = self.layout.move_column(&self.columns, key, to);
        if moved {
            self.layout_changed();
        }
        Ok(moved)
    }

    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Result<bool, GridError> {
        self.known_column(key)?;
        if !self.config.enable_column_visibility {
            return Ok(false);
        }
        let changed = self.layout.set_visible(&self.columns, key, visible);
        if changed {
            self.layout_changed();
        }
        Ok(changed)
    }

    fn layout_changed(&mut self) {
        if let Some(callback) = &mut self.callbacks.on_layout_change {
            callback(&self.layout);
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Applies one user interaction.
    pub fn handle(&mut self, event: GridEvent) -> Result<(), GridError> {
        match event {
            GridEvent::HeaderClicked(key) => {
                self.click_header(&key);
            }
            GridEvent::SortChanged(sort) => self.set_sort(sort)?,
            GridEvent::FilterAdded(filter) => self.add_filter(filter)?,
            GridEvent::FilterRemoved(index) => {
                self.remove_filter(index);
            }
            GridEvent::FiltersCleared => self.clear_filters(),
            GridEvent::SearchChanged(text) => self.set_search(&text),
            GridEvent::PageChanged(page) => {
                self.set_page(page);
            }
            GridEvent::PageSizeChanged(page_size) => self.set_page_size(page_size)?,
            GridEvent::LoadMore => {
                self.load_more();
            }
            GridEvent::LoadFinished { has_more } => self.finish_loading(has_more),
            GridEvent::RowToggled(id) => {
                self.toggle_row(&id)?;
            }
            GridEvent::AllVisibleToggled(selected) => {
                self.set_all_visible_selected(selected);
            }
            GridEvent::SelectionCleared => self.clear_selection(),
            GridEvent::RowClicked(position) => self.click_row(position)?,
            GridEvent::ColumnResized { key, width } => {
                self.resize_column(&key, width)?;
            }
            GridEvent::ColumnMoved { key, to } => {
                self.move_column(&key, to)?;
            }
            GridEvent::ColumnVisibilityChanged { key, visible } => {
                self.set_column_visible(&key, visible)?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    /// Footer text per visible column, computed over the filtered rows.
    pub fn footer(&self) -> Vec<String> {
        self.layout
            .visible_indices(&self.columns)
            .into_iter()
            .map(|index| {
                let column = &self.columns[index];
                if let Some(f) = &self.footer_value
                    && let Some(text) = f(&column.key)
                {
                    return text;
                }
                match column.aggregation {
                    Some(aggregation) => {
                        let values: Vec<_> = self.matched_rows().map(|row| column.value(row)).collect();
                        aggregation.compute(&values)
                    }
                    None => String::new(),
                }
            })
            .collect()
    }

    /// Builds the render-ready view of the current page or window.
    pub fn view(&self, ctx: &RenderContext<'_>) -> GridView<'_, R> {
        let status = self.status();
        let visible = self.layout.visible_indices(&self.columns);

        let headers = visible
            .iter()
            .map(|&index| {
                let column = &self.columns[index];
                HeaderCell {
                    key: column.key.clone(),
                    label: column.header.clone(),
                    width: self.layout.width(column),
                    frozen: column.frozen,
                    sortable: column.sortable && self.config.enable_sorting,
                    sort: self.sort.direction_for(&column.key),
                }
            })
            .collect();

        let range = self.visible_range();
        let rows = self.matched[range.clone()]
            .iter()
            .enumerate()
            .map(|(offset, &index)| {
                let row = &self.rows[index];
                let id = self.row_id_of(row);
                let selected = id.as_deref().is_some_and(|id| self.selection.is_selected(id));
                let cells: Vec<CellContent> = visible.iter().map(|&c| self.columns[c].render(row, ctx)).collect();
                ViewRow {
                    position: range.start + offset,
                    id,
                    row,
                    selected,
                    cells,
                }
            })
            .collect();

        let message = match status {
            GridStatus::Loading => Some(StatusMessage {
                title: self.config.loading_message.clone(),
                description: None,
            }),
            GridStatus::Empty => Some(StatusMessage {
                title: self.config.empty_message.clone(),
                description: self.config.empty_description.clone(),
            }),
            GridStatus::NoMatches => Some(StatusMessage {
                title: self.config.no_results_message.clone(),
                description: self.config.no_results_description.clone(),
            }),
            GridStatus::Rows => None,
        };

        let total = self.matched.len();
        let page = PageInfo {
            mode: self.config.pagination,
            current_page: self.pagination.current_page(total),
            total_pages: self.pagination.total_pages(total),
            start_index: range.start,
            total_rows: self.rows.len(),
            matched_rows: total,
            shown_rows: range.len(),
            has_more: self.load_more.has_more(),
            loading_more: self.load_more.is_loading(),
        };

        GridView {
            status,
            message,
            headers,
            rows,
            footer: (self.config.show_footer && status == GridStatus::Rows).then(|| self.footer()),
            page,
            selection: SelectionSummary {
                enabled: self.config.enable_row_selection,
                selected: self.selection.count(),
                all_visible_selected: self.all_visible_selected(),
            },
        }
    }
}

impl<R> std::fmt::Debug for Grid<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("matched", &self.matched.len())
            .field("sort", &self.sort)
            .field("filters", &self.filters)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::model::Record;
    use crate::model::Value;

    fn field(key: &'static str) -> impl Fn(&Record) -> Value + Send + Sync + 'static {
        move |r: &Record| r.get(key).cloned().unwrap_or(Value::Null)
    }

    fn columns() -> Vec<ColumnDescriptor<Record>> {
        vec![
            ColumnDescriptor::text("name", "Name", ColumnType::String, field("name")).frozen(),
            ColumnDescriptor::text("score", "Score", ColumnType::Number, field("score"))
                .with_aggregation(Aggregation::Sum),
            ColumnDescriptor::text("city", "City", ColumnType::String, field("city")),
        ]
    }

    fn rows() -> Vec<Record> {
        vec![
            Record::new("1").set("name", "Alice").set("score", 30i64).set("city", "Paris"),
            Record::new("2").set("name", "Bob").set("score", 10i64).set("city", "Berlin"),
            Record::new("3").set("name", "Carol").set("score", 20i64).set("city", "Paris"),
            Record::new("4").set("name", "Dave").set("city", "Lima"),
        ]
    }

    fn grid(config: GridConfig) -> Grid<Record> {
        Grid::builder(columns())
            .config(config)
            .row_id(|r: &Record| r.id().to_string())
            .rows(rows())
            .build()
            .unwrap()
    }

    fn ids(grid: &Grid<Record>) -> Vec<String> {
        grid.matched_rows().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_build_rejects_bad_columns() {
        let err = Grid::<Record>::builder(Vec::new()).build().unwrap_err();
        assert_eq!(err, ConfigurationError::NoColumns);

        let mut dup = columns();
        dup.push(ColumnDescriptor::text("name", "Again", ColumnType::String, field("name")));
        let err = Grid::builder(dup).build().unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateColumn("name".into()));

        let mut late = columns();
        late.push(ColumnDescriptor::text("pinned", "Pinned", ColumnType::String, field("x")).frozen());
        let err = Grid::builder(late).build().unwrap_err();
        assert_eq!(err, ConfigurationError::FrozenNotLeading("pinned".into()));
    }

    #[test]
    fn test_build_requires_row_id_for_selection() {
        let err = Grid::builder(columns())
            .config(GridConfig::default().with_row_selection(true))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::MissingRowId);
    }

    #[test]
    fn test_default_sort_must_be_sortable() {
        let err = Grid::builder(columns())
            .config(GridConfig::default().with_default_sort("missing", None))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidSortColumn("missing".into()));

        let grid = grid(GridConfig::default().with_default_sort("score", None));
        assert_eq!(grid.sort().direction(), Some(SortDirection::Desc));
        assert_eq!(ids(&grid), ["1", "3", "2", "4"]);
    }

    #[test]
    fn test_header_click_cycles_and_restores_order() {
        let mut grid = grid(GridConfig::default());
        assert!(grid.click_header("name"));
        assert_eq!(ids(&grid), ["1", "2", "3", "4"]);
        grid.click_header("name");
        assert_eq!(ids(&grid), ["4", "3", "2", "1"]);
        grid.click_header("name");
        assert!(!grid.sort().is_sorted());
        assert_eq!(ids(&grid), ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_header_click_ignored_when_sorting_disabled() {
        let mut grid = grid(GridConfig::default().with_sorting(false));
        assert!(!grid.click_header("name"));
        assert!(!grid.sort().is_sorted());
    }

    #[test]
    fn test_number_sort_starts_descending_with_nulls_last() {
        let mut grid = grid(GridConfig::default());
        grid.click_header("score");
        assert_eq!(ids(&grid), ["1", "3", "2", "4"]);
        grid.click_header("score");
        assert_eq!(ids(&grid), ["4", "2", "3", "1"]);
    }

    #[test]
    fn test_filters_compose_and_removal_restores() {
        let mut grid = grid(GridConfig::default());
        grid.add_filter(Filter::eq("city", "Paris")).unwrap();
        grid.add_filter(Filter::gt("score", 25i64)).unwrap();
        assert_eq!(ids(&grid), ["1"]);

        grid.remove_filter(1);
        assert_eq!(ids(&grid), ["1", "3"]);
        grid.clear_filters();
        assert_eq!(grid.matched_len(), 4);
    }

    #[test]
    fn test_add_filter_validates() {
        let mut grid = grid(GridConfig::default());
        assert!(matches!(
            grid.add_filter(Filter::eq("nope", 1i64)),
            Err(FilterError::UnknownField(_))
        ));
        assert!(matches!(
            grid.add_filter(Filter::contains("score", "1")),
            Err(FilterError::UnsupportedOperator { .. })
        ));

        let mut disabled = self::grid(GridConfig::default().with_filtering(false));
        assert_eq!(disabled.add_filter(Filter::eq("city", "Paris")), Err(FilterError::Disabled));
    }

    #[test]
    fn test_search_keeps_input_order() {
        let mut grid = grid(GridConfig::default());
        grid.set_search("paris");
        assert_eq!(ids(&grid), ["1", "3"]);
        grid.set_search("  ");
        assert_eq!(grid.matched_len(), 4);
    }

    #[test]
    fn test_pages_cover_matched_rows_once() {
        let mut grid = grid(GridConfig::default().with_page_size(3));
        assert_eq!(grid.total_pages(), 2);

        let mut seen: Vec<String> = grid.visible_rows().map(|r| r.id().to_string()).collect();
        assert_eq!(grid.next_page(), 2);
        seen.extend(grid.visible_rows().map(|r| r.id().to_string()));
        assert_eq!(seen, ids(&grid));

        assert_eq!(grid.next_page(), 2);
        assert_eq!(grid.set_page(0), 1);
    }

    #[test]
    fn test_page_clamps_when_filter_shrinks_set() {
        let mut grid = grid(GridConfig::default().with_page_size(2));
        assert_eq!(grid.set_page(2), 2);
        grid.add_filter(Filter::eq("city", "Lima")).unwrap();
        assert_eq!(grid.current_page(), 1);
        assert_eq!(grid.visible_rows().count(), 1);

        grid.clear_filters();
        assert_eq!(grid.current_page(), 2);
    }

    #[test]
    fn test_load_more_window_and_callback() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&requests);
        let mut grid = Grid::builder(columns())
            .config(
                GridConfig::default()
                    .with_pagination(PaginationMode::LoadMore)
                    .with_page_size(2)
                    .with_has_more(true),
            )
            .rows(rows())
            .on_load_more(move |request| sink.borrow_mut().push(request))
            .build()
            .unwrap();

        assert_eq!(grid.visible_rows().count(), 2);
        assert_eq!(grid.load_more(), LoadMoreOutcome::Extended);
        assert_eq!(grid.visible_rows().count(), 4);

        assert!(matches!(grid.load_more(), LoadMoreOutcome::Requested(_)));
        assert_eq!(grid.load_more(), LoadMoreOutcome::Busy);
        assert_eq!(requests.borrow().len(), 1);

        grid.append_rows(vec![Record::new("5").set("name", "Eve")], false);
        assert_eq!(grid.visible_rows().count(), 5);
        assert_eq!(grid.load_more(), LoadMoreOutcome::Exhausted);
    }

    #[test]
    fn test_page_size_change_returns_to_first_page() {
        let mut grid = grid(GridConfig::default().with_page_size(1));
        assert_eq!(grid.set_page(3), 3);

        grid.handle(GridEvent::PageSizeChanged(PAGE_SIZE_OPTIONS[0])).unwrap();
        assert_eq!(grid.page_size(), 10);
        assert_eq!((grid.current_page(), grid.total_pages()), (1, 1));
        assert_eq!(grid.visible_rows().count(), 4);

        assert!(matches!(
            grid.handle(GridEvent::PageSizeChanged(0)),
            Err(GridError::Configuration(ConfigurationError::InvalidPageSize))
        ));
        assert_eq!(grid.page_size(), 10);
    }

    #[test]
    fn test_page_size_change_shrinks_load_more_window() {
        let mut grid = grid(
            GridConfig::default()
                .with_pagination(PaginationMode::LoadMore)
                .with_page_size(1),
        );
        grid.load_more();
        grid.load_more();
        assert_eq!(grid.visible_rows().count(), 3);

        grid.set_page_size(2).unwrap();
        assert_eq!(grid.visible_rows().count(), 2);
        assert_eq!(grid.load_more(), LoadMoreOutcome::Extended);
        assert_eq!(grid.load_more(), LoadMoreOutcome::Exhausted);

        grid.set_has_more(true);
        assert!(matches!(
            grid.load_more(),
            LoadMoreOutcome::Requested(LoadMoreRequest { page: 3, page_size: 2 })
        ));
    }

    #[test]
    fn test_select_all_respects_filters() {
        let changes = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&changes);
        let mut grid = Grid::builder(columns())
            .config(GridConfig::default().with_row_selection(true).with_page_size(1))
            .row_id(|r: &Record| r.id().to_string())
            .rows(rows())
            .on_selection_change(move |_| *counter.borrow_mut() += 1)
            .build()
            .unwrap();

        grid.add_filter(Filter::eq("city", "Paris")).unwrap();
        assert!(grid.set_all_visible_selected(true));
        assert!(grid.all_visible_selected());
        assert_eq!(grid.selection().selected_ids().collect::<Vec<_>>(), ["1", "3"]);

        grid.clear_filters();
        assert!(!grid.all_visible_selected());
        assert_eq!(*changes.borrow(), 1);
    }

    #[test]
    fn test_toggle_unknown_row_errors() {
        let mut grid = grid(GridConfig::default().with_row_selection(true));
        assert!(grid.toggle_row("2").unwrap());
        assert!(!grid.toggle_row("2").unwrap());
        assert!(matches!(grid.toggle_row("99"), Err(GridError::UnknownRow(_))));
    }

    #[test]
    fn test_row_click_uses_filtered_position() {
        let clicked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&clicked);
        let mut grid = Grid::builder(columns())
            .rows(rows())
            .on_row_click(move |r: &Record| *sink.borrow_mut() = Some(r.id().to_string()))
            .build()
            .unwrap();

        grid.add_filter(Filter::eq("city", "Paris")).unwrap();
        grid.click_row(1).unwrap();
        assert_eq!(clicked.borrow().as_deref(), Some("3"));
        assert!(grid.click_row(5).is_err());
    }

    #[test]
    fn test_set_columns_drops_stale_state() {
        let mut grid = grid(GridConfig::default());
        grid.click_header("score");
        grid.add_filter(Filter::eq("city", "Paris")).unwrap();

        let keep: Vec<_> = columns().into_iter().filter(|c| c.key != "score").collect();
        grid.set_columns(keep).unwrap();
        assert!(!grid.sort().is_sorted());
        assert_eq!(grid.filters().len(), 1);
        assert_eq!(ids(&grid), ["1", "3"]);
    }

    #[test]
    fn test_layout_changes_fire_callback() {
        let saved = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&saved);
        let mut grid = Grid::builder(columns())
            .rows(rows())
            .on_layout_change(move |layout| *sink.borrow_mut() = Some(layout.clone()))
            .build()
            .unwrap();

        assert_eq!(grid.resize_column("city", 10).unwrap(), ColumnType::String.default_size().1);
        assert!(grid.set_column_visible("city", false).unwrap());
        assert!(saved.borrow().as_ref().is_some_and(|l| !l.is_visible("city")));
        assert!(matches!(grid.resize_column("nope", 10), Err(GridError::UnknownColumn(_))));
    }

    #[test]
    fn test_status_states() {
        let mut grid = Grid::builder(columns()).build().unwrap();
        assert_eq!(grid.status(), GridStatus::Empty);
        grid.set_loading(true);
        assert_eq!(grid.status(), GridStatus::Loading);

        grid.set_rows(rows());
        assert_eq!(grid.status(), GridStatus::Rows);
        grid.set_search("zzz");
        assert_eq!(grid.status(), GridStatus::NoMatches);
    }

    #[test]
    fn test_view_footer_aggregates_filtered_rows() {
        let mut grid = grid(GridConfig::default().with_footer(true));
        grid.add_filter(Filter::eq("city", "Paris")).unwrap();

        let ctx = RenderContext::new(chrono::Utc::now());
        let view = grid.view(&ctx);
        assert_eq!(view.headers.len(), 3);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.footer, Some(vec![String::new(), "50".to_string(), String::new()]));
        assert_eq!(view.page.matched_rows, 2);
        assert_eq!(view.page.total_rows, 4);
    }

    #[test]
    fn test_handle_routes_events() {
        let mut grid = grid(GridConfig::default());
        grid.handle(GridEvent::HeaderClicked("name".into())).unwrap();
        grid.handle(GridEvent::SearchChanged("paris".into())).unwrap();
        assert_eq!(ids(&grid), ["1", "3"]);
        assert!(grid.handle(GridEvent::FilterAdded(Filter::eq("nope", 1i64))).is_err());
    }
}
