//! Grid configuration

use serde::Deserialize;
use serde::Serialize;

use super::ColumnLayout;
use crate::error::ConfigurationError;
use crate::query::SortDirection;

/// Page sizes offered by the page-size picker.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 15, 25, 50, 100];

/// How the grid splits filtered rows into what is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaginationMode {
    /// Numbered pages.
    #[default]
    Pages,
    /// A growing window with a "load more" action.
    LoadMore,
}

/// Feature toggles, paging and status copy for one grid.
///
/// Every field has a default, so a partial JSON document is a valid config.
///
/// # Example
///
/// ```
/// use smart_tables::grid::GridConfig;
/// use smart_tables::grid::PaginationMode;
///
/// let config = GridConfig::default()
///     .with_page_size(50)
///     .with_pagination(PaginationMode::LoadMore)
///     .with_row_selection(true);
/// assert!(config.validate().is_ok());
///
/// let config: GridConfig = serde_json::from_str(r#"{"pageSize": 10}"#).unwrap();
/// assert_eq!(config.page_size, 10);
/// assert!(config.enable_sorting);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Rows per page, or per load-more step.
    ///
    /// Default: 20
    pub page_size: usize,

    pub pagination: PaginationMode,

    /// Whether the caller has rows beyond those supplied.
    ///
    /// Default: false
    pub has_more: bool,

    pub enable_sorting: bool,
    pub enable_filtering: bool,
    pub enable_search: bool,
    /// Default: false
    pub enable_row_selection: bool,
    pub enable_column_resizing: bool,
    pub enable_column_reordering: bool,
    pub enable_column_visibility: bool,
    /// Default: false
    pub show_footer: bool,

    pub empty_message: String,
    pub empty_description: Option<String>,
    pub no_results_message: String,
    pub no_results_description: Option<String>,
    pub loading_message: String,

    /// Column sorted when the grid is built.
    pub default_sort: Option<String>,
    pub default_sort_direction: Option<SortDirection>,

    /// Saved layout restored on build.
    pub layout: Option<ColumnLayout>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            pagination: PaginationMode::Pages,
            has_more: false,
            enable_sorting: true,
            enable_filtering: true,
            enable_search: true,
            enable_row_selection: false,
            enable_column_resizing: true,
            enable_column_reordering: true,
            enable_column_visibility: true,
            show_footer: false,
            empty_message: "No users yet".to_string(),
            empty_description: Some("Users will appear here once they connect.".to_string()),
            no_results_message: "No matching results".to_string(),
            no_results_description: Some("Try adjusting your search or filters.".to_string()),
            loading_message: "Loading…".to_string(),
            default_sort: None,
            default_sort_direction: None,
            layout: None,
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_pagination(mut self, mode: PaginationMode) -> Self {
        self.pagination = mode;
        self
    }

    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    pub fn with_filtering(mut self, enabled: bool) -> Self {
        self.enable_filtering = enabled;
        self
    }

    pub fn with_search(mut self, enabled: bool) -> Self {
        self.enable_search = enabled;
        self
    }

    pub fn with_row_selection(mut self, enabled: bool) -> Self {
        self.enable_row_selection = enabled;
        self
    }

    pub fn with_column_resizing(mut self, enabled: bool) -> Self {
        self.enable_column_resizing = enabled;
        self
    }

    pub fn with_column_reordering(mut self, enabled: bool) -> Self {
        self.enable_column_reordering = enabled;
        self
    }

    pub fn with_column_visibility(mut self, enabled: bool) -> Self {
        self.enable_column_visibility = enabled;
        self
    }

    pub fn with_footer(mut self, enabled: bool) -> Self {
        self.show_footer = enabled;
        self
    }

    pub fn with_empty_message(mut self, title: impl Into<String>, description: Option<String>) -> Self {
        self.empty_message = title.into();
        self.empty_description = description;
        self
    }

    pub fn with_no_results_message(mut self, title: impl Into<String>, description: Option<String>) -> Self {
        self.no_results_message = title.into();
        self.no_results_description = description;
        self
    }

    pub fn with_loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }

    /// Sorts by `key` on build. `None` uses the column's first direction.
    pub fn with_default_sort(mut self, key: impl Into<String>, direction: Option<SortDirection>) -> Self {
        self.default_sort = Some(key.into());
        self.default_sort_direction = direction;
        self
    }

    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Checks settings that do not depend on the columns.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.page_size == 0 {
            return Err(ConfigurationError::InvalidPageSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_size_rejected() {
        let config = GridConfig::default().with_page_size(0);
        assert_eq!(config.validate(), Err(ConfigurationError::InvalidPageSize));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GridConfig = serde_json::from_str(
            r#"{"pagination": "loadMore", "hasMore": true, "defaultSort": "portfolioValue", "defaultSortDirection": "asc"}"#,
        )
        .unwrap();
        assert_eq!(config.pagination, PaginationMode::LoadMore);
        assert!(config.has_more);
        assert_eq!(config.default_sort_direction, Some(SortDirection::Asc));
        assert_eq!(config.page_size, 20);
        assert_eq!(config.no_results_message, "No matching results");
    }
}
