//! Fixed-width text rendering of a [`GridView`]
//!
//! Frozen columns are always drawn; scrollable columns fill the remaining
//! width starting at the scroll offset. Widths are measured in terminal
//! columns, so wide glyphs and emoji line up.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::grid::GridView;
use crate::grid::HeaderCell;
use crate::grid::PaginationMode;
use crate::query::SortDirection;

const SEPARATOR: &str = " │ ";
const MIN_COLUMN_CHARS: usize = 4;

pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Cuts `s` to `max_width` columns, ending in "…" when anything was cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target_width = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

/// Truncates or right-pads `s` to exactly `width` columns.
pub fn fit_to_width(s: &str, width: usize) -> String {
    let mut fitted = truncate_to_width(s, width);
    let pad = width.saturating_sub(display_width(&fitted));
    fitted.extend(std::iter::repeat_n(' ', pad));
    fitted
}

/// Lays a [`GridView`] out as plain terminal lines.
///
/// Column pixel widths are scaled down to characters. Frozen columns are
/// always drawn first; `scroll` skips that many scrollable columns, and
/// scrollable columns that no longer fit the terminal width are cut off.
///
/// # Example
///
/// ```
/// use smart_tables::render::TextRenderer;
///
/// let renderer = TextRenderer::new(100).with_scroll(2);
/// assert_eq!(renderer.width(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    width: usize,
    scroll: usize,
    px_per_char: u16,
}

impl TextRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            scroll: 0,
            px_per_char: 8,
        }
    }

    /// Skips the first `scroll` scrollable columns.
    pub fn with_scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_px_per_char(mut self, px_per_char: u16) -> Self {
        self.px_per_char = px_per_char.max(1);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn chars_for(&self, header: &HeaderCell) -> usize {
        usize::from(header.width / self.px_per_char).max(MIN_COLUMN_CHARS)
    }

    /// Picks which header indices to draw and their widths in characters.
    fn plan(&self, headers: &[HeaderCell], selection: bool) -> Vec<(usize, usize)> {
        let mut budget = self.width;
        if selection {
            budget = budget.saturating_sub(3 + display_width(SEPARATOR));
        }

        let mut planned = Vec::new();
        let mut used = 0;
        let mut take = |index: usize, chars: usize, force: bool| {
            let cost = if planned.is_empty() { chars } else { chars + display_width(SEPARATOR) };
            if !force && used + cost > budget {
                return false;
            }
            used += cost;
            planned.push((index, chars));
            true
        };

        for (index, header) in headers.iter().enumerate().filter(|(_, h)| h.frozen) {
            take(index, self.chars_for(header), true);
        }
        let scrollable: Vec<usize> = (0..headers.len()).filter(|&i| !headers[i].frozen).collect();
        let skip = self.scroll.min(scrollable.len().saturating_sub(1));
        for &index in scrollable.iter().skip(skip) {
            if !take(index, self.chars_for(&headers[index]), false) {
                break;
            }
        }
        planned
    }

    pub fn render<R>(&self, view: &GridView<'_, R>) -> Vec<String> {
        let selection = view.selection.enabled;
        let plan = self.plan(&view.headers, selection);
        let mut lines = Vec::new();

        let join = |marker: Option<&str>, cells: Vec<String>| {
            let mut parts = Vec::with_capacity(cells.len() + 1);
            if let Some(marker) = marker {
                parts.push(marker.to_string());
            }
            parts.extend(cells);
            parts.join(SEPARATOR).trim_end().to_string()
        };

        let header_cells = plan
            .iter()
            .map(|&(index, chars)| {
                let header = &view.headers[index];
                let label = match header.sort {
                    Some(SortDirection::Asc) => format!("{} ▲", header.label),
                    Some(SortDirection::Desc) => format!("{} ▼", header.label),
                    None => header.label.clone(),
                };
                fit_to_width(&label, chars)
            })
            .collect();
        let all_marker = if view.selection.all_visible_selected { "[x]" } else { "[ ]" };
        lines.push(join(selection.then_some(all_marker), header_cells));
        lines.push(self.rule(&plan, selection));

        if let Some(message) = &view.message {
            lines.push(message.title.clone());
            if let Some(description) = &message.description {
                lines.push(description.clone());
            }
        }

        for row in &view.rows {
            let cells = plan
                .iter()
                .map(|&(index, chars)| {
                    let text = row.cells.get(index).map(|c| c.plain_text()).unwrap_or_default();
                    fit_to_width(&text, chars)
                })
                .collect();
            let marker = if row.selected { "[x]" } else { "[ ]" };
            lines.push(join(selection.then_some(marker), cells));
        }

        if let Some(footer) = &view.footer {
            lines.push(self.rule(&plan, selection));
            let cells = plan
                .iter()
                .map(|&(index, chars)| fit_to_width(footer.get(index).map(String::as_str).unwrap_or(""), chars))
                .collect();
            lines.push(join(selection.then_some("   "), cells));
        }

        lines.push(self.status_line(view));
        lines
    }

    pub fn render_to_string<R>(&self, view: &GridView<'_, R>) -> String {
        self.render(view).join("\n")
    }

    fn rule(&self, plan: &[(usize, usize)], selection: bool) -> String {
        let mut parts: Vec<String> = Vec::new();
        if selection {
            parts.push("─".repeat(3));
        }
        parts.extend(plan.iter().map(|&(_, chars)| "─".repeat(chars)));
        parts.join("─┼─")
    }

    fn status_line<R>(&self, view: &GridView<'_, R>) -> String {
        let page = &view.page;
        let mut line = match page.mode {
            PaginationMode::Pages if page.shown_rows == 0 => format!("Page {} of {}", page.current_page, page.total_pages),
            PaginationMode::Pages => format!(
                "Page {} of {} · rows {}-{} of {}",
                page.current_page,
                page.total_pages,
                page.start_index + 1,
                page.start_index + page.shown_rows,
                page.matched_rows
            ),
            PaginationMode::LoadMore => format!("Showing {} of {}", page.shown_rows, page.matched_rows),
        };
        if page.matched_rows != page.total_rows {
            line.push_str(&format!(" (filtered from {})", page.total_rows));
        }
        if page.mode == PaginationMode::LoadMore {
            if page.loading_more {
                line.push_str(" · loading more…");
            } else if page.has_more || page.shown_rows < page.matched_rows {
                line.push_str(" · more available");
            }
        }
        if view.selection.enabled {
            line.push_str(&format!(" · {} selected", view.selection.selected));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::RenderContext;
    use crate::column::ColumnDescriptor;
    use crate::column::ColumnType;
    use crate::grid::Grid;
    use crate::grid::GridConfig;
    use crate::model::Record;
    use crate::model::Value;

    fn grid(config: GridConfig) -> Grid<Record> {
        let field = |key: &'static str| move |r: &Record| r.get(key).cloned().unwrap_or(Value::Null);
        let columns = vec![
            ColumnDescriptor::text("name", "Name", ColumnType::String, field("name"))
                .frozen()
                .with_size(80, 80),
            ColumnDescriptor::text("city", "City", ColumnType::String, field("city")).with_size(64, 32),
            ColumnDescriptor::text("note", "Note", ColumnType::String, field("note")).with_size(64, 32),
        ];
        Grid::builder(columns)
            .config(config)
            .row_id(|r: &Record| r.id().to_string())
            .rows(vec![
                Record::new("1").set("name", "Alice").set("city", "Paris").set("note", "first"),
                Record::new("2").set("name", "Bartholomew the Great").set("city", "Oslo"),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        assert_eq!(truncate_to_width("日本語", 4), "日…");
        assert_eq!(fit_to_width("ab", 4), "ab  ");
    }

    #[test]
    fn test_render_headers_rows_and_status() {
        let mut grid = grid(GridConfig::default());
        grid.click_header("name");
        let ctx = RenderContext::new(chrono::Utc::now());
        let lines = TextRenderer::new(80).render(&grid.view(&ctx));

        assert!(lines[0].starts_with("Name ▲"));
        assert!(lines[0].contains("City"));
        assert!(lines[2].starts_with("Alice"));
        assert!(lines[3].starts_with("Bartholom…"));
        assert_eq!(lines.last().map(String::as_str), Some("Page 1 of 1 · rows 1-2 of 2"));
    }

    #[test]
    fn test_frozen_column_survives_scroll() {
        let grid = grid(GridConfig::default());
        let ctx = RenderContext::new(chrono::Utc::now());
        let lines = TextRenderer::new(80).with_scroll(1).render(&grid.view(&ctx));

        assert!(lines[0].starts_with("Name"));
        assert!(!lines[0].contains("City"));
        assert!(lines[0].contains("Note"));
    }

    #[test]
    fn test_narrow_terminal_cuts_scrollable_columns() {
        let grid = grid(GridConfig::default());
        let ctx = RenderContext::new(chrono::Utc::now());
        let lines = TextRenderer::new(14).render(&grid.view(&ctx));
        assert_eq!(lines[0], "Name");
    }

    #[test]
    fn test_selection_markers_and_empty_message() {
        let mut grid = grid(GridConfig::default().with_row_selection(true));
        grid.toggle_row("1").unwrap();
        let ctx = RenderContext::new(chrono::Utc::now());
        let lines = TextRenderer::new(80).render(&grid.view(&ctx));
        assert!(lines[0].starts_with("[ ]"));
        assert!(lines[2].starts_with("[x] │ Alice"));
        assert!(lines.last().is_some_and(|l| l.ends_with("1 selected")));

        grid.set_rows(Vec::new());
        let lines = TextRenderer::new(80).render(&grid.view(&ctx));
        assert_eq!(lines[2], "No users yet");
    }
}
