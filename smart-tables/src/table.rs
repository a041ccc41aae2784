//! User table: composed columns over a grid

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use crate::cell::RenderContext;
use crate::column::ColumnComposer;
use crate::column::ColumnKind;
use crate::column::ColumnSet;
use crate::column::CustomColumn;
use crate::column::CustomColumns;
use crate::error::CompositionError;
use crate::error::ConfigurationError;
use crate::error::CustomColumnError;
use crate::error::GridError;
use crate::grid::Grid;
use crate::grid::GridBuilder;
use crate::grid::GridConfig;
use crate::grid::GridView;
use crate::model::UserRow;
use crate::model::Value;

/// Searchable text of a user row: identity, email and import source.
pub fn user_search_text(row: &UserRow) -> String {
    let mut parts = vec![row.wallet_address()];
    parts.extend(row.name());
    parts.extend(row.email());
    let mut text = parts.join(" ");
    if let Some(source) = row.source() {
        text.push(' ');
        text.push_str(source.label());
    }
    text
}

/// A grid of user rows whose columns follow the shapes in the batch.
///
/// Every time rows change the composer recomputes the batch signature; the
/// grid's columns are only replaced when the composed set actually changes,
/// so sort, filters and layout survive ordinary row updates. User-defined
/// columns follow the composed ones and keep their values by row id.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use smart_tables::column::ColumnComposer;
/// use smart_tables::column::ColumnFamily;
/// use smart_tables::grid::GridConfig;
/// use smart_tables::table::UserTable;
///
/// let mut table = UserTable::new(ColumnComposer::new(ColumnFamily::Users), GridConfig::default()).unwrap();
/// assert_eq!(table.column_keys(), ["identity"]);
///
/// table
///     .set_rows_json(json!([
///         {"walletAddress": "0xA", "email": "a@x.io", "source": "privy"}
///     ]))
///     .unwrap();
/// assert_eq!(table.column_keys(), ["identity", "email", "source"]);
/// ```
pub struct UserTable {
    composer: ColumnComposer,
    columns: Arc<ColumnSet>,
    custom: CustomColumns,
    grid: Grid<UserRow>,
}

impl UserTable {
    /// Creates an empty table.
    pub fn new(composer: ColumnComposer, config: GridConfig) -> Result<Self, ConfigurationError> {
        Self::with_grid(composer, Vec::new(), |builder| builder.config(config))
    }

    /// Creates a table over `rows`, letting the caller finish the grid
    /// builder (config, callbacks, footer values).
    pub fn with_grid(
        mut composer: ColumnComposer,
        rows: Vec<UserRow>,
        configure: impl FnOnce(GridBuilder<UserRow>) -> GridBuilder<UserRow>,
    ) -> Result<Self, ConfigurationError> {
        let columns = composer.compose(&rows);
        let builder = Grid::builder(columns.columns().to_vec())
            .rows(rows)
            .row_id(|row: &UserRow| row.row_id().to_string())
            .search_text(user_search_text);
        let grid = configure(builder).build()?;
        Ok(Self {
            composer,
            columns,
            custom: CustomColumns::default(),
            grid,
        })
    }

    pub fn grid(&self) -> &Grid<UserRow> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid<UserRow> {
        &mut self.grid
    }

    pub fn columns(&self) -> &Arc<ColumnSet> {
        &self.columns
    }

    pub fn column_keys(&self) -> Vec<&'static str> {
        self.columns.keys().collect()
    }

    /// Unknown-shape rows found by the latest composition.
    pub fn diagnostics(&self) -> &[CompositionError] {
        self.composer.diagnostics()
    }

    /// Replaces the rows. Returns `true` when the column set changed.
    pub fn set_rows(&mut self, rows: Vec<UserRow>) -> Result<bool, ConfigurationError> {
        self.grid.set_rows(rows);
        self.recompose()
    }

    /// Parses a JSON array of rows and replaces the current rows with it.
    pub fn set_rows_json(&mut self, json: serde_json::Value) -> Result<bool, GridError> {
        let rows = UserRow::parse_batch(json)?;
        Ok(self.set_rows(rows)?)
    }

    /// Appends a loaded page. Returns `true` when the column set changed.
    pub fn append_rows(&mut self, rows: Vec<UserRow>, has_more: bool) -> Result<bool, ConfigurationError> {
        self.grid.append_rows(rows, has_more);
        self.recompose()
    }

    fn recompose(&mut self) -> Result<bool, ConfigurationError> {
        let columns = self.composer.compose(self.grid.rows());
        if Arc::ptr_eq(&columns, &self.columns) {
            return Ok(false);
        }
        debug!(
            "Columns changed: {:?} -> {:?}",
            self.columns.kinds(),
            columns.kinds()
        );
        self.columns = columns;
        self.apply_columns()?;
        Ok(true)
    }

    fn apply_columns(&mut self) -> Result<(), ConfigurationError> {
        let mut columns = self.columns.columns().to_vec();
        columns.extend(self.custom.descriptors());
        self.grid.set_columns(columns)
    }

    // -------------------------------------------------------------------------
    // User columns
    // -------------------------------------------------------------------------

    pub fn custom_columns(&self) -> &CustomColumns {
        &self.custom
    }

    /// Appends a user column after the composed ones.
    pub fn add_custom_column(&mut self, column: CustomColumn) -> Result<(), GridError> {
        self.custom.add(column)?;
        Ok(self.apply_columns()?)
    }

    /// Removes a user column and the values entered into it.
    pub fn remove_custom_column(&mut self, id: &str) -> Result<CustomColumn, GridError> {
        let removed = self
            .custom
            .remove(id)
            .ok_or_else(|| CustomColumnError::UnknownColumn(id.to_string()))?;
        self.apply_columns()?;
        Ok(removed)
    }

    pub fn rename_custom_column(&mut self, id: &str, name: &str) -> Result<(), GridError> {
        self.custom.rename(id, name)?;
        Ok(self.apply_columns()?)
    }

    /// Stores a user column value for `row_id`. Rows that are not loaded yet
    /// keep the value until they arrive.
    pub fn set_custom_cell(&mut self, row_id: &str, column_id: &str, value: Value) -> Result<(), GridError> {
        self.custom.set_cell(row_id, column_id, value)?;
        Ok(self.apply_columns()?)
    }

    /// Mounts async data for the rows currently on screen and unmounts
    /// everything else.
    ///
    /// Wallet data is keyed by wallet address and only mounted when a live
    /// portfolio column is shown; messages are keyed by row id.
    pub fn sync_mounts(&self, ctx: &RenderContext<'_>) {
        if let Some(wallets) = ctx.wallets {
            let wanted: HashSet<&str> = if self.shows_any(&[ColumnKind::PortfolioValue, ColumnKind::Tokens]) {
                self.grid.visible_rows().map(UserRow::wallet_address).collect()
            } else {
                HashSet::new()
            };
            wallets.retain(|key| wanted.contains(key));
            for key in &wanted {
                wallets.mount(key);
            }
        }
        if let Some(messages) = ctx.messages {
            let wanted: HashSet<&str> = if self.shows_any(&[
                ColumnKind::LatestMessageAt,
                ColumnKind::LatestUserMessage,
                ColumnKind::LatestInteractedAgent,
            ]) {
                self.grid.visible_rows().map(UserRow::row_id).collect()
            } else {
                HashSet::new()
            };
            messages.retain(|key| wanted.contains(key));
            for key in &wanted {
                messages.mount(key);
            }
        }
    }

    fn shows_any(&self, kinds: &[ColumnKind]) -> bool {
        kinds
            .iter()
            .any(|kind| self.columns.contains(*kind) && self.grid.layout().is_visible(kind.key()))
    }

    pub fn view(&self, ctx: &RenderContext<'_>) -> GridView<'_, UserRow> {
        self.grid.view(ctx)
    }
}

impl std::fmt::Debug for UserTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserTable")
            .field("columns", &self.columns.kinds())
            .field("custom", &self.custom.columns())
            .field("grid", &self.grid)
            .finish()
    }
}
