//! Subcommand implementations

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use anyhow::Result;
use log::info;
use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use smart_tables::UserRow;
use smart_tables::UserTable;
use smart_tables::cell::AsyncCellStore;
use smart_tables::cell::LastMessage;
use smart_tables::cell::MapSource;
use smart_tables::cell::RenderContext;
use smart_tables::cell::WalletSnapshot;
use smart_tables::column::ColumnComposer;
use smart_tables::column::CustomColumn;
use smart_tables::grid::GridConfig;
use smart_tables::grid::PaginationMode;
use smart_tables::model::Value;
use smart_tables::query::Filter;
use smart_tables::query::LoadMoreOutcome;
use smart_tables::query::SortDirection;
use smart_tables::query::SortState;
use smart_tables::render::TextRenderer;

use crate::cli::ColumnsArgs;
use crate::cli::RenderArgs;
use crate::paths;

fn read_rows(path: &Path) -> Result<Vec<UserRow>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let json: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))?;
    let rows = UserRow::parse_batch(json).with_context(|| format!("Failed to parse rows in {}", path.display()))?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn read_map<T: DeserializeOwned>(path: &Path) -> Result<MapSource<T>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let data: HashMap<String, T> =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(MapSource::new(data))
}

/// User columns saved alongside a rows file.
#[derive(Debug, Deserialize)]
struct CustomColumnsFile {
    columns: Vec<CustomColumn>,
    /// Values by row id, then by column id.
    #[serde(default)]
    values: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

fn apply_custom_columns(table: &mut UserTable, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file: CustomColumnsFile =
        serde_json::from_str(&text).with_context(|| format!("Invalid user columns in {}", path.display()))?;
    for column in file.columns {
        let id = column.id.clone();
        table
            .add_custom_column(column)
            .with_context(|| format!("Cannot add column '{id}'"))?;
    }
    for (row_id, cells) in file.values {
        for (column_id, value) in cells {
            table
                .set_custom_cell(&row_id, &column_id, Value::from(value))
                .with_context(|| format!("Cannot set '{column_id}' for row '{row_id}'"))?;
        }
    }
    info!(
        "Loaded {} user columns from {}",
        table.custom_columns().columns().len(),
        path.display()
    );
    Ok(())
}

/// Reads the grid configuration from `path`, falling back to the user's
/// config file and then to defaults.
fn load_config(path: Option<&Path>) -> Result<GridConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => paths::config_file().filter(|p| p.exists()),
    };
    let Some(path) = path else {
        return Ok(GridConfig::default());
    };

    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config =
        serde_json::from_str(&text).with_context(|| format!("Invalid grid config in {}", path.display()))?;
    info!("Using grid config from {}", path.display());
    Ok(config)
}

pub async fn render(args: RenderArgs) -> Result<()> {
    let mut rows = read_rows(&args.rows)?;
    let mut config = load_config(args.config.as_deref())?;
    let page_size = args.page_size.unwrap_or(config.page_size);

    // In load-more mode the file plays the backend: the grid starts with one
    // page and each request is served from the remainder.
    let mut pending = Vec::new();
    if args.load_more.is_some() {
        pending = rows.split_off(page_size.min(rows.len()));
        config = config.with_pagination(PaginationMode::LoadMore);
    }

    let composer = ColumnComposer::new(args.family.into()).with_chat_columns(args.chat);
    let mut table = UserTable::with_grid(composer, rows, |builder| builder.config(config))
        .context("Failed to build the table")?;
    for diagnostic in table.diagnostics() {
        warn!("{diagnostic}");
        eprintln!("warning: {diagnostic}");
    }
    if let Some(path) = &args.custom {
        apply_custom_columns(&mut table, path)?;
    }

    let grid = table.grid_mut();
    grid.set_page_size(page_size).context("Invalid page size")?;
    if !pending.is_empty() {
        grid.set_has_more(true);
    }
    if let Some(key) = &args.sort {
        let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
        grid.set_sort(SortState::by(key.as_str(), direction))
            .with_context(|| format!("Cannot sort by '{key}'"))?;
    }
    for expr in &args.filters {
        let filter = Filter::parse_expression(expr).with_context(|| format!("Bad filter '{expr}'"))?;
        grid.add_filter(filter).with_context(|| format!("Cannot apply filter '{expr}'"))?;
    }
    if let Some(search) = &args.search {
        grid.set_search(search);
    }
    if let Some(page) = args.page {
        let shown = grid.set_page(page);
        if shown != page {
            warn!("Page {page} is out of range, showing page {shown}");
        }
    }

    for _ in 0..args.load_more.unwrap_or(0) {
        match table.grid_mut().load_more() {
            LoadMoreOutcome::Extended => {}
            LoadMoreOutcome::Requested(request) => {
                let take = request.page_size.min(pending.len());
                let batch: Vec<UserRow> = pending.drain(..take).collect();
                info!("Serving page {} with {} rows", request.page, batch.len());
                table.append_rows(batch, !pending.is_empty())?;
            }
            LoadMoreOutcome::Busy | LoadMoreOutcome::Exhausted => break,
        }
    }

    let wallets = match &args.wallets {
        Some(path) => Some(AsyncCellStore::new(read_map::<WalletSnapshot>(path)?)),
        None => None,
    };
    let messages = match &args.messages {
        Some(path) => Some(AsyncCellStore::new(read_map::<LastMessage>(path)?)),
        None => None,
    };

    let mut ctx = RenderContext::new(chrono::Utc::now());
    if let Some(store) = &wallets {
        ctx = ctx.with_wallets(store);
    }
    if let Some(store) = &messages {
        ctx = ctx.with_messages(store);
    }
    table.sync_mounts(&ctx);

    let settle = async {
        if let Some(store) = &wallets {
            store.settled().await;
        }
        if let Some(store) = &messages {
            store.settled().await;
        }
    };
    if tokio::time::timeout(Duration::from_secs(args.timeout), settle).await.is_err() {
        warn!("Timed out waiting for row data after {}s", args.timeout);
    }

    let renderer = TextRenderer::new(args.width).with_scroll(args.scroll);
    for line in renderer.render(&table.view(&ctx)) {
        println!("{line}");
    }
    Ok(())
}

pub fn columns(args: ColumnsArgs) -> Result<()> {
    let rows = read_rows(&args.rows)?;
    let composer = ColumnComposer::new(args.family.into()).with_chat_columns(args.chat);
    let mut table = UserTable::new(composer, GridConfig::default()).context("Failed to build the table")?;
    table.set_rows(rows).context("Failed to compose columns")?;

    for column in table.columns().columns() {
        let mut flags: Vec<String> = Vec::new();
        if column.frozen {
            flags.push("frozen".into());
        }
        if column.sortable {
            flags.push("sortable".into());
        }
        if let Some(aggregation) = column.aggregation {
            flags.push(format!("footer={aggregation:?}"));
        }
        println!(
            "{:<24} {:<24} {:<8} {:>4}px  {}",
            column.key,
            column.header,
            column.column_type.as_str(),
            column.size,
            flags.join(" ")
        );
    }
    for diagnostic in table.diagnostics() {
        println!("warning: {diagnostic}");
    }
    Ok(())
}
