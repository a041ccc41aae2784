//! Integration tests for column composition and the grid pipeline.
//!
//! Row fixtures are raw JSON, converted at the boundary exactly as a caller
//! would receive them from a backend.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::TimeZone;
use chrono::Utc;
use serde_json::json;
use smart_tables::UserTable;
use smart_tables::cell::CellContent;
use smart_tables::cell::RenderContext;
use smart_tables::column::ColumnComposer;
use smart_tables::column::ColumnDescriptor;
use smart_tables::column::ColumnFamily;
use smart_tables::column::ColumnKind;
use smart_tables::column::ColumnType;
use smart_tables::column::CustomColumn;
use smart_tables::column::CustomColumnType;
use smart_tables::error::ConfigurationError;
use smart_tables::grid::Grid;
use smart_tables::grid::GridConfig;
use smart_tables::grid::GridEvent;
use smart_tables::grid::GridStatus;
use smart_tables::grid::PAGE_SIZE_OPTIONS;
use smart_tables::grid::PaginationMode;
use smart_tables::model::Record;
use smart_tables::model::UserRow;
use smart_tables::model::Value;
use smart_tables::query::Filter;
use smart_tables::query::FilterOperator;
use smart_tables::query::LoadMoreOutcome;
use smart_tables::query::SortDirection;
use smart_tables::query::SortState;
use smart_tables::render::TextRenderer;

fn ctx() -> RenderContext<'static> {
    RenderContext::new(Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap())
}

fn mixed_batch() -> Vec<UserRow> {
    UserRow::parse_batch(json!([
        {
            "id": "u1",
            "walletAddress": "0xaaa0000000000001",
            "name": "Alice",
            "createdAt": "2024-06-01T00:00:00Z",
            "personaData": {
                "dominantTrait": "whale",
                "portfolio": {"totalValue": 1200, "tokens": {"base": [{"symbol": "ETH"}]}},
                "activities": {"totalTransactions": 40}
            }
        },
        {"id": "u2", "walletAddress": "0xbbb0000000000002", "name": "Bob"},
        {"walletAddress": "0xccc0000000000003", "email": "carol@x.io", "source": "privy"},
        {"walletAddress": "0xddd0000000000004", "source": "contract", "extra": {"interactionCount": 7}}
    ]))
    .unwrap()
}

fn record_grid(config: GridConfig, rows: serde_json::Value) -> Grid<Record> {
    let field = |key: &'static str| move |r: &Record| r.get(key).cloned().unwrap_or(Value::Null);
    let rows = rows
        .as_array()
        .unwrap()
        .iter()
        .enumerate()
        .map(|(i, row)| Record::from_json(i, row.clone()).unwrap())
        .collect();
    Grid::builder(vec![
        ColumnDescriptor::text("id", "Id", ColumnType::String, field("id")).frozen(),
        ColumnDescriptor::text("name", "Name", ColumnType::String, field("name")),
        ColumnDescriptor::text("value", "Value", ColumnType::Number, field("value")),
    ])
    .config(config)
    .row_id(|r: &Record| r.id().to_string())
    .rows(rows)
    .build()
    .unwrap()
}

fn ids(grid: &Grid<Record>) -> Vec<String> {
    grid.matched_rows().map(|r| r.id().to_string()).collect()
}

// =============================================================================
// Composition
// =============================================================================

mod composition {
    use super::*;

    #[test]
    fn test_identity_first_and_frozen() {
        let mut composer = ColumnComposer::new(ColumnFamily::Users);
        let set = composer.compose(&mixed_batch());
        let first = &set.columns()[0];
        assert_eq!(first.key, "identity");
        assert!(first.frozen);
        assert_eq!(set.keys().filter(|k| *k == "identity").count(), 1);
    }

    #[test]
    fn test_order_independent() {
        let rows = mixed_batch();
        let mut reversed = rows.clone();
        reversed.reverse();

        let forward = ColumnComposer::new(ColumnFamily::Users).compose(&rows);
        let backward = ColumnComposer::new(ColumnFamily::Users).compose(&reversed);
        assert_eq!(forward.kinds(), backward.kinds());
    }

    #[test]
    fn test_union_of_needs() {
        let set = ColumnComposer::new(ColumnFamily::Users).compose(&mixed_batch());
        assert_eq!(
            set.kinds(),
            &[
                ColumnKind::Identity,
                ColumnKind::Verified,
                ColumnKind::FirstSignedIn,
                ColumnKind::Trait,
                ColumnKind::PortfolioValue,
                ColumnKind::Transactions,
                ColumnKind::Tokens,
                ColumnKind::Activity,
                ColumnKind::WalletCreatedAt,
                ColumnKind::Email,
                ColumnKind::ContractData,
                ColumnKind::Source,
            ]
        );
    }

    #[test]
    fn test_memoised_on_signature() {
        let mut composer = ColumnComposer::new(ColumnFamily::Users);
        let rows = mixed_batch();
        let first = composer.compose(&rows);
        let second = composer.compose(&rows[..]);
        assert!(std::sync::Arc::ptr_eq(&first, &second));

        let third = composer.compose(&rows[..1]);
        assert!(!std::sync::Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_persona_columns_with_placeholder_for_plain_row() {
        let rows = UserRow::parse_batch(json!([
            {"id": "a", "walletAddress": "0x1", "personaData": {"dominantTrait": "degen", "portfolio": {"totalValue": 5}}},
            {"id": "b", "walletAddress": "0x2", "name": "Plain"}
        ]))
        .unwrap();
        let table = UserTable::with_grid(ColumnComposer::new(ColumnFamily::Users), rows, |b| b).unwrap();
        let keys = table.column_keys();
        assert!(keys.contains(&"trait"));
        assert!(keys.contains(&"portfolioValue"));

        let ctx = ctx();
        let view = table.view(&ctx);
        let trait_index = view.headers.iter().position(|h| h.key == "trait").unwrap();
        assert_eq!(view.rows[0].cells[trait_index], CellContent::Badge("degen".into()));
        assert_eq!(view.rows[1].cells[trait_index], CellContent::Placeholder);
    }

    #[test]
    fn test_imported_family() {
        let rows = UserRow::parse_batch(json!([
            {"walletAddress": "0x1", "source": "manual"},
            {"walletAddress": "0x2", "source": "nft_holders", "name": "Dana"}
        ]))
        .unwrap();
        let set = ColumnComposer::new(ColumnFamily::ImportedUsers).compose(&rows);
        assert_eq!(set.kinds(), &[ColumnKind::Identity, ColumnKind::Name]);

        let rows = UserRow::parse_batch(json!([{"walletAddress": "0x1", "source": "manual"}])).unwrap();
        let set = ColumnComposer::new(ColumnFamily::ImportedUsers).compose(&rows);
        assert_eq!(
            set.kinds(),
            &[ColumnKind::Identity, ColumnKind::Email, ColumnKind::WalletAddress, ColumnKind::Source]
        );
    }

    #[test]
    fn test_email_without_source_adds_email_column() {
        let rows = UserRow::parse_batch(json!([
            {"id": "u9", "walletAddress": "0x9", "email": "eve@x.io"}
        ]))
        .unwrap();
        let table = UserTable::with_grid(ColumnComposer::new(ColumnFamily::Users), rows, |b| b).unwrap();
        assert_eq!(table.column_keys(), ["identity", "email"]);
        assert!(table.diagnostics().is_empty());

        let ctx = ctx();
        let view = table.view(&ctx);
        assert_eq!(view.rows[0].cells[1], CellContent::Text("eve@x.io".into()));
    }

    #[test]
    fn test_extra_data_column_for_non_contract_import() {
        let rows = UserRow::parse_batch(json!([
            {"walletAddress": "0x1", "source": "nft_holders", "extra": {"tokenIds": [1, 2]}}
        ]))
        .unwrap();
        let set = ColumnComposer::new(ColumnFamily::Users).compose(&rows);
        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, ["identity", "contractData", "source"]);
    }

    #[test]
    fn test_unknown_rows_show_only_identity_with_chat_columns() {
        let rows = UserRow::parse_batch(json!([
            {"id": "u1", "walletAddress": "0x1", "personaData": {}},
            {"id": "u2", "walletAddress": "0x2"}
        ]))
        .unwrap();
        let composer = ColumnComposer::new(ColumnFamily::Users).with_chat_columns(true);
        let table = UserTable::with_grid(composer, rows, |b| b).unwrap();
        let ctx = ctx();
        let view = table.view(&ctx);
        let agent = view.headers.iter().position(|h| h.key == "latestInteractedAgent").unwrap();
        assert_eq!(view.rows[1].cells[agent], CellContent::Placeholder);
        assert_eq!(
            view.rows[0].cells[agent],
            CellContent::Muted(CellContent::PLACEHOLDER.to_string())
        );
    }

    #[test]
    fn test_custom_columns_render_after_composed() {
        let mut table =
            UserTable::with_grid(ColumnComposer::new(ColumnFamily::Users), mixed_batch(), |b| b).unwrap();
        table
            .add_custom_column(CustomColumn::new("tier", "Tier", CustomColumnType::Text))
            .unwrap();
        table.set_custom_cell("u2", "tier", Value::from("gold")).unwrap();

        let ctx = ctx();
        let view = table.view(&ctx);
        let last = view.headers.last().unwrap();
        assert_eq!((last.key.as_str(), last.label.as_str(), last.width), ("tier", "Tier", 200));

        let cell = |id: &str| {
            let row = view.rows.iter().find(|r| r.row.row_id() == id).unwrap();
            row.cells.last().cloned().unwrap()
        };
        assert_eq!(cell("u2"), CellContent::Text("gold".into()));
        assert_eq!(cell("u1"), CellContent::Placeholder);
    }

    #[test]
    fn test_chat_columns_appended() {
        let set = ColumnComposer::new(ColumnFamily::Users)
            .with_chat_columns(true)
            .compose(&mixed_batch());
        let keys: Vec<_> = set.keys().collect();
        assert_eq!(
            &keys[keys.len() - 3..],
            &["latestMessageAt", "latestUserMessage", "latestInteractedAgent"]
        );
    }
}

// =============================================================================
// Sorting
// =============================================================================

mod sorting {
    use super::*;

    #[test]
    fn test_alice_and_bob() {
        let mut grid = record_grid(
            GridConfig::default(),
            json!([{"id": "a", "name": "Alice", "value": 50}, {"id": "b", "name": "Bob", "value": 10}]),
        );
        grid.set_sort(SortState::asc("value")).unwrap();
        assert_eq!(ids(&grid), ["b", "a"]);
        grid.set_sort(SortState::desc("value")).unwrap();
        assert_eq!(ids(&grid), ["a", "b"]);

        grid.set_sort(SortState::unsorted()).unwrap();
        grid.add_filter(Filter::new("name", FilterOperator::StartsWith, "A")).unwrap();
        assert_eq!(ids(&grid), ["a"]);
    }

    #[test]
    fn test_idempotent_and_stable() {
        let mut grid = record_grid(
            GridConfig::default(),
            json!([
                {"id": "1", "value": 5}, {"id": "2", "value": 1}, {"id": "3", "value": 5},
                {"id": "4", "value": 1}, {"id": "5", "value": "$5"}
            ]),
        );
        grid.set_sort(SortState::asc("value")).unwrap();
        let once = ids(&grid);
        assert_eq!(once, ["2", "4", "1", "3", "5"]);

        grid.set_sort(SortState::asc("value")).unwrap();
        assert_eq!(ids(&grid), once);

        grid.set_sort(SortState::desc("value")).unwrap();
        assert_eq!(ids(&grid), ["1", "3", "5", "2", "4"]);
    }

    #[test]
    fn test_three_clicks_restore_input_order() {
        let mut grid = record_grid(
            GridConfig::default(),
            json!([{"id": "x", "name": "zed"}, {"id": "y", "name": "Amy"}, {"id": "z", "name": "mo"}]),
        );
        let before = ids(&grid);
        for _ in 0..3 {
            grid.click_header("name");
        }
        assert!(!grid.sort().is_sorted());
        assert_eq!(ids(&grid), before);
    }

    #[test]
    fn test_sort_callback_and_direction_defaults() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let rows = mixed_batch();
        let mut table = UserTable::with_grid(ColumnComposer::new(ColumnFamily::Users), rows, |b| {
            b.on_sort_change(move |sort| sink.borrow_mut().push(sort.direction()))
        })
        .unwrap();

        let grid = table.grid_mut();
        grid.click_header("portfolioValue");
        grid.click_header("trait");
        assert_eq!(grid.sort().key(), Some("trait"));
        assert_eq!(*seen.borrow(), [Some(SortDirection::Desc), Some(SortDirection::Asc)]);
    }
}

// =============================================================================
// Filtering and search
// =============================================================================

mod filtering {
    use super::*;

    #[test]
    fn test_removing_filters_restores_rows() {
        let mut grid = record_grid(
            GridConfig::default(),
            json!([
                {"id": "1", "name": "Ann", "value": 3}, {"id": "2", "name": "Ben", "value": 8},
                {"id": "3", "name": "Ava", "value": 9}
            ]),
        );
        grid.click_header("value");
        let before = ids(&grid);

        grid.add_filter(Filter::starts_with("name", "a")).unwrap();
        grid.add_filter(Filter::ge("value", 5i64)).unwrap();
        assert_eq!(ids(&grid), ["3"]);

        grid.remove_filter(0);
        grid.remove_filter(0);
        assert_eq!(ids(&grid), before);
    }

    #[test]
    fn test_parsed_expression_filters() {
        let mut grid = record_grid(
            GridConfig::default(),
            json!([{"id": "1", "name": "Ann", "value": 3}, {"id": "2", "name": "Ben", "value": 8}]),
        );
        grid.add_filter(Filter::parse_expression("value:gt:4").unwrap()).unwrap();
        assert_eq!(ids(&grid), ["2"]);
    }

    #[test]
    fn test_search_and_filters_are_anded() {
        let mut table = UserTable::with_grid(ColumnComposer::new(ColumnFamily::Users), mixed_batch(), |b| b).unwrap();
        let grid = table.grid_mut();
        grid.set_search("0x");
        assert_eq!(grid.matched_len(), 4);
        grid.add_filter(Filter::contains("email", "carol")).unwrap();
        assert_eq!(grid.matched_rows().map(UserRow::row_id).collect::<Vec<_>>(), ["0xccc0000000000003"]);
        grid.set_search("alice");
        assert_eq!(grid.status(), GridStatus::NoMatches);
    }
}

// =============================================================================
// Pagination and load more
// =============================================================================

mod paging {
    use super::*;

    fn numbered(count: usize) -> serde_json::Value {
        json!((0..count).map(|i| json!({"id": format!("r{i:02}"), "value": i})).collect::<Vec<_>>())
    }

    #[test]
    fn test_pages_concatenate_to_filtered_rows() {
        let mut grid = record_grid(GridConfig::default().with_page_size(4), numbered(11));
        grid.add_filter(Filter::ne("value", 5i64)).unwrap();
        grid.click_header("value");

        let total = grid.matched_len();
        let mut seen = Vec::new();
        for page in 1..=grid.total_pages() {
            grid.set_page(page);
            let slice: Vec<String> = grid.visible_rows().map(|r| r.id().to_string()).collect();
            let start = (page - 1) * 4;
            assert_eq!(slice.len(), 4usize.min(total - start));
            seen.extend(slice);
        }
        assert_eq!(seen, ids(&grid));
    }

    #[test]
    fn test_load_more_busy_gating() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&requests);
        let rows = UserRow::parse_batch(json!([
            {"walletAddress": "0x1", "email": "a@x.io", "source": "privy"},
            {"walletAddress": "0x2", "email": "b@x.io", "source": "privy"},
            {"walletAddress": "0x3", "email": "c@x.io", "source": "privy"}
        ]))
        .unwrap();
        let config = GridConfig::default()
            .with_pagination(PaginationMode::LoadMore)
            .with_page_size(2)
            .with_has_more(true);
        let mut table = UserTable::with_grid(ColumnComposer::new(ColumnFamily::Users), rows, |b| {
            b.config(config).on_load_more(move |request| sink.borrow_mut().push(request))
        })
        .unwrap();

        assert_eq!(table.grid_mut().load_more(), LoadMoreOutcome::Extended);
        assert!(matches!(table.grid_mut().load_more(), LoadMoreOutcome::Requested(_)));
        for _ in 0..3 {
            assert_eq!(table.grid_mut().load_more(), LoadMoreOutcome::Busy);
        }
        assert_eq!(requests.borrow().len(), 1);
        assert_eq!(requests.borrow()[0].page, 3);

        let more = UserRow::parse_batch(json!([
            {"walletAddress": "0x4", "source": "contract", "extra": {"interactionCount": 2}}
        ]))
        .unwrap();
        let changed = table.append_rows(more, false).unwrap();
        assert!(changed);
        assert!(table.column_keys().contains(&"contractData"));
        assert_eq!(table.grid().visible_rows().count(), 4);
        assert_eq!(table.grid_mut().load_more(), LoadMoreOutcome::Exhausted);
    }

    #[test]
    fn test_page_size_picker_returns_to_first_page() {
        let mut grid = record_grid(GridConfig::default().with_page_size(4), numbered(30));
        grid.set_page(5);
        assert_eq!(grid.current_page(), 5);

        grid.handle(GridEvent::PageSizeChanged(PAGE_SIZE_OPTIONS[2])).unwrap();
        assert_eq!(grid.current_page(), 1);
        assert_eq!(grid.total_pages(), 2);
        assert_eq!(grid.visible_rows().count(), 25);
    }

    #[test]
    fn test_failed_load_can_retry() {
        let mut grid = record_grid(
            GridConfig::default()
                .with_pagination(PaginationMode::LoadMore)
                .with_page_size(1)
                .with_has_more(true),
            numbered(1),
        );
        assert!(matches!(grid.load_more(), LoadMoreOutcome::Requested(_)));
        grid.abort_loading();
        assert!(matches!(grid.load_more(), LoadMoreOutcome::Requested(_)));
    }
}

// =============================================================================
// Selection
// =============================================================================

mod selection {
    use super::*;

    #[test]
    fn test_select_all_with_filter() {
        let mut grid = record_grid(
            GridConfig::default().with_row_selection(true).with_page_size(1),
            json!([
                {"id": "a", "name": "Ann"}, {"id": "b", "name": "Bo"}, {"id": "c", "name": "Al"}
            ]),
        );
        grid.add_filter(Filter::starts_with("name", "a")).unwrap();
        grid.set_all_visible_selected(true);
        grid.clear_filters();

        assert_eq!(grid.selection().selected_ids().collect::<Vec<_>>(), ["a", "c"]);
        assert!(!grid.selection().is_selected("b"));
        assert!(!grid.all_visible_selected());

        grid.set_all_visible_selected(false);
        assert_eq!(grid.selection().count(), 0);
    }

    #[test]
    fn test_selection_survives_sort_and_paging() {
        let mut grid = record_grid(
            GridConfig::default().with_row_selection(true).with_page_size(1),
            json!([{"id": "a", "value": 2}, {"id": "b", "value": 1}]),
        );
        grid.toggle_row("a").unwrap();
        grid.click_header("value");
        grid.set_page(2);
        assert!(grid.selection().is_selected("a"));
    }
}

// =============================================================================
// Empty state and configuration
// =============================================================================

mod states {
    use super::*;

    #[test]
    fn test_empty_rows_render_identity_only() {
        let table = UserTable::new(ColumnComposer::new(ColumnFamily::Users), GridConfig::default()).unwrap();
        let ctx = ctx();
        let view = table.view(&ctx);
        assert_eq!(view.status, GridStatus::Empty);
        assert_eq!(view.headers.len(), 1);
        assert_eq!(view.headers[0].key, "identity");
        assert!(view.rows.is_empty());

        let text = TextRenderer::new(80).render_to_string(&view);
        assert!(text.contains("No users yet"));
        assert!(text.ends_with("Page 1 of 1"));
    }

    #[test]
    fn test_loading_status() {
        let mut table = UserTable::new(ColumnComposer::new(ColumnFamily::Users), GridConfig::default()).unwrap();
        table.grid_mut().set_loading(true);
        let ctx = ctx();
        assert_eq!(table.view(&ctx).status, GridStatus::Loading);
    }

    #[test]
    fn test_configuration_errors() {
        let err = UserTable::new(
            ColumnComposer::new(ColumnFamily::Users),
            GridConfig::default().with_page_size(0),
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidPageSize);

        let err = UserTable::new(
            ColumnComposer::new(ColumnFamily::Users),
            GridConfig::default().with_default_sort("tokens", None),
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidSortColumn("tokens".into()));

        let bad = ColumnDescriptor::text("x", "X", ColumnType::String, |_: &Record| Value::Null).with_size(50, 90);
        let err = Grid::builder(vec![bad]).build().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidColumnSize { .. }));
    }

    #[test]
    fn test_footer_over_filtered_rows() {
        let table = UserTable::with_grid(ColumnComposer::new(ColumnFamily::Users), mixed_batch(), |b| {
            b.config(GridConfig::default().with_footer(true))
                .footer_value(|key| (key == "email").then(|| "custom".to_string()))
        })
        .unwrap();
        let ctx = ctx();
        let view = table.view(&ctx);
        let footer = view.footer.unwrap();
        let at = |key: &str| view.headers.iter().position(|h| h.key == key).unwrap();

        assert_eq!(footer[at("identity")], "4");
        assert_eq!(footer[at("email")], "custom");
        assert_eq!(footer[at("portfolioValue")], "$1,200.00 USD");
        assert_eq!(footer[at("tokens")], "");
    }
}
