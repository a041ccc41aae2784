//! Cell renderers for the user column registry

use super::AsyncCellStore;
use super::CellContent;
use super::CellSlot;
use super::LastMessage;
use super::RenderContext;
use super::format;
use crate::column::ColumnKind;
use crate::model::ImportExtra;
use crate::model::PersonaBundle;
use crate::model::UserRow;

/// Symbols shown before the "+N" overflow, from the persona snapshot.
const SNAPSHOT_STACK: usize = 3;
/// Positions considered and symbols shown for live wallet data.
const LIVE_POSITIONS: usize = 10;
const LIVE_STACK: usize = 5;

/// Renders one user cell.
///
/// Rows that do not meet a column's requirement get a placeholder, which
/// is how unknown-shape rows end up showing only their identity.
pub fn render_user_cell(kind: ColumnKind, row: &UserRow, ctx: &RenderContext<'_>) -> CellContent {
    if !kind.requirement().satisfied_by(row) {
        return CellContent::Placeholder;
    }
    match kind {
        ColumnKind::Identity => CellContent::Identity {
            name: row.name().or(row.email()).map(str::to_string),
            address: format::short_address(row.wallet_address()),
            avatar: row.avatar().map(str::to_string),
        },
        ColumnKind::Email => text_or_placeholder(row.email()),
        ColumnKind::WalletAddress => CellContent::Text(row.wallet_address().to_string()),
        ColumnKind::Name => text_or_placeholder(row.name()),
        ColumnKind::Source => match row.source() {
            Some(source) => CellContent::Badge(source.label().to_string()),
            None => CellContent::Placeholder,
        },
        ColumnKind::ContractData => match row.extra() {
            Some(extra) => contract_cell(extra),
            None => CellContent::Muted("No data".to_string()),
        },
        ColumnKind::LatestMessageAt => message_cell(ctx.messages, row, |m| {
            CellContent::Text(format::relative_time(m.created_at, ctx.now))
        }),
        ColumnKind::LatestUserMessage => message_cell(ctx.messages, row, |m| match m.kind.as_str() {
            "" => CellContent::Muted(CellContent::PLACEHOLDER.to_string()),
            kind => CellContent::Badge(kind.to_string()),
        }),
        ColumnKind::LatestInteractedAgent => message_cell(ctx.messages, row, |m| match &m.agent_name {
            Some(agent) => CellContent::Text(agent.clone()),
            None => CellContent::Muted("No agent".to_string()),
        }),
        persona_kind => match row.persona() {
            Some(persona) => persona_cell(persona_kind, persona, row, ctx),
            None => CellContent::Placeholder,
        },
    }
}

fn persona_cell(kind: ColumnKind, persona: &PersonaBundle, row: &UserRow, ctx: &RenderContext<'_>) -> CellContent {
    match kind {
        ColumnKind::Verified => CellContent::Checkmark(persona.verified),
        ColumnKind::FirstSignedIn => match row.created_at() {
            Some(at) => CellContent::Text(format::relative_time(at, ctx.now)),
            None => CellContent::Placeholder,
        },
        ColumnKind::Trait => match persona.dominant_trait() {
            Some(name) => CellContent::Badge(name.to_string()),
            None => CellContent::Placeholder,
        },
        ColumnKind::PortfolioValue => match wallet_slot(ctx, row) {
            Some(CellSlot::Loading) => CellContent::Skeleton,
            Some(CellSlot::Failed(_)) => CellContent::Muted(CellContent::PLACEHOLDER.to_string()),
            Some(CellSlot::Ready(wallet)) => CellContent::Text(format::usd(wallet.total_usd)),
            None => match persona.total_value() {
                Some(total) => CellContent::Text(format::usd(total)),
                None => CellContent::Placeholder,
            },
        },
        ColumnKind::Transactions => CellContent::Text(format::thousands(persona.transaction_count() as f64, 0)),
        ColumnKind::Tokens => match wallet_slot(ctx, row) {
            Some(CellSlot::Loading) => CellContent::Skeleton,
            Some(CellSlot::Failed(_)) => CellContent::Muted(CellContent::PLACEHOLDER.to_string()),
            Some(CellSlot::Ready(wallet)) => {
                let symbols: Vec<&str> = wallet
                    .top_positions(LIVE_POSITIONS)
                    .into_iter()
                    .map(|p| p.symbol.as_str())
                    .collect();
                if symbols.is_empty() {
                    CellContent::Muted("No tokens".to_string())
                } else {
                    CellContent::token_stack(&symbols, LIVE_STACK)
                }
            }
            None => {
                let symbols = persona.distinct_symbols();
                if symbols.is_empty() {
                    CellContent::Muted("No tokens".to_string())
                } else {
                    CellContent::token_stack(&symbols, SNAPSHOT_STACK)
                }
            }
        },
        ColumnKind::Activity => match persona.latest_activity() {
            Some(activity) => CellContent::Activity {
                summary: activity.summary.clone(),
                when: format::relative_time(activity.timestamp, ctx.now),
            },
            None => CellContent::Muted("No activity".to_string()),
        },
        ColumnKind::WalletCreatedAt => match persona.wallet_created_at {
            Some(at) => CellContent::Text(format::datetime(at)),
            None => CellContent::Placeholder,
        },
        _ => CellContent::Placeholder,
    }
}

fn wallet_slot(ctx: &RenderContext<'_>, row: &UserRow) -> Option<CellSlot<super::WalletSnapshot>> {
    ctx.wallets?.slot(row.wallet_address())
}

fn message_cell(
    store: Option<&AsyncCellStore<LastMessage>>,
    row: &UserRow,
    ready: impl FnOnce(&LastMessage) -> CellContent,
) -> CellContent {
    match store.and_then(|s| s.slot(row.row_id())) {
        Some(CellSlot::Loading) => CellContent::Skeleton,
        Some(CellSlot::Ready(message)) => ready(&message),
        Some(CellSlot::Failed(_)) | None => CellContent::Muted(CellContent::PLACEHOLDER.to_string()),
    }
}

/// Free-form extra values: strings bare, scalar lists comma-joined.
fn extra_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) if items.iter().all(|i| !i.is_array() && !i.is_object()) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn contract_cell(extra: &ImportExtra) -> CellContent {
    let mut lines = Vec::new();
    if let Some(count) = extra.interaction_count {
        lines.push(CellContent::Text(format!("Interactions: {}", format::thousands(count as f64, 0))));
    }
    if let Some(at) = extra.last_interaction {
        lines.push(CellContent::Muted(format!("Last: {}", format::date(at))));
    }
    if let Some(balance) = extra.token_balance {
        lines.push(CellContent::Muted(format!("Balance: {}", balance.normalize())));
    }
    for (key, value) in extra.other.iter().filter(|(_, v)| !v.is_null()) {
        lines.push(CellContent::Muted(format!("{}: {}", format::field_label(key), extra_value(value))));
    }
    if lines.is_empty() {
        CellContent::Muted("No data".to_string())
    } else {
        CellContent::Lines(lines)
    }
}

fn text_or_placeholder(text: Option<&str>) -> CellContent {
    match text {
        Some(text) => CellContent::Text(text.to_string()),
        None => CellContent::Placeholder,
    }
}
