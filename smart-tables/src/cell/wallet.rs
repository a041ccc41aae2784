//! Per-row data fetched on demand

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// Live balances for one wallet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletSnapshot {
    pub total_usd: Decimal,
    pub positions: Vec<TokenPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPosition {
    pub symbol: String,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub value_usd: Decimal,
}

impl WalletSnapshot {
    /// Positions worth more than zero, largest first, at most `limit`.
    pub fn top_positions(&self, limit: usize) -> Vec<&TokenPosition> {
        let mut positions: Vec<&TokenPosition> = self
            .positions
            .iter()
            .filter(|p| p.value_usd > Decimal::ZERO)
            .collect();
        positions.sort_by(|a, b| b.value_usd.cmp(&a.value_usd));
        positions.truncate(limit);
        positions
    }
}

/// The most recent chat message a user exchanged with an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub created_at: DateTime<Utc>,
    /// Message type, e.g. "text" or "transaction".
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub agent_name: Option<String>,
}
