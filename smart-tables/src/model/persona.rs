//! Persona bundle attached to enriched users

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// Enrichment data computed for a native user's wallet.
///
/// Every field is optional on the wire; a bundle that is present but sparse
/// still marks its user as enriched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonaBundle {
    pub dominant_trait: Option<String>,
    pub trait_scores: Vec<TraitScore>,
    pub portfolio: PortfolioSnapshot,
    pub activities: ActivitySummary,
    pub wallet_created_at: Option<DateTime<Utc>>,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitScore {
    #[serde(rename = "trait")]
    pub name: String,
    pub score: f64,
}

/// Point-in-time portfolio captured with the persona.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioSnapshot {
    pub total_value: Option<Decimal>,
    /// Holdings keyed by chain name.
    pub tokens: BTreeMap<String, Vec<TokenHolding>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value_usd: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivitySummary {
    pub total_transactions: Option<u64>,
    pub latest: Option<ActivityEntry>,
    /// Per-chain activity feed.
    pub token_activity: BTreeMap<String, Vec<ActivityEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub summary: String,
}

impl PersonaBundle {
    /// The dominant trait, or the highest-scoring one when none is named.
    pub fn dominant_trait(&self) -> Option<&str> {
        if let Some(name) = self.dominant_trait.as_deref()
            && !name.is_empty()
        {
            return Some(name);
        }
        self.trait_scores
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|t| t.name.as_str())
    }

    pub fn total_value(&self) -> Option<Decimal> {
        self.portfolio.total_value
    }

    /// All holdings across chains, in chain-name order.
    pub fn holdings(&self) -> impl Iterator<Item = &TokenHolding> {
        self.portfolio.tokens.values().flatten()
    }

    /// Token symbols with duplicates across chains removed, first seen wins.
    pub fn distinct_symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = Vec::new();
        for holding in self.holdings() {
            if !symbols.iter().any(|s| s.eq_ignore_ascii_case(&holding.symbol)) {
                symbols.push(&holding.symbol);
            }
        }
        symbols
    }

    /// Reported transaction total, or the size of the activity feed.
    pub fn transaction_count(&self) -> u64 {
        self.activities.total_transactions.unwrap_or_else(|| {
            self.activities
                .token_activity
                .values()
                .map(|entries| entries.len() as u64)
                .sum()
        })
    }

    /// The explicit latest activity, or the newest entry in the feed.
    pub fn latest_activity(&self) -> Option<&ActivityEntry> {
        self.activities.latest.as_ref().or_else(|| {
            self.activities
                .token_activity
                .values()
                .flatten()
                .max_by_key(|entry| entry.timestamp)
        })
    }
}
