//! Users imported from external sources

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// Where an imported user came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportSource {
    Native,
    Privy,
    Contract,
    Manual,
    NftHolders,
}

impl ImportSource {
    /// Label shown in the source badge.
    pub fn label(&self) -> &'static str {
        match self {
            ImportSource::Native => "Native",
            ImportSource::Privy => "Privy",
            ImportSource::Contract => "Contract",
            ImportSource::Manual => "Manual",
            ImportSource::NftHolders => "NFT Holders",
        }
    }
}

impl std::fmt::Display for ImportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// On-chain data attached to contract imports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportExtra {
    pub interaction_count: Option<u64>,
    pub last_interaction: Option<DateTime<Utc>>,
    pub token_balance: Option<Decimal>,
    /// Any other fields the importer attached.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl ImportExtra {
    pub fn is_empty(&self) -> bool {
        self.interaction_count.is_none()
            && self.last_interaction.is_none()
            && self.token_balance.is_none()
            && self.other.values().all(serde_json::Value::is_null)
    }
}

/// A user record brought in by an importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "wallet_address")]
    pub wallet_address: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Missing on rows whose importer did not record one.
    #[serde(default)]
    pub source: Option<ImportSource>,
    #[serde(default)]
    pub extra: Option<ImportExtra>,
}

impl ImportedUser {
    pub fn new(wallet_address: impl Into<String>, source: ImportSource) -> Self {
        Self {
            id: None,
            wallet_address: wallet_address.into(),
            email: None,
            name: None,
            avatar: None,
            source: Some(source),
            extra: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_extra(mut self, extra: ImportExtra) -> Self {
        self.extra = Some(extra);
        self
    }

    /// The email, ignoring blanks.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// The extra data, ignoring an empty object.
    pub fn extra(&self) -> Option<&ImportExtra> {
        self.extra.as_ref().filter(|e| !e.is_empty())
    }
}
