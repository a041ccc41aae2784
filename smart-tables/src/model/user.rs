//! Native dashboard users

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::PersonaBundle;

/// A user who signed in to the product directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeUser {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "wallet_address")]
    pub wallet_address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A native user with a computed persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedUser {
    #[serde(flatten)]
    pub user: NativeUser,
    #[serde(rename = "personaData")]
    pub persona: PersonaBundle,
}

impl NativeUser {
    pub fn new(id: impl Into<String>, wallet_address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            wallet_address: wallet_address.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Attaches a persona, producing an enriched user.
    pub fn enrich(self, persona: PersonaBundle) -> EnrichedUser {
        EnrichedUser { user: self, persona }
    }
}
