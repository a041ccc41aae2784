//! Tagged user row

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::EnrichedUser;
use super::ImportExtra;
use super::ImportSource;
use super::ImportedUser;
use super::NativeUser;
use super::PersonaBundle;
use crate::error::RowParseError;
use crate::shape;
use crate::shape::ShapeTag;

/// One user in a heterogeneous batch.
///
/// Raw JSON is classified once by [`UserRow::from_json`]; everything downstream
/// matches on the variant instead of re-inspecting properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserRow {
    Enriched(EnrichedUser),
    Native(NativeUser),
    Imported(ImportedUser),
}

impl UserRow {
    /// Converts one JSON object into a typed row.
    ///
    /// The variant follows [`classify_json`](shape::classify_json): a
    /// persona makes the row enriched, an email or extra data makes it
    /// imported. Rows with neither are imported when they carry a `source`
    /// and native otherwise. `index` is only used in error messages.
    pub fn from_json(index: usize, json: serde_json::Value) -> Result<Self, RowParseError> {
        let Some(object) = json.as_object() else {
            return Err(RowParseError::NotAnObject { index });
        };
        let has_source = object.get("source").is_some_and(|v| !v.is_null());
        let decode = |source: serde_json::Error| RowParseError::Decode { index, source };

        let row = match shape::classify_json(&json) {
            ShapeTag::Enriched => UserRow::Enriched(serde_json::from_value(json).map_err(decode)?),
            ShapeTag::ImportedWithEmail | ShapeTag::ImportedWithOnchainExtra => {
                UserRow::Imported(serde_json::from_value(json).map_err(decode)?)
            }
            ShapeTag::Unknown if has_source => UserRow::Imported(serde_json::from_value(json).map_err(decode)?),
            ShapeTag::Unknown => UserRow::Native(serde_json::from_value(json).map_err(decode)?),
        };

        if row.row_id().is_empty() {
            return Err(RowParseError::MissingIdentity { index });
        }
        Ok(row)
    }

    /// Converts a JSON array of rows, failing on the first bad entry.
    pub fn parse_batch(json: serde_json::Value) -> Result<Vec<Self>, RowParseError> {
        let serde_json::Value::Array(items) = json else {
            return Err(RowParseError::NotAnArray);
        };
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| Self::from_json(index, item))
            .collect()
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Stable row key: the id when present, otherwise the wallet address.
    pub fn row_id(&self) -> &str {
        match self {
            UserRow::Enriched(u) => native_id(&u.user),
            UserRow::Native(u) => native_id(u),
            UserRow::Imported(u) => u
                .id
                .as_deref()
                .filter(|id| !id.is_empty())
                .unwrap_or(&u.wallet_address),
        }
    }

    pub fn wallet_address(&self) -> &str {
        match self {
            UserRow::Enriched(u) => &u.user.wallet_address,
            UserRow::Native(u) => &u.wallet_address,
            UserRow::Imported(u) => &u.wallet_address,
        }
    }

    pub fn name(&self) -> Option<&str> {
        let name = match self {
            UserRow::Enriched(u) => u.user.name.as_deref(),
            UserRow::Native(u) => u.name.as_deref(),
            UserRow::Imported(u) => u.name.as_deref(),
        };
        name.filter(|n| !n.trim().is_empty())
    }

    pub fn avatar(&self) -> Option<&str> {
        match self {
            UserRow::Enriched(u) => u.user.avatar.as_deref(),
            UserRow::Native(u) => u.avatar.as_deref(),
            UserRow::Imported(u) => u.avatar.as_deref(),
        }
    }

    // =========================================================================
    // Shape-specific data
    // =========================================================================

    pub fn persona(&self) -> Option<&PersonaBundle> {
        match self {
            UserRow::Enriched(u) => Some(&u.persona),
            _ => None,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            UserRow::Enriched(u) => u.user.created_at,
            UserRow::Native(u) => u.created_at,
            UserRow::Imported(_) => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            UserRow::Imported(u) => u.email(),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<ImportSource> {
        match self {
            UserRow::Imported(u) => u.source,
            _ => None,
        }
    }

    pub fn extra(&self) -> Option<&ImportExtra> {
        match self {
            UserRow::Imported(u) => u.extra(),
            _ => None,
        }
    }

    pub fn shape(&self) -> ShapeTag {
        shape::classify(self)
    }
}

fn native_id(user: &NativeUser) -> &str {
    if user.id.is_empty() { &user.wallet_address } else { &user.id }
}

impl From<EnrichedUser> for UserRow {
    fn from(user: EnrichedUser) -> Self {
        UserRow::Enriched(user)
    }
}

impl From<NativeUser> for UserRow {
    fn from(user: NativeUser) -> Self {
        UserRow::Native(user)
    }
}

impl From<ImportedUser> for UserRow {
    fn from(user: ImportedUser) -> Self {
        UserRow::Imported(user)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_tags_each_family() {
        let enriched = UserRow::from_json(
            0,
            json!({"id": "u1", "walletAddress": "0x1", "personaData": {"verified": true}}),
        )
        .unwrap();
        assert!(matches!(enriched, UserRow::Enriched(_)));

        let native = UserRow::from_json(1, json!({"id": "u2", "wallet_address": "0x2"})).unwrap();
        assert!(matches!(native, UserRow::Native(_)));
        assert_eq!(native.wallet_address(), "0x2");

        let imported =
            UserRow::from_json(2, json!({"walletAddress": "0x3", "source": "privy", "email": "a@b.c"})).unwrap();
        assert_eq!(imported.source(), Some(ImportSource::Privy));
        assert_eq!(imported.row_id(), "0x3");
    }

    #[test]
    fn test_typed_shape_agrees_with_json_classification() {
        let cases = [
            (json!({"id": "u1", "walletAddress": "0x1", "personaData": {}}), ShapeTag::Enriched),
            (json!({"id": "u9", "walletAddress": "0x9", "email": "eve@x.io"}), ShapeTag::ImportedWithEmail),
            (
                json!({"walletAddress": "0x8", "email": "a@b.c", "extra": {"interactionCount": 2}}),
                ShapeTag::ImportedWithEmail,
            ),
            (json!({"walletAddress": "0x7", "extra": {"tokenIds": [1, 2]}}), ShapeTag::ImportedWithOnchainExtra),
            (json!({"walletAddress": "0x6", "extra": {"note": null}}), ShapeTag::Unknown),
            (json!({"walletAddress": "0x5", "source": "manual"}), ShapeTag::Unknown),
            (json!({"id": "u4", "walletAddress": "0x4", "email": "  "}), ShapeTag::Unknown),
        ];
        for (json, expected) in cases {
            let json_tag = shape::classify_json(&json);
            let row = UserRow::from_json(0, json.clone()).unwrap();
            assert_eq!(json_tag, expected, "{json}");
            assert_eq!(row.shape(), json_tag, "{json}");
        }
    }

    #[test]
    fn test_email_without_source_is_kept() {
        let row = UserRow::from_json(0, json!({"id": "u9", "walletAddress": "0x9", "email": "eve@x.io"})).unwrap();
        assert!(matches!(row, UserRow::Imported(_)));
        assert_eq!(row.email(), Some("eve@x.io"));
        assert_eq!(row.source(), None);
        assert_eq!(row.row_id(), "u9");
    }

    #[test]
    fn test_null_persona_is_native() {
        let row = UserRow::from_json(0, json!({"id": "u1", "personaData": null})).unwrap();
        assert!(matches!(row, UserRow::Native(_)));
    }

    #[test]
    fn test_missing_identity_is_rejected() {
        let err = UserRow::from_json(4, json!({"name": "ghost"})).unwrap_err();
        assert!(matches!(err, RowParseError::MissingIdentity { index: 4 }));
    }

    #[test]
    fn test_bad_source_reports_decode_error() {
        let err = UserRow::from_json(0, json!({"walletAddress": "0x1", "source": "carrier-pigeon"})).unwrap_err();
        assert!(matches!(err, RowParseError::Decode { index: 0, .. }));
    }

    #[test]
    fn test_parse_batch_requires_array() {
        assert!(matches!(UserRow::parse_batch(json!({})), Err(RowParseError::NotAnArray)));
        let rows = UserRow::parse_batch(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
