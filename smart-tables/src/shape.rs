//! Row shape discrimination

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::model::ImportSource;
use crate::model::Record;
use crate::model::UserRow;
use crate::model::Value;

/// The closed set of row shapes the column registry knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShapeTag {
    /// Native user with a persona bundle.
    Enriched,
    /// Imported user with an email address.
    ImportedWithEmail,
    /// Imported user with on-chain extra data and no email.
    ImportedWithOnchainExtra,
    Unknown,
}

/// Optional fields whose presence anywhere in a batch adds columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionalField {
    Email,
    Name,
    Extra,
}

fn tag_for(has_persona: bool, has_email: bool, has_extra: bool) -> ShapeTag {
    if has_persona {
        ShapeTag::Enriched
    } else if has_email {
        ShapeTag::ImportedWithEmail
    } else if has_extra {
        ShapeTag::ImportedWithOnchainExtra
    } else {
        ShapeTag::Unknown
    }
}

/// Classifies a typed row. Email wins over extra data.
pub fn classify(row: &UserRow) -> ShapeTag {
    match row {
        UserRow::Enriched(_) => ShapeTag::Enriched,
        UserRow::Imported(user) => tag_for(false, user.email().is_some(), user.extra().is_some()),
        UserRow::Native(_) => ShapeTag::Unknown,
    }
}

/// Classifies raw JSON by property presence.
pub fn classify_json(json: &serde_json::Value) -> ShapeTag {
    let Some(object) = json.as_object() else {
        return ShapeTag::Unknown;
    };
    let has_persona = object.get("personaData").is_some_and(|v| !v.is_null());
    let has_email = object
        .get("email")
        .and_then(|v| v.as_str())
        .is_some_and(|e| !e.trim().is_empty());
    let has_extra = object
        .get("extra")
        .and_then(|v| v.as_object())
        .is_some_and(|extra| extra.values().any(|v| !v.is_null()));
    tag_for(has_persona, has_email, has_extra)
}

/// Classifies a generic record with the same property rules as
/// [`classify_json`].
pub fn classify_record(record: &Record) -> ShapeTag {
    let has_email = record
        .get("email")
        .and_then(Value::as_str)
        .is_some_and(|e| !e.trim().is_empty());
    let has_extra = match record.get("extra") {
        Some(Value::Json(serde_json::Value::Object(extra))) => extra.values().any(|v| !v.is_null()),
        _ => false,
    };
    tag_for(record.contains("personaData"), has_email, has_extra)
}

/// What a batch of rows contains, taken over every row.
///
/// Two batches with equal signatures compose to the same columns, so the
/// composer caches on this value. Built from sets, so row order never
/// changes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ShapeSignature {
    tags: BTreeSet<ShapeTag>,
    sources: BTreeSet<ImportSource>,
    fields: BTreeSet<OptionalField>,
}

impl ShapeSignature {
    pub fn of(rows: &[UserRow]) -> Self {
        let mut signature = Self::default();
        for row in rows {
            signature.tags.insert(row.shape());
            if let Some(source) = row.source() {
                signature.sources.insert(source);
            }
            if row.email().is_some() {
                signature.fields.insert(OptionalField::Email);
            }
            if row.name().is_some() {
                signature.fields.insert(OptionalField::Name);
            }
            if row.extra().is_some() {
                signature.fields.insert(OptionalField::Extra);
            }
        }
        signature
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn has_tag(&self, tag: ShapeTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn has_field(&self, field: OptionalField) -> bool {
        self.fields.contains(&field)
    }

    pub fn has_source(&self, source: ImportSource) -> bool {
        self.sources.contains(&source)
    }

    /// `true` if any row came from an importer.
    pub fn has_imports(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = ShapeTag> + '_ {
        self.tags.iter().copied()
    }
}
