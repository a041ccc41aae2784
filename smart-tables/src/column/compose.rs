//! Dynamic column composition

use std::sync::Arc;

use log::debug;
use log::warn;

use super::ColumnDescriptor;
use super::ColumnFamily;
use super::ColumnKind;
use crate::error::CompositionError;
use crate::model::UserRow;
use crate::shape::OptionalField;
use crate::shape::ShapeSignature;
use crate::shape::ShapeTag;

/// The ordered columns for one batch shape.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    kinds: Vec<ColumnKind>,
    columns: Vec<ColumnDescriptor<UserRow>>,
    signature: ShapeSignature,
}

impl ColumnSet {
    fn new(kinds: Vec<ColumnKind>, signature: ShapeSignature) -> Self {
        let columns = kinds.iter().map(|kind| kind.descriptor()).collect();
        Self {
            kinds,
            columns,
            signature,
        }
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn columns(&self) -> &[ColumnDescriptor<UserRow>] {
        &self.columns
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.iter().map(|kind| kind.key())
    }

    pub fn contains(&self, kind: ColumnKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn signature(&self) -> &ShapeSignature {
        &self.signature
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Picks the applicable kinds for a signature.
///
/// Identity always comes first. Every other kind of the family is included
/// when at least one row meets its requirement.
pub fn select_kinds(family: ColumnFamily, signature: &ShapeSignature, chat: bool) -> Vec<ColumnKind> {
    if signature.is_empty() {
        return vec![ColumnKind::Identity];
    }

    let mut kinds = vec![ColumnKind::Identity];
    match family {
        ColumnFamily::ImportedUsers => {
            if signature.has_field(OptionalField::Email) {
                kinds.push(ColumnKind::Email);
            }
            if signature.has_field(OptionalField::Name) {
                kinds.push(ColumnKind::Name);
            }
            if kinds.len() == 1 {
                kinds.extend([ColumnKind::Email, ColumnKind::WalletAddress, ColumnKind::Source]);
            }
        }
        ColumnFamily::Users | ColumnFamily::ChatSession => {
            kinds.extend(
                family
                    .kinds()
                    .iter()
                    .copied()
                    .filter(|kind| *kind != ColumnKind::Identity && kind.requirement().present_in(signature)),
            );
        }
    }

    if chat && family != ColumnFamily::ChatSession {
        kinds.extend(ColumnFamily::ChatSession.kinds().iter().copied());
    }
    kinds
}

/// Composes columns for row batches, caching on the batch signature.
///
/// # Example
///
/// ```
/// use smart_tables::column::ColumnComposer;
/// use smart_tables::column::ColumnFamily;
/// use smart_tables::column::ColumnKind;
///
/// let mut composer = ColumnComposer::new(ColumnFamily::Users);
/// let set = composer.compose(&[]);
/// assert_eq!(set.kinds(), &[ColumnKind::Identity]);
/// ```
#[derive(Debug)]
pub struct ColumnComposer {
    family: ColumnFamily,
    chat: bool,
    cached: Option<Arc<ColumnSet>>,
    diagnostics: Vec<CompositionError>,
}

impl ColumnComposer {
    pub fn new(family: ColumnFamily) -> Self {
        Self {
            family,
            chat: false,
            cached: None,
            diagnostics: Vec::new(),
        }
    }

    /// Appends the chat-session columns to every composed set.
    pub fn with_chat_columns(mut self, enabled: bool) -> Self {
        if self.chat != enabled {
            self.cached = None;
        }
        self.chat = enabled;
        self
    }

    pub fn family(&self) -> ColumnFamily {
        self.family
    }

    /// Returns the columns for `rows`.
    ///
    /// The same `Arc` is returned for as long as the batch signature stays
    /// the same, so callers can cheaply detect "columns unchanged".
    pub fn compose(&mut self, rows: &[UserRow]) -> Arc<ColumnSet> {
        self.diagnostics = rows
            .iter()
            .filter(|row| row.shape() == ShapeTag::Unknown)
            .map(|row| CompositionError::unknown_shape(row.row_id()))
            .collect();
        if let Some(first) = self.diagnostics.first() {
            warn!(
                "{} of {} rows have an unrecognized shape (first: {}); showing identity only for them",
                self.diagnostics.len(),
                rows.len(),
                first.row_id()
            );
        }

        let signature = ShapeSignature::of(rows);
        if let Some(cached) = &self.cached
            && cached.signature == signature
        {
            return Arc::clone(cached);
        }

        let kinds = select_kinds(self.family, &signature, self.chat);
        debug!("Composed {} columns for {} rows: {:?}", kinds.len(), rows.len(), kinds);
        let set = Arc::new(ColumnSet::new(kinds, signature));
        self.cached = Some(Arc::clone(&set));
        set
    }

    /// Diagnostics raised by the most recent [`compose`](Self::compose).
    pub fn diagnostics(&self) -> &[CompositionError] {
        &self.diagnostics
    }
}
