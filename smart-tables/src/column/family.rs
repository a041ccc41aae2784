//! Column families

use super::ColumnKind;

/// A registry of column kinds for one kind of table, in display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnFamily {
    /// The dynamic user table: persona columns then import extensions.
    Users,
    /// The imported-users table.
    ImportedUsers,
    /// Per-user chat activity, appended to another family.
    ChatSession,
}

impl ColumnFamily {
    pub fn kinds(&self) -> &'static [ColumnKind] {
        match self {
            ColumnFamily::Users => &[
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
            ],
            ColumnFamily::ImportedUsers => &[
                ColumnKind::Identity,
                ColumnKind::Email,
                ColumnKind::WalletAddress,
                ColumnKind::Name,
                ColumnKind::Source,
            ],
            ColumnFamily::ChatSession => &[
                ColumnKind::LatestMessageAt,
                ColumnKind::LatestUserMessage,
                ColumnKind::LatestInteractedAgent,
            ],
        }
    }
}
