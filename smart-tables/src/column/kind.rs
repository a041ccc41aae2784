//! User column registry

use super::ColumnDescriptor;
use super::ColumnType;
use crate::cell;
use crate::grid::Aggregation;
use crate::model::UserRow;
use crate::model::Value;
use crate::shape::OptionalField;
use crate::shape::ShapeSignature;
use crate::shape::ShapeTag;

/// Every column the user tables can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKind {
    Identity,
    Verified,
    FirstSignedIn,
    Trait,
    PortfolioValue,
    Transactions,
    Tokens,
    Activity,
    WalletCreatedAt,
    Email,
    WalletAddress,
    Name,
    ContractData,
    Source,
    LatestMessageAt,
    LatestUserMessage,
    LatestInteractedAgent,
}

/// The structural condition a row must meet for a column to apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    /// Any row whose shape is recognised.
    Known,
    Tag(ShapeTag),
    Field(OptionalField),
    /// Any imported row that names its source, whatever its shape.
    Imported,
}

impl Requirement {
    /// `true` if at least one row in the batch meets the requirement.
    pub fn present_in(&self, signature: &ShapeSignature) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::Known => signature.tags().any(|tag| tag != ShapeTag::Unknown),
            Requirement::Tag(tag) => signature.has_tag(*tag),
            Requirement::Field(field) => signature.has_field(*field),
            Requirement::Imported => signature.has_imports(),
        }
    }

    pub fn satisfied_by(&self, row: &UserRow) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::Known => row.shape() != ShapeTag::Unknown,
            Requirement::Tag(tag) => row.shape() == *tag,
            Requirement::Field(OptionalField::Email) => row.email().is_some(),
            Requirement::Field(OptionalField::Name) => row.name().is_some(),
            Requirement::Field(OptionalField::Extra) => row.extra().is_some(),
            Requirement::Imported => row.source().is_some(),
        }
    }
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 17] = [
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
        ColumnKind::WalletAddress,
        ColumnKind::Name,
        ColumnKind::ContractData,
        ColumnKind::Source,
        ColumnKind::LatestMessageAt,
        ColumnKind::LatestUserMessage,
        ColumnKind::LatestInteractedAgent,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            ColumnKind::Identity => "identity",
            ColumnKind::Verified => "talentProtocolCheckmark",
            ColumnKind::FirstSignedIn => "firstSignedIn",
            ColumnKind::Trait => "trait",
            ColumnKind::PortfolioValue => "portfolioValue",
            ColumnKind::Transactions => "transactions",
            ColumnKind::Tokens => "tokens",
            ColumnKind::Activity => "activity",
            ColumnKind::WalletCreatedAt => "walletCreatedAt",
            ColumnKind::Email => "email",
            ColumnKind::WalletAddress => "walletAddress",
            ColumnKind::Name => "name",
            ColumnKind::ContractData => "contractData",
            ColumnKind::Source => "source",
            ColumnKind::LatestMessageAt => "latestMessageAt",
            ColumnKind::LatestUserMessage => "latestUserMessage",
            ColumnKind::LatestInteractedAgent => "latestInteractedAgent",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            ColumnKind::Identity => "User",
            ColumnKind::Verified => "Verified",
            ColumnKind::FirstSignedIn => "First Signed In",
            ColumnKind::Trait => "Trait",
            ColumnKind::PortfolioValue => "Portfolio Value",
            ColumnKind::Transactions => "Transactions",
            ColumnKind::Tokens => "Tokens",
            ColumnKind::Activity => "Latest Activity",
            ColumnKind::WalletCreatedAt => "Wallet Created",
            ColumnKind::Email => "Email",
            ColumnKind::WalletAddress => "Wallet Address",
            ColumnKind::Name => "Name",
            ColumnKind::ContractData => "Contract Data",
            ColumnKind::Source => "Source",
            ColumnKind::LatestMessageAt => "Last Message",
            ColumnKind::LatestUserMessage => "Last User Message",
            ColumnKind::LatestInteractedAgent => "Last Agent",
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnKind::Identity
            | ColumnKind::Trait
            | ColumnKind::Email
            | ColumnKind::WalletAddress
            | ColumnKind::Name
            | ColumnKind::Source => ColumnType::String,
            ColumnKind::Verified => ColumnType::Boolean,
            ColumnKind::FirstSignedIn | ColumnKind::Activity | ColumnKind::WalletCreatedAt => ColumnType::Date,
            ColumnKind::PortfolioValue | ColumnKind::Transactions | ColumnKind::ContractData => ColumnType::Number,
            ColumnKind::Tokens => ColumnType::Array,
            ColumnKind::LatestMessageAt | ColumnKind::LatestUserMessage | ColumnKind::LatestInteractedAgent => {
                ColumnType::Component
            }
        }
    }

    /// `(size, min_size)` in pixels.
    pub fn size(&self) -> (u16, u16) {
        match self {
            ColumnKind::Identity => (240, 240),
            ColumnKind::Verified => (110, 80),
            ColumnKind::FirstSignedIn => (150, 120),
            ColumnKind::Trait => (120, 100),
            ColumnKind::PortfolioValue | ColumnKind::Transactions => (160, 120),
            ColumnKind::Tokens => (270, 200),
            ColumnKind::Activity => (400, 250),
            ColumnKind::WalletCreatedAt | ColumnKind::Email | ColumnKind::ContractData => (200, 150),
            ColumnKind::WalletAddress => (160, 120),
            ColumnKind::Name | ColumnKind::Source => (120, 100),
            ColumnKind::LatestMessageAt | ColumnKind::LatestInteractedAgent => (180, 140),
            ColumnKind::LatestUserMessage => (200, 150),
        }
    }

    /// Columns backed by per-row async data cannot be sorted or aggregated.
    pub fn is_async(&self) -> bool {
        matches!(
            self,
            ColumnKind::LatestMessageAt | ColumnKind::LatestUserMessage | ColumnKind::LatestInteractedAgent
        )
    }

    pub fn sortable(&self) -> bool {
        !self.is_async()
    }

    pub fn aggregation(&self) -> Option<Aggregation> {
        match self {
            ColumnKind::Identity
            | ColumnKind::Verified
            | ColumnKind::Email
            | ColumnKind::WalletAddress
            | ColumnKind::Name => Some(Aggregation::Count),
            ColumnKind::FirstSignedIn | ColumnKind::Activity | ColumnKind::WalletCreatedAt => {
                Some(Aggregation::DateRange)
            }
            ColumnKind::Trait | ColumnKind::Source => Some(Aggregation::Top(3)),
            ColumnKind::PortfolioValue => Some(Aggregation::Currency),
            ColumnKind::Transactions | ColumnKind::ContractData => Some(Aggregation::Sum),
            ColumnKind::Tokens
            | ColumnKind::LatestMessageAt
            | ColumnKind::LatestUserMessage
            | ColumnKind::LatestInteractedAgent => None,
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            ColumnKind::Identity => Requirement::Always,
            ColumnKind::LatestMessageAt | ColumnKind::LatestUserMessage | ColumnKind::LatestInteractedAgent => {
                Requirement::Known
            }
            ColumnKind::Verified
            | ColumnKind::FirstSignedIn
            | ColumnKind::Trait
            | ColumnKind::PortfolioValue
            | ColumnKind::Transactions
            | ColumnKind::Tokens
            | ColumnKind::Activity
            | ColumnKind::WalletCreatedAt => Requirement::Tag(ShapeTag::Enriched),
            ColumnKind::Email => Requirement::Field(OptionalField::Email),
            ColumnKind::Name => Requirement::Field(OptionalField::Name),
            ColumnKind::ContractData => Requirement::Field(OptionalField::Extra),
            ColumnKind::WalletAddress | ColumnKind::Source => Requirement::Imported,
        }
    }

    /// The sort/filter/footer value for a row.
    ///
    /// Reads only the row itself, never async stores: portfolio and token
    /// columns use the persona snapshot.
    pub fn value(&self, row: &UserRow) -> Value {
        let persona = row.persona();
        match self {
            ColumnKind::Identity => {
                let label = row.name().or(row.email()).unwrap_or_default();
                Value::String(format!("{label}{}", row.wallet_address()).to_lowercase())
            }
            ColumnKind::Verified => Value::from(persona.map(|p| p.verified)),
            ColumnKind::FirstSignedIn => Value::from(persona.and(row.created_at())),
            ColumnKind::Trait => Value::from(persona.and_then(|p| p.dominant_trait())),
            ColumnKind::PortfolioValue => Value::from(persona.and_then(|p| p.total_value())),
            ColumnKind::Transactions => Value::from(persona.map(|p| p.transaction_count())),
            ColumnKind::Tokens => match persona {
                Some(p) => Value::List(p.holdings().map(|h| Value::from(h.symbol.as_str())).collect()),
                None => Value::Null,
            },
            ColumnKind::Activity => Value::from(persona.and_then(|p| p.latest_activity()).map(|a| a.timestamp)),
            ColumnKind::WalletCreatedAt => Value::from(persona.and_then(|p| p.wallet_created_at)),
            ColumnKind::Email => Value::from(row.email()),
            ColumnKind::WalletAddress => Value::from(row.wallet_address()),
            ColumnKind::Name => Value::from(row.name()),
            ColumnKind::ContractData => Value::from(row.extra().and_then(|e| e.interaction_count)),
            ColumnKind::Source => Value::from(row.source().map(|s| s.label())),
            ColumnKind::LatestMessageAt | ColumnKind::LatestUserMessage | ColumnKind::LatestInteractedAgent => {
                Value::Null
            }
        }
    }

    /// Builds the grid column for this kind.
    pub fn descriptor(self) -> ColumnDescriptor<UserRow> {
        let (size, min_size) = self.size();
        let mut column = ColumnDescriptor::new(
            self.key(),
            self.header(),
            self.column_type(),
            move |row: &UserRow| self.value(row),
            move |row: &UserRow, ctx: &cell::RenderContext<'_>| cell::render_user_cell(self, row, ctx),
        )
        .with_size(size, min_size)
        .with_sortable(self.sortable())
        .with_resizable(self != ColumnKind::Identity);
        column.aggregation = self.aggregation();
        if self == ColumnKind::Identity {
            column = column.frozen();
        }
        column
    }
}
