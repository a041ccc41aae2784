//! Cell fragments, renderers and per-row async data

mod content;
pub mod format;
mod render;
mod store;
mod wallet;

pub use content::*;
pub use render::*;
pub use store::*;
pub use wallet::*;

use chrono::DateTime;
use chrono::Utc;

/// Inputs shared by every cell renderer in one view.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Reference time for relative timestamps.
    pub now: DateTime<Utc>,
    pub wallets: Option<&'a AsyncCellStore<WalletSnapshot>>,
    pub messages: Option<&'a AsyncCellStore<LastMessage>>,
}

impl<'a> RenderContext<'a> {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            wallets: None,
            messages: None,
        }
    }

    pub fn with_wallets(mut self, store: &'a AsyncCellStore<WalletSnapshot>) -> Self {
        self.wallets = Some(store);
        self
    }

    pub fn with_messages(mut self, store: &'a AsyncCellStore<LastMessage>) -> Self {
        self.messages = Some(store);
        self
    }
}
