//! Filtering, sorting, search and pagination primitives

mod filter;
mod order;
mod page;
mod search;
mod sort_key;

pub use filter::*;
pub use order::*;
pub use page::*;
pub use search::*;
pub use sort_key::*;
