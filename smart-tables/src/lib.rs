//! Polymorphic user data grids
//!
//! Classifies heterogeneous user rows by shape, composes the columns that
//! apply to a batch, and derives a sorted, filtered, paginated view whose
//! cells are renderer-neutral fragments. Per-row async data (live wallet
//! positions, last chat messages) is fetched through injected data sources.

pub mod cell;
pub mod column;
pub mod error;
pub mod grid;
pub mod model;
pub mod query;
pub mod render;
pub mod shape;
pub mod table;

pub use grid::Grid;
pub use model::UserRow;
pub use table::UserTable;
