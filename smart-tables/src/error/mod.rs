//! Error types

mod composition;
mod config;
mod custom;
mod data;
mod filter;
mod grid;
mod parse;

pub use composition::*;
pub use config::*;
pub use custom::*;
pub use data::*;
pub use filter::*;
pub use grid::*;
pub use parse::*;
