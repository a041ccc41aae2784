//! Terminal rendering of grid views

mod text;

pub use text::*;
