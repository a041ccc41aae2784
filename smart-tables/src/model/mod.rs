//! Row and value types

mod imported;
mod persona;
mod record;
mod row;
mod user;
mod value;

pub use imported::*;
pub use persona::*;
pub use record::*;
pub use row::*;
pub use user::*;
pub use value::*;
