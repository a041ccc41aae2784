//! Column descriptors, the user column registry, composition and
//! user-defined columns

mod accessor;
mod compose;
mod custom;
mod descriptor;
mod family;
mod kind;

pub use accessor::*;
pub use compose::*;
pub use custom::*;
pub use descriptor::*;
pub use family::*;
pub use kind::*;
