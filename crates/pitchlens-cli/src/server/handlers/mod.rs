//! API request handlers.

mod analysis;
mod roster;

pub use analysis::*;
pub use roster::*;
