//! Data models for eshotel

mod account;
mod listing;

pub use account::*;
pub use listing::*;
