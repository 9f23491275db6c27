//! Formatting helpers shared by the index builder and the query layer

mod date;

pub use date::*;
