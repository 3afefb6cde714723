//! Price tables - reference market prices keyed by city

pub mod builtin;
pub mod parse;
pub mod types;

pub use builtin::builtin_price_book;
pub use parse::{load_price_book, parse_price_csv, LoadStats};
pub use types::*;
