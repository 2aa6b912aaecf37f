//! Domain types for Reads
//!
//! - `book`: books, chapters, identifiers and covers
//! - `common`: time units and the `Validator` trait

mod book;
mod common;

pub use book::{Book, BookId, Chapter, Cover, KEY_SEPARATOR};
pub use common::{Duration, Timestamp, Validator};
