//! Reads core: domain types shared by every crate in the workspace

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{Catalog, Library};
pub use error::{AppError, Result};
pub use types::{Book, BookId, Chapter, Cover, Duration, Timestamp, Validator, KEY_SEPARATOR};
