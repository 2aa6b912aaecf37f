//! Book and chapter domain models

use crate::error::AppError;
use crate::types::{Duration, Validator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Character reserved for composite progress keys (`<book>_<index>`)
pub const KEY_SEPARATOR: char = '_';

/// Unique identifier for a book
///
/// Seeded books use readable slugs, imported ones `imported-<unix millis>`.
/// The progress key separator is never part of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    /// Parses an identifier, rejecting empty strings and the key separator
    pub fn parse(s: &str) -> Result<Self, AppError> {
        if s.trim().is_empty() {
            return Err(AppError::InvalidIdentifier {
                value: s.to_string(),
                reason: "book id must not be empty".to_string(),
            });
        }
        if s.contains(KEY_SEPARATOR) {
            return Err(AppError::InvalidIdentifier {
                value: s.to_string(),
                reason: format!("book id must not contain '{}'", KEY_SEPARATOR),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BookId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl std::str::FromStr for BookId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How a book's cover is drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Cover {
    /// CSS gradient descriptor
    Gradient(String),
    /// Asset URL or `data:` URL of an image
    Image(String),
}

impl Cover {
    /// Returns true if the cover is an image rather than a gradient
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    /// Raw descriptor, whichever kind it is
    pub fn value(&self) -> &str {
        match self {
            Self::Gradient(v) | Self::Image(v) => v,
        }
    }
}

impl Default for Cover {
    fn default() -> Self {
        Self::Gradient(String::new())
    }
}

/// One playable unit of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based position within the book
    pub id: u32,
    pub title: String,
    pub duration: Duration,
    /// Only set for books imported from disk
    pub file_path: Option<PathBuf>,
}

impl Chapter {
    /// Creates a chapter without a backing file
    pub fn new(id: u32, title: impl Into<String>, duration: Duration) -> Self {
        Self {
            id,
            title: title.into(),
            duration,
            file_path: None,
        }
    }

    /// Attaches the audio file this chapter was imported from
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// A book in the library with its ordered chapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub cover: Cover,
    pub year: i32,
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Creates a book with no chapters and an empty gradient cover
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            cover: Cover::default(),
            year,
            chapters: Vec::new(),
        }
    }

    /// Builder-style chapter list
    pub fn with_chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.chapters = chapters;
        self
    }

    /// Builder-style cover
    pub fn with_cover(mut self, cover: Cover) -> Self {
        self.cover = cover;
        self
    }

    /// Chapter at a 0-based position
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Sum of all chapter durations
    pub fn total_duration(&self) -> Duration {
        self.chapters.iter().map(|c| c.duration).sum()
    }
}

impl Validator for Book {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title cannot be empty".to_string());
        }

        if self.chapters.is_empty() {
            errors.push("Book must have at least one chapter".to_string());
        }

        let mut previous = 0;
        for chapter in &self.chapters {
            if chapter.id <= previous {
                errors.push(format!(
                    "Chapter ids must be strictly increasing from 1 (found {} after {})",
                    chapter.id, previous
                ));
            }
            previous = chapter.id;

            if let Err(chapter_errors) = chapter.validate() {
                errors.extend(chapter_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validator for Chapter {
    fn validate(&self) -> Result<(), Vec<String>> {
        if self.title.trim().is_empty() {
            Err(vec![format!("Chapter {} title cannot be empty", self.id)])
        } else {
            Ok(())
        }
    }
}
