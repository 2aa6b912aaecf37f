//! Book lookup and the in-memory library

use crate::error::{AppError, Result};
use crate::types::{Book, BookId, Cover, Timestamp, Validator};
use std::collections::HashMap;
use std::sync::Arc;

/// Anything that can turn a book id into a book
pub trait Catalog {
    /// Returns the book, or `None` if it is not (or no longer) in the catalog
    fn resolve(&self, id: &BookId) -> Option<Arc<Book>>;
}

/// In-memory library of books
///
/// Books are shared as `Arc<Book>` so the player can hold a reference to
/// the active book without copying it.
#[derive(Debug, Default, Clone)]
pub struct Library {
    books: Vec<Arc<Book>>,
    last_played: HashMap<BookId, Timestamp>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a library from already-loaded books
    pub fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        let mut library = Self::new();
        for book in books {
            library.insert(book);
        }
        library
    }

    /// Validates and adds a book, replacing any book with the same id
    pub fn add(&mut self, book: Book) -> Result<Arc<Book>> {
        if let Err(errors) = book.validate() {
            return Err(AppError::InvalidArgument {
                argument: format!("book {}", book.id),
                reason: errors.join("; "),
            });
        }
        Ok(self.insert(book))
    }

    fn insert(&mut self, book: Book) -> Arc<Book> {
        let book = Arc::new(book);
        match self.books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => {
                log::debug!("Replacing book {}", book.id);
                *existing = Arc::clone(&book);
            }
            None => self.books.push(Arc::clone(&book)),
        }
        book
    }

    pub fn get(&self, id: &BookId) -> Option<Arc<Book>> {
        self.books.iter().find(|b| &b.id == id).cloned()
    }

    /// Removes a book and its last-played entry
    pub fn remove(&mut self, id: &BookId) -> Option<Arc<Book>> {
        let position = self.books.iter().position(|b| &b.id == id)?;
        self.last_played.remove(id);
        Some(self.books.remove(position))
    }

    /// Swaps the cover of a book; the previous `Arc` stays valid for holders
    pub fn update_cover(&mut self, id: &BookId, cover: Cover) -> Result<Arc<Book>> {
        let slot = self
            .books
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| AppError::BookNotFound {
                book_id: id.to_string(),
            })?;

        let mut updated = Book::clone(slot);
        updated.cover = cover;
        *slot = Arc::new(updated);
        Ok(Arc::clone(slot))
    }

    pub fn books(&self) -> &[Arc<Book>] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Remembers when a book was last started; unknown ids are ignored
    pub fn record_last_played(&mut self, id: &BookId, at: Timestamp) {
        if self.get(id).is_some() {
            self.last_played.insert(id.clone(), at);
        } else {
            log::debug!("Ignoring last-played for unknown book {}", id);
        }
    }

    pub fn last_played(&self, id: &BookId) -> Option<Timestamp> {
        self.last_played.get(id).copied()
    }

    /// Played books, newest first
    pub fn recently_played(&self, limit: usize) -> Vec<Arc<Book>> {
        let mut played: Vec<(Timestamp, &Arc<Book>)> = self
            .books
            .iter()
            .filter_map(|b| self.last_played.get(&b.id).map(|t| (*t, b)))
            .collect();
        played.sort_by(|a, b| b.0.cmp(&a.0));
        played
            .into_iter()
            .take(limit)
            .map(|(_, b)| Arc::clone(b))
            .collect()
    }
}

impl Catalog for Library {
    fn resolve(&self, id: &BookId) -> Option<Arc<Book>> {
        self.get(id)
    }
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn resolve(&self, id: &BookId) -> Option<Arc<Book>> {
        (**self).resolve(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chapter, Duration};

    fn book(id: &str) -> Book {
        Book::new(BookId::parse(id).unwrap(), format!("Title {}", id), "Author", 2000)
            .with_chapters(vec![Chapter::new(1, "One", Duration::from_seconds(60))])
    }

    #[test]
    fn test_add_and_resolve() {
        let mut library = Library::new();
        library.add(book("a")).unwrap();

        let id = BookId::parse("a").unwrap();
        assert_eq!(library.resolve(&id).unwrap().title, "Title a");
        assert!(library.resolve(&BookId::parse("b").unwrap()).is_none());
    }

    #[test]
    fn test_add_rejects_invalid_book() {
        let mut library = Library::new();
        let invalid = Book::new(BookId::parse("x").unwrap(), "No chapters", "", 2000);
        assert!(library.add(invalid).is_err());
        assert!(library.is_empty());
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut library = Library::new();
        library.add(book("a")).unwrap();
        let mut again = book("a");
        again.title = "Renamed".to_string();
        library.add(again).unwrap();

        assert_eq!(library.len(), 1);
        assert_eq!(library.books()[0].title, "Renamed");
    }

    #[test]
    fn test_remove_forgets_last_played() {
        let mut library = Library::from_books([book("a"), book("b")]);
        let a = BookId::parse("a").unwrap();
        library.record_last_played(&a, Timestamp::from_seconds(10));

        assert!(library.remove(&a).is_some());
        assert!(library.last_played(&a).is_none());
        assert!(library.remove(&a).is_none());
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_update_cover_keeps_old_reference_intact() {
        let mut library = Library::from_books([book("a")]);
        let a = BookId::parse("a").unwrap();
        let before = library.get(&a).unwrap();

        let after = library
            .update_cover(&a, Cover::Image("data:image/jpeg;base64,AA==".to_string()))
            .unwrap();

        assert!(after.cover.is_image());
        assert!(!before.cover.is_image());
    }

    #[test]
    fn test_update_cover_unknown_book() {
        let mut library = Library::new();
        let err = library
            .update_cover(&BookId::parse("nope").unwrap(), Cover::default())
            .unwrap_err();
        assert!(matches!(err, AppError::BookNotFound { .. }));
    }

    #[test]
    fn test_recently_played_order() {
        let mut library = Library::from_books([book("a"), book("b"), book("c")]);
        library.record_last_played(&BookId::parse("a").unwrap(), Timestamp::from_seconds(100));
        library.record_last_played(&BookId::parse("c").unwrap(), Timestamp::from_seconds(300));
        library.record_last_played(&BookId::parse("ghost").unwrap(), Timestamp::from_seconds(999));

        let recent: Vec<String> = library
            .recently_played(10)
            .iter()
            .map(|b| b.id.to_string())
            .collect();
        assert_eq!(recent, vec!["c", "a"]);
        assert_eq!(library.recently_played(1).len(), 1);
    }
}
