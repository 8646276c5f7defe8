use crate::domain::{Book, BookId, SerialNumber};
use crate::ports::book_catalog::{BookCatalog as BookCatalogTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// In-memory implementation of BookCatalog
///
/// Books are kept in insertion order, the way the catalog screen lists them.
pub struct BookCatalog {
    books: Mutex<Vec<Book>>,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::with_books(Vec::new())
    }

    /// Start with a pre-loaded catalog
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
        }
    }
}

impl Default for BookCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookCatalogTrait for BookCatalog {
    async fn list(&self) -> Result<Vec<Book>> {
        Ok(lock(&self.books)?.clone())
    }

    async fn get(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(lock(&self.books)?.iter().find(|b| b.id == book_id).cloned())
    }

    async fn find_by_serial(&self, serial_number: &SerialNumber) -> Result<Option<Book>> {
        Ok(lock(&self.books)?
            .iter()
            .find(|b| &b.serial_number == serial_number)
            .cloned())
    }

    /// One past the highest id in use
    async fn next_id(&self) -> Result<BookId> {
        let books = lock(&self.books)?;
        Ok(books
            .iter()
            .map(|b| b.id)
            .max()
            .map_or(BookId::new(1), |id| id.next()))
    }

    async fn save(&self, book: Book) -> Result<()> {
        let mut books = lock(&self.books)?;
        match books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => *existing = book,
            None => books.push(book),
        }
        Ok(())
    }
}
