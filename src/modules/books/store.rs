use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::models::{Book, BookFilter, BookPayload};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("book store unavailable: {0}")]
    Unavailable(String),
}

/// Ordered collection of books owned by the catalog.
///
/// Implementations hand out clones; nothing outside the store holds a
/// reference into it.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Append a record at the end of the collection
    async fn insert(&self, book: Book) -> Result<(), StoreError>;

    /// Records matching `filter`, in insertion order
    async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Book>, StoreError>;

    /// Overwrite the mutable fields of `id`; false if there is no such record
    async fn update(
        &self,
        id: &str,
        name: String,
        payload: BookPayload,
        now: OffsetDateTime,
    ) -> Result<bool, StoreError>;

    /// Remove `id`; false if there is no such record
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

/// Process-memory store; reads share the lock, writes hold it exclusively.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn insert(&self, book: Book) -> Result<(), StoreError> {
        self.books.write().await.push(book);
        Ok(())
    }

    async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError> {
        let books = self.books.read().await;
        Ok(books
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Book>, StoreError> {
        let books = self.books.read().await;
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    async fn update(
        &self,
        id: &str,
        name: String,
        payload: BookPayload,
        now: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        let mut books = self.books.write().await;
        match books.iter_mut().find(|book| book.id == id) {
            Some(book) => {
                book.apply(name, payload, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut books = self.books.write().await;
        match books.iter().position(|book| book.id == id) {
            Some(index) => {
                books.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.books.read().await.len())
    }
}
