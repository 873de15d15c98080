use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::error::CatalogError;

/// A book on the shelf, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque identifier assigned at creation
    pub id: String,
    pub name: String,
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    pub page_count: u32,
    pub read_page: u32,
    /// Always `page_count == read_page`
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Build a new record from an already validated payload.
    pub fn new(id: String, name: String, payload: BookPayload, now: OffsetDateTime) -> Self {
        Self {
            id,
            name,
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            finished: payload.page_count == payload.read_page,
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field; `id` and `inserted_at` are kept.
    pub fn apply(&mut self, name: String, payload: BookPayload, now: OffsetDateTime) {
        self.name = name;
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.finished = payload.page_count == payload.read_page;
        self.reading = payload.reading;
        self.updated_at = now;
    }
}

/// Request body for creating or replacing a book.
///
/// `year`, `author`, `summary` and `publisher` are stored as sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<Value>,
    pub author: Option<Value>,
    pub summary: Option<Value>,
    pub publisher: Option<Value>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

/// List projection of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<Value>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Raw query string of the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

/// The single filter applied to a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    All,
    /// Case-insensitive substring of the name, stored lowercased
    Name(String),
    Reading(bool),
    Finished(bool),
}

impl BookFilter {
    /// Pick the first present filter in the order name, reading, finished.
    ///
    /// Empty values count as absent.
    pub fn from_query(query: &BookQuery) -> Result<Self, CatalogError> {
        if let Some(name) = present(&query.name) {
            return Ok(BookFilter::Name(name.to_lowercase()));
        }
        if let Some(reading) = present(&query.reading) {
            return parse_flag("reading", reading).map(BookFilter::Reading);
        }
        if let Some(finished) = present(&query.finished) {
            return parse_flag("finished", finished).map(BookFilter::Finished);
        }
        Ok(BookFilter::All)
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Name(needle) => book.name.to_lowercase().contains(needle.as_str()),
            BookFilter::Reading(flag) => book.reading == *flag,
            BookFilter::Finished(flag) => book.finished == *flag,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_flag(field: &str, value: &str) -> Result<bool, CatalogError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(CatalogError::Validation(format!(
            "{} must be one of true, false, 1, 0 (got '{}')",
            field, other
        ))),
    }
}

/// `data` of a successful add.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreated {
    pub book_id: String,
}

/// `data` of a listing.
#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

/// `data` of a single-book fetch.
#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}
