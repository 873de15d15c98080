use std::sync::Arc;

use super::error::CatalogError;
use super::models::{Book, BookFilter, BookPayload, BookQuery, BookSummary};
use super::store::{BookStore, InMemoryBookStore};
use crate::utils;

const NAME_REQUIRED: &str = "name required";
const NAME_REQUIRED_FOR_UPDATE: &str = "name required for update";
const READ_PAGE_EXCEEDS: &str = "readPage exceeds pageCount";
const BOOK_NOT_FOUND: &str = "book not found";
const ID_NOT_FOUND: &str = "id not found";
const INSERT_FAILED: &str = "insert failed";

/// Catalog operations over an injected [`BookStore`].
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Service backed by an empty [`InMemoryBookStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBookStore::new()))
    }

    /// Validate and store a new book, returning its id.
    pub async fn add(&self, mut payload: BookPayload) -> Result<String, CatalogError> {
        let name = validate(&mut payload, NAME_REQUIRED)?;

        let id = utils::new_book_id();
        let book = Book::new(id.clone(), name, payload, utils::now());
        self.store.insert(book).await?;

        if self.store.get(&id).await?.is_none() {
            tracing::error!(book_id = %id, "book missing right after insert");
            return Err(CatalogError::Internal(INSERT_FAILED.to_string()));
        }

        tracing::info!(book_id = %id, "book added");
        Ok(id)
    }

    /// Books selected by the first present query filter, projected for listing.
    pub async fn list_all(&self, query: &BookQuery) -> Result<Vec<BookSummary>, CatalogError> {
        let filter = BookFilter::from_query(query)?;
        let books = self.store.list(&filter).await?;
        tracing::debug!(filter = ?filter, matched = books.len(), "books listed");
        Ok(books.iter().map(BookSummary::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Book, CatalogError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(BOOK_NOT_FOUND.to_string()))
    }

    /// Replace every mutable field of `id`.
    ///
    /// The payload is validated before the record is looked up.
    pub async fn update_by_id(
        &self,
        id: &str,
        mut payload: BookPayload,
    ) -> Result<(), CatalogError> {
        let name = validate(&mut payload, NAME_REQUIRED_FOR_UPDATE)?;

        if !self.store.update(id, name, payload, utils::now()).await? {
            return Err(CatalogError::NotFound(ID_NOT_FOUND.to_string()));
        }

        tracing::info!(book_id = %id, "book updated");
        Ok(())
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), CatalogError> {
        if !self.store.remove(id).await? {
            return Err(CatalogError::NotFound(ID_NOT_FOUND.to_string()));
        }

        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }

    /// Number of stored books
    pub async fn count(&self) -> Result<usize, CatalogError> {
        Ok(self.store.count().await?)
    }
}

/// Name check first, then the page bounds. Takes the name out of the payload.
fn validate(payload: &mut BookPayload, missing_name: &str) -> Result<String, CatalogError> {
    let name = match payload.name.take() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(CatalogError::Validation(missing_name.to_string())),
    };

    if payload.read_page > payload.page_count {
        return Err(CatalogError::Validation(READ_PAGE_EXCEEDS.to_string()));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::error::ErrorKind;
    use crate::modules::books::store::StoreError;
    use async_trait::async_trait;
    use serde_json::json;
    use time::OffsetDateTime;

    fn payload(name: Option<&str>, page_count: u32, read_page: u32) -> BookPayload {
        BookPayload {
            name: name.map(str::to_string),
            year: Some(json!(2010)),
            author: Some(json!("John Doe")),
            summary: Some(json!("Lorem ipsum")),
            publisher: Some(json!("Dicoding Indonesia")),
            page_count,
            read_page,
            reading: true,
        }
    }

    fn query(name: Option<&str>, reading: Option<&str>, finished: Option<&str>) -> BookQuery {
        BookQuery {
            name: name.map(str::to_string),
            reading: reading.map(str::to_string),
            finished: finished.map(str::to_string),
        }
    }

    /// Accepts inserts but never keeps them
    struct LeakyStore;

    #[async_trait]
    impl BookStore for LeakyStore {
        async fn insert(&self, _book: Book) -> Result<(), StoreError> {
            Ok(())
        }

        async fn list(&self, _filter: &BookFilter) -> Result<Vec<Book>, StoreError> {
            Ok(Vec::new())
        }

        async fn get(&self, _id: &str) -> Result<Option<Book>, StoreError> {
            Ok(None)
        }

        async fn update(
            &self,
            _id: &str,
            _name: String,
            _payload: BookPayload,
            _now: OffsetDateTime,
        ) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn remove(&self, _id: &str) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn count(&self) -> Result<usize, StoreError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn add_then_get_round_trips() {
        let service = CatalogService::in_memory();
        let input = payload(Some("Buku A"), 100, 25);

        let id = service.add(input.clone()).await.unwrap();
        let book = service.get_by_id(&id).await.unwrap();

        assert_eq!(book.id, id);
        assert_eq!(book.name, "Buku A");
        assert_eq!(book.year, input.year);
        assert_eq!(book.author, input.author);
        assert_eq!(book.summary, input.summary);
        assert_eq!(book.publisher, input.publisher);
        assert_eq!(book.page_count, 100);
        assert_eq!(book.read_page, 25);
        assert!(book.reading);
        assert!(!book.finished);
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[tokio::test]
    async fn add_derives_finished() {
        let service = CatalogService::in_memory();
        for (page_count, read_page) in [(0, 0), (10, 10), (10, 3), (500, 499)] {
            let id = service
                .add(payload(Some("Book"), page_count, read_page))
                .await
                .unwrap();
            let book = service.get_by_id(&id).await.unwrap();
            assert_eq!(book.finished, page_count == read_page);
        }
    }

    #[tokio::test]
    async fn add_assigns_distinct_ids() {
        let service = CatalogService::in_memory();
        let first = service.add(payload(Some("A"), 1, 0)).await.unwrap();
        let second = service.add(payload(Some("A"), 1, 0)).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn add_without_name_is_rejected() {
        let service = CatalogService::in_memory();

        for name in [None, Some("")] {
            // Out-of-range pages must not change which error wins
            let err = service.add(payload(name, 5, 10)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.to_string(), NAME_REQUIRED);
        }
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn add_with_read_page_over_page_count_is_rejected() {
        let service = CatalogService::in_memory();
        let err = service.add(payload(Some("Book"), 5, 10)).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), READ_PAGE_EXCEEDS);
    }

    #[tokio::test]
    async fn add_reports_generic_failure_when_store_loses_record() {
        let service = CatalogService::new(Arc::new(LeakyStore));
        let err = service.add(payload(Some("Book"), 1, 1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn list_filters_by_name_case_insensitively() {
        let service = CatalogService::in_memory();
        let foo = service.add(payload(Some("The FOO Book"), 1, 0)).await.unwrap();
        service.add(payload(Some("Bar"), 1, 0)).await.unwrap();
        let food = service.add(payload(Some("food"), 1, 0)).await.unwrap();

        let books = service.list_all(&query(Some("foo"), None, None)).await.unwrap();

        let ids: Vec<&str> = books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec![foo.as_str(), food.as_str()]);
        assert_eq!(books[0].publisher, Some(json!("Dicoding Indonesia")));
    }

    #[tokio::test]
    async fn list_applies_only_the_first_filter() {
        let service = CatalogService::in_memory();
        let mut idle = payload(Some("Idle"), 10, 10);
        idle.reading = false;
        service.add(idle).await.unwrap();
        service.add(payload(Some("Busy"), 10, 2)).await.unwrap();

        let reading = service.list_all(&query(None, Some("1"), Some("1"))).await.unwrap();
        assert_eq!(reading.len(), 1);
        assert_eq!(reading[0].name, "Busy");

        let finished = service.list_all(&query(None, None, Some("true"))).await.unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].name, "Idle");

        let by_name = service
            .list_all(&query(Some("idle"), Some("true"), None))
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Idle");

        let all = service.list_all(&BookQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn list_rejects_unparseable_flag() {
        let service = CatalogService::in_memory();
        let err = service
            .list_all(&query(None, None, Some("maybe")))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let service = CatalogService::in_memory();
        let err = service.get_by_id("missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), BOOK_NOT_FOUND);
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_refreshes_timestamp() {
        let service = CatalogService::in_memory();
        let id = service.add(payload(Some("Draft"), 100, 10)).await.unwrap();
        let before = service.get_by_id(&id).await.unwrap();

        let mut revised = payload(Some("Final"), 200, 200);
        revised.publisher = None;
        revised.reading = false;
        service.update_by_id(&id, revised).await.unwrap();

        let after = service.get_by_id(&id).await.unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.inserted_at, before.inserted_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.name, "Final");
        assert_eq!(after.page_count, 200);
        assert!(after.finished);
        assert!(!after.reading);
        assert!(after.publisher.is_none());
    }

    #[tokio::test]
    async fn update_validates_before_checking_existence() {
        let service = CatalogService::in_memory();

        let err = service
            .update_by_id("missing", payload(None, 1, 0))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), NAME_REQUIRED_FOR_UPDATE);

        let err = service
            .update_by_id("missing", payload(Some("Book"), 1, 2))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), READ_PAGE_EXCEEDS);

        let err = service
            .update_by_id("missing", payload(Some("Book"), 2, 1))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), ID_NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_twice_succeeds_then_not_found() {
        let service = CatalogService::in_memory();
        let id = service.add(payload(Some("Book"), 1, 0)).await.unwrap();
        let other = service.add(payload(Some("Other"), 1, 0)).await.unwrap();

        service.delete_by_id(&id).await.unwrap();
        assert_eq!(service.get_by_id(&id).await.unwrap_err().status_code(), 404);
        assert_eq!(service.delete_by_id(&id).await.unwrap_err().status_code(), 404);

        assert!(service.get_by_id(&other).await.is_ok());
        assert_eq!(service.count().await.unwrap(), 1);
    }
}
