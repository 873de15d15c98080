//! HTTP handlers for the books module.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use bookshelf_http::{envelope::Envelope, error::AppError};

use super::models::{BookCreated, BookDetail, BookList, BookPayload, BookQuery};
use super::service::CatalogService;

type Catalog = State<Arc<CatalogService>>;

/// Routes of the books module, relative to its mount point.
pub fn router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(add_book))
        .route("/health", get(health_check))
        .route(
            "/{book_id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn add_book(
    State(catalog): Catalog,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let book_id = catalog.add(payload).await?;

    Ok(Envelope::success(BookCreated { book_id })
        .with_message("Book added successfully")
        .respond(StatusCode::CREATED))
}

async fn list_books(
    State(catalog): Catalog,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let books = catalog.list_all(&query).await?;

    Ok(Envelope::success(BookList { books }).respond(StatusCode::OK))
}

async fn get_book(
    State(catalog): Catalog,
    Path(book_id): Path<String>,
) -> Result<Response, AppError> {
    let book = catalog.get_by_id(&book_id).await?;

    Ok(Envelope::success(BookDetail { book }).respond(StatusCode::OK))
}

async fn update_book(
    State(catalog): Catalog,
    Path(book_id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    catalog.update_by_id(&book_id, payload).await?;

    Ok(Envelope::acknowledged("Book updated successfully").respond(StatusCode::OK))
}

async fn delete_book(
    State(catalog): Catalog,
    Path(book_id): Path<String>,
) -> Result<Response, AppError> {
    catalog.delete_by_id(&book_id).await?;

    Ok(Envelope::acknowledged("Book deleted successfully").respond(StatusCode::OK))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}
