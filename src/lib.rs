//! Bookshelf application library
//!
//! Application modules, the helpers they share, and the process lifecycle.

pub mod modules;
pub mod utils;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Registry populated with every application module
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Run the module lifecycle around the HTTP server until shutdown
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry();
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_modules(&ctx)
        .await
        .context("module startup failed")?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry
        .stop_modules()
        .await
        .context("module shutdown failed")?;

    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[test]
    fn registry_contains_books() {
        let registry = registry();
        assert_eq!(registry.module_count(), 1);
        assert!(registry.get_module("books").is_some());
    }

    #[tokio::test]
    async fn books_are_served_under_module_prefix() {
        let app = bookshelf_http::build_router(&registry(), &Settings::default());

        let create = Request::post("/books")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"name": "Laskar Pelangi", "pageCount": 529, "readPage": 0}).to_string(),
            ))
            .unwrap();
        let (status, reply) = send(&app, create).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = reply["data"]["bookId"].as_str().unwrap().to_string();

        let (status, reply) = send(&app, Request::get("/books").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["data"]["books"][0]["id"], id.as_str());
        assert_eq!(reply["data"]["books"][0]["publisher"], Value::Null);

        let (status, _) = send(
            &app,
            Request::get(format!("/books/{id}")).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_lists_book_routes() {
        let app = bookshelf_http::build_router(&registry(), &Settings::default());
        let (status, spec) = send(
            &app,
            Request::get("/docs/openapi.json").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(spec["paths"]["/books"]["post"].is_object());
        assert!(spec["paths"]["/books/{book_id}"]["delete"].is_object());
    }
}
