pub mod error;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};

use service::CatalogService;

/// Personal book-tracking list
pub struct BooksModule {
    catalog: Arc<CatalogService>,
}

impl BooksModule {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let held = self.catalog.count().await?;
        tracing::info!(module = self.name(), books = held, "books module stopped");
        Ok(())
    }
}

/// Create a books module over the given catalog
pub fn create_module(catalog: Arc<CatalogService>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(catalog))
}

fn failure(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/FailureResponse" }
            }
        }
    })
}

fn success(description: &str, data: serde_json::Value) -> serde_json::Value {
    let mut properties = serde_json::json!({
        "status": { "type": "string", "enum": ["success"] },
        "message": { "type": "string" }
    });
    if !data.is_null() {
        properties["data"] = data;
    }

    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "type": "object", "properties": properties, "required": ["status"] }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let book_id_param = serde_json::json!([{
        "name": "book_id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    }]);
    let payload_body = serde_json::json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookPayload" }
            }
        }
    });
    let flag = serde_json::json!({ "type": "string", "enum": ["true", "false", "1", "0"] });
    let text_query = serde_json::json!({
        "name": "name",
        "in": "query",
        "required": false,
        "schema": { "type": "string" }
    });
    // year, author, summary and publisher are echoed with whatever JSON type they arrived as
    let free_form = serde_json::json!({
        "type": ["string", "number", "integer", "boolean", "null"]
    });

    serde_json::json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "description":
                        "At most one filter applies, in the order name, reading, finished.",
                    "tags": ["Books"],
                    "parameters": [
                        text_query,
                        { "name": "reading", "in": "query", "required": false, "schema": flag },
                        { "name": "finished", "in": "query", "required": false, "schema": flag }
                    ],
                    "responses": {
                        "200": success("Matching books", serde_json::json!({
                            "type": "object",
                            "properties": {
                                "books": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/BookSummary" }
                                }
                            }
                        })),
                        "400": failure("Unrecognised filter value")
                    }
                },
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": payload_body,
                    "responses": {
                        "201": success("Book added", serde_json::json!({
                            "type": "object",
                            "properties": { "bookId": { "type": "string" } }
                        })),
                        "400": failure("Missing name or readPage above pageCount"),
                        "500": failure("Book could not be stored")
                    }
                }
            },
            "/{book_id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": book_id_param,
                    "responses": {
                        "200": success("The book", serde_json::json!({
                            "type": "object",
                            "properties": { "book": { "$ref": "#/components/schemas/Book" } }
                        })),
                        "404": failure("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "parameters": book_id_param,
                    "requestBody": payload_body,
                    "responses": {
                        "200": success("Book updated", serde_json::Value::Null),
                        "400": failure("Missing name or readPage above pageCount"),
                        "404": failure("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": book_id_param,
                    "responses": {
                        "200": success("Book deleted", serde_json::Value::Null),
                        "404": failure("Book not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "year": free_form,
                        "author": free_form,
                        "summary": free_form,
                        "publisher": free_form,
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "finished": { "type": "boolean", "description": "pageCount == readPage" },
                        "reading": { "type": "boolean" },
                        "insertedAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "name", "pageCount", "readPage",
                        "finished", "reading", "insertedAt", "updatedAt"
                    ]
                },
                "BookPayload": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "year": free_form,
                        "author": free_form,
                        "summary": free_form,
                        "publisher": free_form,
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "reading": { "type": "boolean" }
                    },
                    "required": ["name"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "publisher": free_form
                    },
                    "required": ["id", "name"]
                }
            }
        }
    })
}
