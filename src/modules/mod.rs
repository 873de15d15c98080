pub mod books;

use std::sync::Arc;

use bookshelf_kernel::ModuleRegistry;

use books::service::CatalogService;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(books::create_module(Arc::new(CatalogService::in_memory())));
}
