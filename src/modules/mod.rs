pub mod authors;
pub mod books;

use bookshelf_kernel::ModuleRegistry;

use crate::store::SharedStore;

/// Register all catalog modules with the registry, sharing one store
pub fn register_all(registry: &mut ModuleRegistry, store: SharedStore) -> anyhow::Result<()> {
    registry.register(authors::create_module(store.clone()))?;
    registry.register(books::create_module(store))?;
    Ok(())
}
