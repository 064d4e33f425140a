/// Storage module
///
/// Product table backends and a factory to build them from config.

use thiserror::Error;

use crate::config::types::StorageConfig;
use crate::grocery::models::ProductItem;

pub mod file;
pub mod memory;

use file::FileStore;
use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("product row could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub enum ProductStore {
    Memory(MemoryStore),
    File(FileStore),
}

impl ProductStore {
    pub fn name(&self) -> &'static str {
        match self {
            ProductStore::Memory(_) => "memory",
            ProductStore::File(_) => "file",
        }
    }

    /// Write one row keyed by `productId`. Returns `false` when the row has no key and was skipped.
    pub async fn put_item(&self, item: &ProductItem) -> Result<bool, StoreError> {
        if item.product_id.as_deref().map_or(true, str::is_empty) {
            return Ok(false);
        }
        match self {
            ProductStore::Memory(s) => s.put_item(item).await,
            ProductStore::File(s) => s.put_item(item).await?,
        }
        Ok(true)
    }
}

pub fn build_store(cfg: &StorageConfig) -> ProductStore {
    match cfg {
        StorageConfig::Memory => ProductStore::Memory(MemoryStore::new()),
        StorageConfig::File { path } => ProductStore::File(FileStore::new(path)),
    }
}
