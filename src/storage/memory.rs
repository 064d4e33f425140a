use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::grocery::models::ProductItem;

/// productId -> row, last write wins
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, ProductItem>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_item(&self, item: &ProductItem) {
        if let Some(id) = &item.product_id {
            self.inner.write().await.insert(id.to_owned(), item.clone());
        }
    }

    pub async fn get(&self, product_id: &str) -> Option<ProductItem> {
        self.inner.read().await.get(product_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
