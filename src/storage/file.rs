use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::grocery::models::ProductItem;
use crate::storage::StoreError;

/// Append-only JSON lines, one row per line.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    // serializes appends from concurrent requests
    lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), lock: Arc::new(Mutex::new(())) }
    }

    pub async fn put_item(&self, item: &ProductItem) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(item)?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(&line).await?;
        file.flush().await?;
        debug!("product row appended to {}", self.path.display());
        Ok(())
    }
}
