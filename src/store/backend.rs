use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
#[cfg(test)]
use mockall::automock;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
    sync::RwLock,
};
use tracing::debug;

/// Interface for abstracting the persistent store the chore list lives in. The contract is a
/// plain string-keyed get/set: values are whole documents and a write replaces the previous
/// value entirely.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieves the value stored under `key`. A key that was never written is `None`, not an
    /// error.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the entire value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// The main realization of [KeyValueStore]. Every key becomes a file in the store directory.
/// Reads take a shared file lock and writes an exclusive one, so concurrent invocations can't
/// observe a half-written value.
pub struct FileKeyValueStore {
    store_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(store_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&store_dir)?;

        Ok(Self { store_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.store_dir.join(format!("{key}.json"))
    }

    async fn read_value(file: &mut File) -> Result<String> {
        let mut value = String::new();
        file.read_to_string(&mut value).await?;
        Ok(value)
    }

    async fn write_value(file: &mut File, value: &str) -> Result<()> {
        file.set_len(0).await?;
        file.write_all(value.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        debug!("Reading {path:?}");
        let mut file = match File::open(&path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let result = Self::read_value(&mut file).await;
        file.unlock_async().await?;

        Ok(Some(result?))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        debug!("Writing {} bytes into {path:?}", value.len());
        let mut file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&path)
            .await?;

        file.lock_exclusive()?;
        let result = Self::write_value(&mut file, value).await;
        file.unlock_async().await?;

        result
    }
}

/// In-memory [KeyValueStore]. Useful for tests and as a reference implementation of the
/// contract. Clones are cheap and share the same map.
#[derive(Default, Clone)]
pub struct MemoryKeyValueStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        store::backend::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore},
        utils::logging::TEST_LOGGING,
    };

    #[tokio::test]
    async fn test_file_store_round_trip() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;

        assert_eq!(store.get("chores").await?, None);

        store.set("chores", r#"[{"id":"1"}]"#).await?;
        assert_eq!(store.get("chores").await?.as_deref(), Some(r#"[{"id":"1"}]"#));

        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_overwrites_longer_values() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;

        store
            .set("chores", "a value that takes up quite some space")
            .await?;
        store.set("chores", "short").await?;

        assert_eq!(store.get("chores").await?.as_deref(), Some("short"));

        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_keys_are_independent() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;

        store.set("chores", "[]").await?;

        assert_eq!(store.get("chores").await?.as_deref(), Some("[]"));
        assert_eq!(store.get("settings").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_the_map() -> Result<()> {
        let store = MemoryKeyValueStore::new();
        let handle = store.clone();

        store.set("chores", "[]").await?;

        assert_eq!(handle.get("chores").await?.as_deref(), Some("[]"));

        Ok(())
    }
}
