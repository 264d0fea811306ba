//! In-memory session storage. The scope ends when the value is dropped.

use crate::{SessionStorage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// Session storage held in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self.data.write().map_err(|_| StorageError::Poisoned)?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let data = self.data.read().map_err(|_| StorageError::Poisoned)?;
        Ok(data.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let mut data = self.data.write().map_err(|_| StorageError::Poisoned)?;
        Ok(data.remove(key).is_some())
    }
}
