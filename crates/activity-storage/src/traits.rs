//! Storage trait definitions.

use crate::StorageResult;

/// Key/value store whose contents live exactly as long as one interactive
/// session scope (a browser tab, a terminal session).
pub trait SessionStorage: Send + Sync {
    /// Store a value for the rest of the scope
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Return the stored value, or store and return the one produced by `make`.
    ///
    /// The first write for a key wins; later calls return it unchanged.
    fn get_or_insert_with(
        &self,
        key: &str,
        make: &mut dyn FnMut() -> String,
    ) -> StorageResult<String> {
        if let Some(existing) = self.get(key)? {
            return Ok(existing);
        }
        let value = make();
        self.set(key, &value)?;
        Ok(value)
    }
}
