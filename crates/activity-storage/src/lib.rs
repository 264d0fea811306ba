//! Session-scoped key/value persistence.
//!
//! Two backends implement [`SessionStorage`]:
//! - [`MemorySessionStorage`]: lives as long as its owner
//! - [`FileSessionStorage`]: one JSON file per scope id, removed by `end_scope`

mod file;
mod keys;
mod memory;
mod traits;

pub use file::FileSessionStorage;
pub use keys::StorageKeys;
pub use memory::MemorySessionStorage;
pub use traits::SessionStorage;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A previous writer panicked while holding the lock
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
