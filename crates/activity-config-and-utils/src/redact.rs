//! Helpers for logging HTTP bodies without their contents.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Bodies may echo secrets back; only their size and a digest are logged.
pub fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}
