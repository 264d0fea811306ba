//! Launch parameters passed to the activity on its query string.

use std::collections::BTreeMap;
use url::Url;

/// Query parameter whose presence means the host launched us embedded.
pub const FRAME_ID_PARAM: &str = "frame_id";

/// Parsed launch query string.
///
/// Like `URLSearchParams.get`, the first occurrence of a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    params: BTreeMap<String, String>,
}

impl LaunchParams {
    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = BTreeMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self { params }
    }

    /// Parameters from the query of a full launch URL.
    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or(""))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Whether the host launched us (a `frame_id` is present, even empty).
    pub fn is_embedded(&self) -> bool {
        self.params.contains_key(FRAME_ID_PARAM)
    }

    pub fn frame_id(&self) -> Option<&str> {
        self.get(FRAME_ID_PARAM)
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.get("instance_id")
    }

    pub fn platform(&self) -> Option<&str> {
        self.get("platform")
    }

    pub fn guild_id(&self) -> Option<&str> {
        self.get("guild_id")
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.get("channel_id")
    }
}
