use std::fmt;

use serde::Serialize;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque handle to locally held binary content (photo preview or model).
///
/// Handles are generated per object and never reused, so a stale handle
/// can always be told apart from the current one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LocalRef(String);

impl LocalRef {
    /// Preview handle for an uploaded photo, e.g. `preview:6f1c…`.
    pub fn preview() -> Self {
        Self(format!("preview:{}", uuid::Uuid::new_v4()))
    }

    /// Viewable handle for a generated model, e.g. `blob:9a2e…`.
    pub fn blob() -> Self {
        Self(format!("blob:{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
