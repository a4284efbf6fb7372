pub mod draft;
pub mod project;
pub mod story;
pub mod task;
pub mod user;

use serde::Deserialize;

/// Every Asana response wraps its payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Compact form of any Asana resource, as embedded in other resources.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResourceRef {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ResourceRef {
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}
