use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ResourceRef;

pub const COMMENT_SUBTYPE: &str = "comment_added";

#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<ResourceRef>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub resource_subtype: Option<String>,
}

impl Story {
    /// True for stories a user wrote, as opposed to system events.
    pub fn is_comment(&self) -> bool {
        self.resource_subtype.as_deref() == Some(COMMENT_SUBTYPE)
    }
}
