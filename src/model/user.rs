use serde::Deserialize;

use super::ResourceRef;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub workspaces: Vec<ResourceRef>,
}

impl User {
    /// The workspace used when the caller doesn't name one.
    pub fn default_workspace(&self) -> Option<&ResourceRef> {
        self.workspaces.first()
    }
}
