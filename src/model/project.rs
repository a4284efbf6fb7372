use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub archived: bool,
}
