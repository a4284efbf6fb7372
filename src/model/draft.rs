use serde::Deserialize;

fn default_platform() -> String {
    "API".into()
}

fn default_title() -> String {
    "Untitled".into()
}

/// Structured input for one task: what gets turned into a title and a description.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaskDraft {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub tests: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub estimate: Option<String>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            title: default_title(),
            details: Vec::new(),
            tests: Vec::new(),
            files: Vec::new(),
            dependencies: Vec::new(),
            estimate: None,
        }
    }
}
