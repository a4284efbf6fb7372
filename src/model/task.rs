use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ResourceRef;

#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
    #[serde(default)]
    pub assignee: Option<ResourceRef>,
    #[serde(default)]
    pub parent: Option<ResourceRef>,
    #[serde(default)]
    pub projects: Vec<ResourceRef>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl Task {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.assignee.as_ref().and_then(|a| a.name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
}

/// Find the numeric custom field called `name`. Both name and type must match exactly.
pub fn find_number_field<'a>(fields: &'a [CustomField], name: &str) -> Option<&'a CustomField> {
    fields
        .iter()
        .find(|f| f.name.as_deref() == Some(name) && f.field_type.as_deref() == Some("number"))
}

/// Body for `POST /tasks` and `POST /tasks/{gid}/subtasks`.
#[derive(Debug, Default, Serialize)]
pub struct NewTask {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_notes: Option<String>,
}

/// Body for `PUT /tasks/{gid}`. Only the fields that are set are sent.
#[derive(Debug, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}
