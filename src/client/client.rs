use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::model::project::Project;
use crate::model::story::Story;
use crate::model::task::{CustomField, NewTask, Task, TaskUpdate};
use crate::model::user::User;
use crate::model::Envelope;

const TASK_LIST_FIELDS: &str = "name,completed,due_on,assignee.name";
const SEARCH_FIELDS: &str = "name,completed,due_on,assignee.name,projects.name";
const STORY_FIELDS: &str = "created_at,created_by.name,text,type,resource_subtype";
const CUSTOM_FIELD_FIELDS: &str = "custom_fields.name,custom_fields.gid,custom_fields.type";
const PROJECT_PAGE_LIMIT: u32 = 100;

/// HTTP client for the Asana REST API.
pub struct AsanaClient {
    base_url: String,
    token: String,
    client: ReqwestClient,
}

impl AsanaClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            client: ReqwestClient::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request to `{base_url}{endpoint}`. `data` goes out wrapped as `{"data": ...}`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<Value>,
    ) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%method, %url, "asana request");

        let mut req = self
            .client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(data) = data {
            req = req.json(&json!({ "data": data }));
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn data<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<Value>,
    ) -> ApiResult<T> {
        let value = self.request(method, endpoint, data).await?;
        let envelope: Envelope<T> = serde_json::from_value(value)?;
        Ok(envelope.data)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub async fn get_task(&self, task_id: &str) -> ApiResult<Task> {
        self.data(Method::GET, &format!("/tasks/{task_id}"), None)
            .await
    }

    pub async fn set_completed(&self, task_id: &str, completed: bool) -> ApiResult<Task> {
        self.data(
            Method::PUT,
            &format!("/tasks/{task_id}"),
            Some(json!({ "completed": completed })),
        )
        .await
    }

    pub async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> ApiResult<Task> {
        self.data(
            Method::PUT,
            &format!("/tasks/{task_id}"),
            Some(serde_json::to_value(update)?),
        )
        .await
    }

    /// Assign to `user_gid`, or clear the assignee with `None`.
    pub async fn set_assignee(&self, task_id: &str, user_gid: Option<&str>) -> ApiResult<Task> {
        self.data(
            Method::PUT,
            &format!("/tasks/{task_id}"),
            Some(json!({ "assignee": user_gid })),
        )
        .await
    }

    pub async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        self.data(Method::POST, "/tasks", Some(serde_json::to_value(task)?))
            .await
    }

    pub async fn create_subtask(&self, parent_id: &str, task: &NewTask) -> ApiResult<Task> {
        self.data(
            Method::POST,
            &format!("/tasks/{parent_id}/subtasks"),
            Some(serde_json::to_value(task)?),
        )
        .await
    }

    pub async fn get_subtasks(&self, task_id: &str) -> ApiResult<Vec<Task>> {
        self.data(
            Method::GET,
            &format!("/tasks/{task_id}/subtasks?opt_fields={TASK_LIST_FIELDS}"),
            None,
        )
        .await
    }

    pub async fn add_comment(&self, task_id: &str, text: &str) -> ApiResult<Story> {
        self.data(
            Method::POST,
            &format!("/tasks/{task_id}/stories"),
            Some(json!({ "text": text })),
        )
        .await
    }

    pub async fn get_stories(&self, task_id: &str) -> ApiResult<Vec<Story>> {
        self.data(
            Method::GET,
            &format!("/tasks/{task_id}/stories?opt_fields={STORY_FIELDS}"),
            None,
        )
        .await
    }

    // =========================================================================
    // Custom fields
    // =========================================================================

    pub async fn custom_fields(&self, task_id: &str) -> ApiResult<Vec<CustomField>> {
        let task: Task = self
            .data(
                Method::GET,
                &format!("/tasks/{task_id}?opt_fields={CUSTOM_FIELD_FIELDS}"),
                None,
            )
            .await?;
        Ok(task.custom_fields)
    }

    pub async fn set_number_field(
        &self,
        task_id: &str,
        field_gid: &str,
        value: f64,
    ) -> ApiResult<Task> {
        let mut fields = serde_json::Map::new();
        fields.insert(field_gid.to_string(), json!(value));
        self.data(
            Method::PUT,
            &format!("/tasks/{task_id}"),
            Some(json!({ "custom_fields": fields })),
        )
        .await
    }

    // =========================================================================
    // Projects & search
    // =========================================================================

    pub async fn list_project_tasks(&self, project_id: &str, limit: u32) -> ApiResult<Vec<Task>> {
        self.data(
            Method::GET,
            &format!("/projects/{project_id}/tasks?opt_fields={TASK_LIST_FIELDS}&limit={limit}"),
            None,
        )
        .await
    }

    pub async fn list_projects(&self, workspace_id: &str) -> ApiResult<Vec<Project>> {
        self.data(
            Method::GET,
            &format!(
                "/workspaces/{workspace_id}/projects?opt_fields=name,archived&limit={PROJECT_PAGE_LIMIT}"
            ),
            None,
        )
        .await
    }

    pub async fn search_tasks(
        &self,
        workspace_id: &str,
        query: &str,
        limit: u32,
    ) -> ApiResult<Vec<Task>> {
        self.data(
            Method::GET,
            &format!(
                "/workspaces/{workspace_id}/tasks/search?text={}&opt_fields={}&limit={limit}",
                urlencoding::encode(query),
                urlencoding::encode(SEARCH_FIELDS),
            ),
            None,
        )
        .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn me(&self) -> ApiResult<User> {
        self.data(Method::GET, "/users/me", None).await
    }

    pub async fn list_users(&self, workspace_id: &str) -> ApiResult<Vec<User>> {
        self.data(
            Method::GET,
            &format!("/workspaces/{workspace_id}/users?opt_fields=name,email"),
            None,
        )
        .await
    }

    /// First workspace of the authenticated user, if they have any.
    pub async fn default_workspace(&self) -> ApiResult<Option<String>> {
        let me = self.me().await?;
        Ok(me.default_workspace().map(|ws| ws.gid.clone()))
    }
}
