use anyhow::Result;

use super::Session;
use crate::client::PropagationMode;
use crate::render;

/// Under `Abort`, `settle` yields `Ok(Some(_))` or `Err`; the `else` arms below never run.
const MODE: PropagationMode = PropagationMode::Abort;
const SEARCH_LIMIT: u32 = 20;

pub async fn list_tasks(session: &Session<'_>, project_id: &str, limit: u32) -> Result<bool> {
    let Some(tasks) = MODE.settle(session.client.list_project_tasks(project_id, limit).await)?
    else {
        return Ok(false);
    };
    println!("Tasks in project {project_id}:");
    for task in &tasks {
        println!("{}", render::project_task_row(task));
    }
    Ok(true)
}

/// Use `workspace_id` if given, otherwise the caller's first workspace.
pub async fn resolve_workspace(
    session: &Session<'_>,
    workspace_id: Option<&str>,
) -> Result<Option<String>> {
    if let Some(id) = workspace_id {
        return Ok(Some(id.to_string()));
    }
    let workspace = MODE
        .settle(session.client.default_workspace().await)?
        .flatten();
    if workspace.is_none() {
        println!("No workspaces found");
    }
    Ok(workspace)
}

pub async fn list_projects(session: &Session<'_>, workspace_id: Option<&str>) -> Result<bool> {
    let Some(workspace_id) = resolve_workspace(session, workspace_id).await? else {
        return Ok(true);
    };
    let Some(projects) = MODE.settle(session.client.list_projects(&workspace_id).await)? else {
        return Ok(false);
    };
    println!("Projects in workspace {workspace_id}:");
    for row in projects.iter().filter_map(render::project_row) {
        println!("{row}");
    }
    Ok(true)
}

pub async fn search(session: &Session<'_>, workspace_id: &str, query: &str) -> Result<bool> {
    let Some(tasks) = MODE.settle(
        session
            .client
            .search_tasks(workspace_id, query, SEARCH_LIMIT)
            .await,
    )?
    else {
        return Ok(false);
    };
    println!("Search results for '{query}':");
    for task in &tasks {
        println!("{}", render::search_row(task));
    }
    Ok(true)
}
