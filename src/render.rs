//! Human-readable output for each command.

use crate::model::project::Project;
use crate::model::story::Story;
use crate::model::task::Task;
use crate::model::user::User;

const NOTES_PREVIEW_CHARS: usize = 500;

pub fn status_glyph(completed: bool) -> &'static str {
    if completed {
        "✓"
    } else {
        "○"
    }
}

pub fn task_detail(task: &Task) -> String {
    let projects = task
        .projects
        .iter()
        .map(|p| p.name_or_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let notes: String = task
        .notes
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(NOTES_PREVIEW_CHARS)
        .collect();

    let mut lines = vec![
        format!("Task: {}", task.display_name()),
        format!("GID: {}", task.gid),
        format!(
            "Status: {}",
            if task.completed { "Completed" } else { "Open" }
        ),
        format!(
            "Due: {}",
            task.due_on
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "Not set".into())
        ),
        format!("Assignee: {}", task.assignee_name().unwrap_or("Unassigned")),
        format!(
            "Projects: {}",
            if projects.is_empty() { "None" } else { projects.as_str() }
        ),
    ];
    if let Some(parent) = &task.parent {
        lines.push(format!("Parent: [{}] {}", parent.gid, parent.name_or_empty()));
    }
    lines.push(format!("Notes:\n{notes}"));
    lines.join("\n")
}

/// One row of `list-tasks`: glyph, id, name, assignee, due date.
pub fn project_task_row(task: &Task) -> String {
    format!(
        "  {} [{}] {} | {} | {}",
        status_glyph(task.completed),
        task.gid,
        task.display_name(),
        task.assignee_name().unwrap_or(""),
        task.due_on.map(|d| d.to_string()).unwrap_or_default()
    )
}

pub fn subtask_row(task: &Task) -> String {
    format!(
        "  {} [{}] {} ({})",
        status_glyph(task.completed),
        task.gid,
        task.display_name(),
        task.assignee_name().unwrap_or("")
    )
}

pub fn search_row(task: &Task) -> String {
    format!(
        "  {} [{}] {} | {} | {}",
        status_glyph(task.completed),
        task.gid,
        task.display_name(),
        task.projects.first().map(|p| p.name_or_empty()).unwrap_or(""),
        task.assignee_name().unwrap_or("")
    )
}

/// Comment block for `get-stories`; `None` for system events.
pub fn comment(story: &Story) -> Option<String> {
    if !story.is_comment() {
        return None;
    }
    let author = story
        .created_by
        .as_ref()
        .and_then(|u| u.name.as_deref())
        .unwrap_or("Unknown");
    let date = story
        .created_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    Some(format!(
        "\n[{date}] {author}:\n  {}",
        story.text.as_deref().unwrap_or("")
    ))
}

/// Project row, or `None` when archived.
pub fn project_row(project: &Project) -> Option<String> {
    if project.archived {
        return None;
    }
    Some(format!(
        "  [{}] {}",
        project.gid,
        project.name.as_deref().unwrap_or("")
    ))
}

pub fn user_row(user: &User) -> String {
    format!(
        "  [{}] {} ({})",
        user.gid,
        user.name.as_deref().unwrap_or(""),
        user.email.as_deref().unwrap_or("")
    )
}

pub fn me(user: &User) -> String {
    let mut lines = vec![
        format!("User: {}", user.name.as_deref().unwrap_or("")),
        format!("GID: {}", user.gid),
        format!("Email: {}", user.email.as_deref().unwrap_or("")),
        "Workspaces:".to_string(),
    ];
    lines.extend(
        user.workspaces
            .iter()
            .map(|ws| format!("  [{}] {}", ws.gid, ws.name_or_empty())),
    );
    lines.join("\n")
}
