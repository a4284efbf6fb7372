use anyhow::{bail, Result};
use chrono::NaiveDate;

use super::{Session, Target};
use crate::cli::UpdateField;
use crate::client::PropagationMode;
use crate::model::task::{NewTask, TaskUpdate};
use crate::render;

/// Single-task commands stop at the first API error.
/// Under `Abort`, `settle` yields `Ok(Some(_))` or `Err`; the `else` arms below never run.
const MODE: PropagationMode = PropagationMode::Abort;

pub async fn get_task(session: &Session<'_>, task_id: &str) -> Result<bool> {
    let Some(task) = MODE.settle(session.client.get_task(task_id).await)? else {
        return Ok(false);
    };
    println!("{}", render::task_detail(&task));
    Ok(true)
}

pub async fn set_completed(session: &Session<'_>, task_id: &str, completed: bool) -> Result<bool> {
    let Some(task) = MODE.settle(session.client.set_completed(task_id, completed).await)? else {
        return Ok(false);
    };
    let (action, state) = if completed {
        ("task_completed", "complete")
    } else {
        ("task_reopened", "incomplete")
    };
    session
        .activity
        .record(action, Some(task_id), task.name.as_deref(), None);
    println!("Task {task_id} marked as {state}");
    Ok(true)
}

/// Build the update for `update-task <id> <field> <value>`.
pub fn field_update(field: UpdateField, value: &str) -> Result<TaskUpdate> {
    let mut update = TaskUpdate::default();
    match field {
        UpdateField::Name => update.name = Some(value.to_string()),
        UpdateField::Notes => update.notes = Some(value.to_string()),
        UpdateField::DueOn => match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            Ok(date) => update.due_on = Some(date),
            Err(_) => bail!("due_on must be a date in YYYY-MM-DD format, got '{value}'"),
        },
        UpdateField::Assignee => update.assignee = Some(value.trim().to_string()),
    }
    Ok(update)
}

pub async fn update_field(
    session: &Session<'_>,
    task_id: &str,
    field: UpdateField,
    value: &str,
) -> Result<bool> {
    let update = field_update(field, value)?;
    let Some(task) = MODE.settle(session.client.update_task(task_id, &update).await)? else {
        return Ok(false);
    };
    session
        .activity
        .record("task_updated", Some(task_id), task.name.as_deref(), None);
    println!("Task {task_id} updated successfully");
    Ok(true)
}

pub async fn assign(session: &Session<'_>, task_id: &str, user_gid: Option<&str>) -> Result<bool> {
    let Some(task) = MODE.settle(session.client.set_assignee(task_id, user_gid).await)? else {
        return Ok(false);
    };
    match user_gid {
        Some(user) => {
            session
                .activity
                .record("task_assigned", Some(task_id), task.name.as_deref(), Some(user));
            println!("Task {task_id} assigned to user {user}");
        }
        None => {
            session
                .activity
                .record("task_unassigned", Some(task_id), task.name.as_deref(), None);
            println!("Task {task_id} unassigned");
        }
    }
    Ok(true)
}

pub async fn add_comment(session: &Session<'_>, task_id: &str, text: &str) -> Result<bool> {
    if MODE
        .settle(session.client.add_comment(task_id, text).await)?
        .is_none()
    {
        return Ok(false);
    }
    session
        .activity
        .record("comment_added", Some(task_id), None, Some(text));
    println!("Comment added to task {task_id}");
    Ok(true)
}

pub async fn get_stories(session: &Session<'_>, task_id: &str) -> Result<bool> {
    let Some(stories) = MODE.settle(session.client.get_stories(task_id).await)? else {
        return Ok(false);
    };
    println!("Stories for task {task_id}:");
    for block in stories.iter().filter_map(render::comment) {
        println!("{block}");
    }
    Ok(true)
}

pub async fn get_subtasks(session: &Session<'_>, task_id: &str) -> Result<bool> {
    let Some(subtasks) = MODE.settle(session.client.get_subtasks(task_id).await)? else {
        return Ok(false);
    };
    println!("Subtasks of {task_id}:");
    for task in &subtasks {
        println!("{}", render::subtask_row(task));
    }
    Ok(true)
}

/// `create-task` / `create-subtask`: a bare task with just a name.
pub async fn create(session: &Session<'_>, target: &Target, name: &str) -> Result<bool> {
    let new_task = NewTask {
        name: name.to_string(),
        ..Default::default()
    };
    let Some(task) = MODE.settle(target.create(session.client, new_task).await)? else {
        return Ok(false);
    };

    let (action, label) = if target.is_subtask() {
        ("subtask_created", "subtask")
    } else {
        ("task_created", "task")
    };
    session
        .activity
        .record(action, Some(&task.gid), task.name.as_deref(), None);
    println!("Created {label}: {} (GID: {})", task.display_name(), task.gid);
    Ok(true)
}
