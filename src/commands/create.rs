use anyhow::{anyhow, Result};

use super::{Session, Target};
use crate::cli::CreateArgs;
use crate::client::PropagationMode;
use crate::model::draft::TaskDraft;
use crate::model::task::{find_number_field, NewTask, TaskUpdate};
use crate::util::format::{format_html_notes, format_title, parse_hours, split_pipes};

/// Creation is reported per task and never aborts the run on an API error.
const MODE: PropagationMode = PropagationMode::ContinueAndReport;

#[derive(Debug, Clone, PartialEq)]
pub enum CreateTarget {
    /// Rewrite an existing task in place.
    Existing(String),
    New(Target),
}

#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub target: CreateTarget,
    pub name: String,
    pub html_notes: String,
    pub hours: Option<f64>,
}

impl CreatePlan {
    pub fn from_args(args: &CreateArgs) -> Result<Self> {
        let draft = TaskDraft {
            platform: args.platform.as_str().to_string(),
            title: args.title.clone(),
            details: split_pipes(&args.details),
            tests: args.tests.as_deref().map(split_pipes).unwrap_or_default(),
            files: args.files.as_deref().map(split_pipes).unwrap_or_default(),
            dependencies: args
                .dependencies
                .as_deref()
                .map(split_pipes)
                .unwrap_or_default(),
            estimate: args.estimate.clone(),
        };

        // --task-id wins over --parent-id, which wins over --project-id.
        let target = match &args.task_id {
            Some(task_id) => CreateTarget::Existing(task_id.clone()),
            None => CreateTarget::New(
                Target::from_ids(args.parent_id.as_deref(), args.project_id.as_deref())
                    .ok_or_else(|| {
                        anyhow!("Either --project-id, --parent-id, or --task-id is required")
                    })?,
            ),
        };

        Ok(Self::from_draft(target, &args.project_name, &draft))
    }

    pub fn from_draft(target: CreateTarget, project_name: &str, draft: &TaskDraft) -> Self {
        Self {
            target,
            name: format_title(project_name, &draft.platform, &draft.title),
            html_notes: format_html_notes(draft),
            hours: draft.estimate.as_deref().and_then(parse_hours),
        }
    }
}

/// What `create --dry-run` prints.
pub fn preview(plan: &CreatePlan) -> String {
    let action = match &plan.target {
        CreateTarget::Existing(id) => format!("update task {id}"),
        CreateTarget::New(Target::Parent(id)) => format!("create subtask under {id}"),
        CreateTarget::New(Target::Project(id)) => format!("create task in project {id}"),
    };
    let hours = plan
        .hours
        .map(|h| format!("{h}h"))
        .unwrap_or_else(|| "not set".into());
    format!(
        "[DRY RUN] Would {action}\n  Name: {}\n  Dev Hours: {hours}\n  Notes: {}",
        plan.name, plan.html_notes
    )
}

/// Create (or update) the task, then set Dev Hours. Returns whether the task itself was
/// written; the Dev Hours step only ever produces warnings.
pub async fn run(session: &Session<'_>, plan: &CreatePlan) -> Result<bool> {
    let (task, verb) = match &plan.target {
        CreateTarget::Existing(task_id) => {
            let update = TaskUpdate {
                name: Some(plan.name.clone()),
                html_notes: Some(plan.html_notes.clone()),
                ..Default::default()
            };
            (
                MODE.settle(session.client.update_task(task_id, &update).await)?,
                "Updated task",
            )
        }
        CreateTarget::New(target) => {
            let new_task = NewTask {
                name: plan.name.clone(),
                html_notes: Some(plan.html_notes.clone()),
                ..Default::default()
            };
            let verb = if target.is_subtask() {
                "Created subtask"
            } else {
                "Created task"
            };
            (MODE.settle(target.create(session.client, new_task).await)?, verb)
        }
    };

    let Some(task) = task else {
        println!("✗ Failed: {}", plan.name);
        return Ok(false);
    };

    let action = match &plan.target {
        CreateTarget::Existing(_) => "task_updated",
        CreateTarget::New(Target::Parent(_)) => "subtask_created",
        CreateTarget::New(Target::Project(_)) => "task_created",
    };
    session
        .activity
        .record(action, Some(&task.gid), Some(&plan.name), None);
    println!(
        "✓ {verb}: {} (GID: {})",
        task.name.as_deref().unwrap_or(&plan.name),
        task.gid
    );

    if let Some(hours) = plan.hours.filter(|h| *h > 0.0) {
        set_dev_hours(session, &task.gid, hours).await?;
    }
    Ok(true)
}

/// Look up the Dev Hours field on the task and write `hours` into it. `Ok(false)` when the
/// field is missing or either call failed; none of that is fatal.
pub async fn set_dev_hours(session: &Session<'_>, task_gid: &str, hours: f64) -> Result<bool> {
    let Some(fields) = MODE.settle(session.client.custom_fields(task_gid).await)? else {
        return Ok(false);
    };
    let Some(field) = find_number_field(&fields, session.dev_hours_field) else {
        tracing::warn!(task = task_gid, field = session.dev_hours_field, "custom field missing");
        println!(
            "  ⚠ {} field not found for task {task_gid}",
            session.dev_hours_field
        );
        return Ok(false);
    };

    if MODE
        .settle(
            session
                .client
                .set_number_field(task_gid, &field.gid, hours)
                .await,
        )?
        .is_none()
    {
        return Ok(false);
    }

    let message = format!("{hours}h");
    session
        .activity
        .record("dev_hours_set", Some(task_gid), None, Some(&message));
    println!("  ✓ Set {}: {message}", session.dev_hours_field);
    Ok(true)
}
