pub mod batch;
pub mod create;
pub mod projects;
pub mod tasks;
pub mod users;

use anyhow::Result;

use crate::activity::{render_event, ActivityLog};
use crate::cli::Commands;
use crate::client::{ApiResult, AsanaClient};
use crate::model::task::{NewTask, Task};

/// What every command needs to talk to Asana and record what it did.
pub struct Session<'a> {
    pub client: &'a AsanaClient,
    pub activity: &'a ActivityLog,
    pub dev_hours_field: &'a str,
}

/// Where newly created tasks go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Project(String),
    Parent(String),
}

impl Target {
    pub fn from_ids(parent_id: Option<&str>, project_id: Option<&str>) -> Option<Self> {
        parent_id
            .map(|p| Target::Parent(p.to_string()))
            .or_else(|| project_id.map(|p| Target::Project(p.to_string())))
    }

    pub fn is_subtask(&self) -> bool {
        matches!(self, Target::Parent(_))
    }

    pub async fn create(&self, client: &AsanaClient, mut task: NewTask) -> ApiResult<Task> {
        match self {
            Target::Project(project_id) => {
                task.projects = vec![project_id.clone()];
                client.create_task(&task).await
            }
            Target::Parent(parent_id) => client.create_subtask(parent_id, &task).await,
        }
    }
}

/// Run one of the single-call API commands. Returns whether the command succeeded.
pub async fn dispatch(command: Commands, session: &Session<'_>) -> Result<bool> {
    match command {
        Commands::GetTask { task_id } => tasks::get_task(session, &task_id).await,
        Commands::CompleteTask { task_id } => tasks::set_completed(session, &task_id, true).await,
        Commands::IncompleteTask { task_id } => {
            tasks::set_completed(session, &task_id, false).await
        }
        Commands::UpdateTask {
            task_id,
            field,
            value,
        } => tasks::update_field(session, &task_id, field, &value.join(" ")).await,
        Commands::AssignTask { task_id, user_gid } => {
            tasks::assign(session, &task_id, Some(&user_gid)).await
        }
        Commands::UnassignTask { task_id } => tasks::assign(session, &task_id, None).await,
        Commands::AddComment { task_id, text } => {
            tasks::add_comment(session, &task_id, &text.join(" ")).await
        }
        Commands::GetStories { task_id } => tasks::get_stories(session, &task_id).await,
        Commands::CreateTask { project_id, name } => {
            tasks::create(session, &Target::Project(project_id), &name.join(" ")).await
        }
        Commands::GetSubtasks { task_id } => tasks::get_subtasks(session, &task_id).await,
        Commands::CreateSubtask { task_id, name } => {
            tasks::create(session, &Target::Parent(task_id), &name.join(" ")).await
        }
        Commands::ListTasks { project_id, limit } => {
            projects::list_tasks(session, &project_id, limit).await
        }
        Commands::ListProjects { workspace_id } => {
            projects::list_projects(session, workspace_id.as_deref()).await
        }
        Commands::Search {
            workspace_id,
            query,
        } => projects::search(session, &workspace_id, &query.join(" ")).await,
        Commands::Me => users::me(session).await,
        Commands::ListUsers { workspace_id } => {
            users::list_users(session, workspace_id.as_deref()).await
        }
        Commands::Create(args) => {
            let plan = create::CreatePlan::from_args(&args)?;
            create::run(session, &plan).await
        }
        Commands::Batch(args) => {
            let file = batch::BatchFile::load(&args.input)?;
            let target = Target::from_ids(args.parent_id.as_deref(), args.project_id.as_deref())
                .ok_or_else(|| anyhow::anyhow!("Either --parent-id or --project-id is required"))?;
            batch::run(session, &file, &target, args.html).await?;
            Ok(true)
        }
        Commands::History { limit } => Ok(history(session.activity, limit)),
    }
}

/// Run the commands that never touch the API, so they work without credentials:
/// `history` and the dry runs of `create` and `batch`. Returns `None` for everything else.
pub fn run_offline(command: &Commands, activity: &ActivityLog) -> Result<Option<bool>> {
    match command {
        Commands::History { limit } => Ok(Some(history(activity, *limit))),
        Commands::Create(args) if args.dry_run => {
            let plan = create::CreatePlan::from_args(args)?;
            println!("{}", create::preview(&plan));
            Ok(Some(true))
        }
        Commands::Batch(args) if args.dry_run => {
            let file = batch::BatchFile::load(&args.input)?;
            println!("{}", batch::preview(&file));
            Ok(Some(true))
        }
        _ => Ok(None),
    }
}

/// Print the most recent activity log entries.
pub fn history(activity: &ActivityLog, limit: usize) -> bool {
    let events = activity.read(Some(limit));
    if events.is_empty() {
        println!("No activity recorded yet");
    }
    for event in &events {
        println!("{}", render_event(event));
    }
    true
}
