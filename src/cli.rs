use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "asana")]
#[command(about = "Asana task management from the terminal")]
#[command(version)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get task details
    GetTask { task_id: String },

    /// Mark task complete
    CompleteTask { task_id: String },

    /// Mark task incomplete
    IncompleteTask { task_id: String },

    /// Update one field of a task
    UpdateTask {
        task_id: String,
        #[arg(value_enum)]
        field: UpdateField,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// Assign task to user
    AssignTask { task_id: String, user_gid: String },

    /// Unassign task
    UnassignTask { task_id: String },

    /// Add comment to task
    AddComment {
        task_id: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// List comments on a task
    GetStories { task_id: String },

    /// Create new task in a project
    CreateTask {
        project_id: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        name: Vec<String>,
    },

    /// List subtasks
    GetSubtasks { task_id: String },

    /// Create subtask under a task
    CreateSubtask {
        task_id: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        name: Vec<String>,
    },

    /// List tasks in project
    ListTasks {
        project_id: String,
        #[arg(default_value_t = 50)]
        limit: u32,
    },

    /// List projects (defaults to your first workspace)
    ListProjects { workspace_id: Option<String> },

    /// Search tasks in a workspace
    Search {
        workspace_id: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Get current user info
    #[command(alias = "whoami")]
    Me,

    /// List users in workspace (defaults to your first workspace)
    ListUsers { workspace_id: Option<String> },

    /// Create or update a task with the standard title and description format
    Create(CreateArgs),

    /// Create tasks in bulk from a JSON file
    Batch(BatchArgs),

    /// Show recent writes made by this tool
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateField {
    #[value(name = "name")]
    Name,
    #[value(name = "notes")]
    Notes,
    #[value(name = "due_on")]
    DueOn,
    #[value(name = "assignee")]
    Assignee,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    #[value(name = "BE")]
    Be,
    #[value(name = "FE")]
    Fe,
    #[value(name = "DevOps")]
    DevOps,
    #[value(name = "QA")]
    Qa,
    #[value(name = "Mobile")]
    Mobile,
    #[value(name = "Design")]
    Design,
    #[value(name = "Docs")]
    Docs,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Be => "BE",
            Platform::Fe => "FE",
            Platform::DevOps => "DevOps",
            Platform::Qa => "QA",
            Platform::Mobile => "Mobile",
            Platform::Design => "Design",
            Platform::Docs => "Docs",
        }
    }
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .multiple(true)
        .args(["project_id", "parent_id", "task_id"])
))]
pub struct CreateArgs {
    /// Project to create the task in
    #[arg(long)]
    pub project_id: Option<String>,

    /// Parent task; creates a subtask
    #[arg(long)]
    pub parent_id: Option<String>,

    /// Existing task to update instead of creating one
    #[arg(long)]
    pub task_id: Option<String>,

    /// Project name used in the title prefix
    #[arg(long)]
    pub project_name: String,

    #[arg(long, value_enum)]
    pub platform: Platform,

    /// Task title, without prefix
    #[arg(long)]
    pub title: String,

    /// Implementation details, pipe-separated
    #[arg(long)]
    pub details: String,

    /// Test cases, pipe-separated
    #[arg(long)]
    pub tests: Option<String>,

    /// Related files, pipe-separated
    #[arg(long)]
    pub files: Option<String>,

    /// Dependencies, pipe-separated
    #[arg(long)]
    pub dependencies: Option<String>,

    /// Time estimate (e.g. 4h); written to the Dev Hours field
    #[arg(long)]
    pub estimate: Option<String>,

    /// Print what would be sent without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["parent_id", "project_id"])
))]
pub struct BatchArgs {
    /// JSON file with project_name and subtasks
    #[arg(long)]
    pub input: PathBuf,

    /// Parent task for subtasks
    #[arg(long)]
    pub parent_id: Option<String>,

    /// Project for top-level tasks
    #[arg(long)]
    pub project_id: Option<String>,

    /// Preview without creating
    #[arg(long)]
    pub dry_run: bool,

    /// Send rich-text notes and set Dev Hours on each task
    #[arg(long)]
    pub html: bool,
}
