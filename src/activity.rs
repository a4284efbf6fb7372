use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

use crate::config::data_dir;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEvent {
    pub timestamp: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_gid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Append-only JSONL record of the writes this tool made.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
    enabled: bool,
}

impl ActivityLog {
    pub fn new(path: PathBuf, enabled: bool) -> Self {
        Self { path, enabled }
    }

    pub fn open_default(enabled: bool) -> Self {
        Self::new(data_dir().join("activity.jsonl"), enabled)
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self::new(PathBuf::new(), false)
    }

    pub fn append(&self, event: &ActivityEvent) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(event)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Record an event, ignoring failures to write it.
    pub fn record(
        &self,
        action: &str,
        task_gid: Option<&str>,
        task_name: Option<&str>,
        message: Option<&str>,
    ) {
        if let Err(e) = self.append(&new_event(action, task_gid, task_name, message)) {
            tracing::debug!(error = %e, "could not write activity log");
        }
    }

    pub fn read(&self, limit: Option<usize>) -> Vec<ActivityEvent> {
        if !self.path.exists() {
            return Vec::new();
        }
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        let mut events: Vec<ActivityEvent> = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        if let Some(limit) = limit {
            let len = events.len();
            if len > limit {
                events = events.split_off(len - limit);
            }
        }

        events
    }
}

pub fn new_event(
    action: &str,
    task_gid: Option<&str>,
    task_name: Option<&str>,
    message: Option<&str>,
) -> ActivityEvent {
    ActivityEvent {
        timestamp: chrono::Utc::now().to_rfc3339(),
        action: action.to_string(),
        task_gid: task_gid.map(String::from),
        task_name: task_name.map(String::from),
        message: message.map(String::from),
    }
}

pub fn render_event(event: &ActivityEvent) -> String {
    let mut line = format!("{} {}", event.timestamp, event.action);
    if let Some(gid) = &event.task_gid {
        line.push_str(&format!(" [{gid}]"));
    }
    if let Some(name) = &event.task_name {
        line.push_str(&format!(" {name}"));
    }
    if let Some(message) = &event.message {
        line.push_str(&format!(" ({message})"));
    }
    line
}
