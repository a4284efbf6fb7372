use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::create::set_dev_hours;
use super::{Session, Target};
use crate::client::PropagationMode;
use crate::model::draft::TaskDraft;
use crate::model::task::NewTask;
use crate::util::format::{format_description, format_html_notes, format_title, parse_hours};

/// One failed item never stops the batch.
const MODE: PropagationMode = PropagationMode::ContinueAndReport;
const RULE_WIDTH: usize = 50;

fn default_project_name() -> String {
    "Project".into()
}

#[derive(Debug, Deserialize)]
pub struct BatchFile {
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default, alias = "tasks")]
    pub subtasks: Vec<TaskDraft>,
}

impl BatchFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Sum of every estimate that parses as hours.
    pub fn total_hours(&self) -> f64 {
        self.subtasks
            .iter()
            .filter_map(|t| t.estimate.as_deref().and_then(parse_hours))
            .sum()
    }

    pub fn title_for(&self, draft: &TaskDraft) -> String {
        format_title(&self.project_name, &draft.platform, &draft.title)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchReport {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub total_hours: f64,
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Hours always carry a decimal point: `6.0h`, `2.5h`.
pub fn total_hours_line(hours: f64) -> String {
    format!("Total estimated hours: {hours:?}h")
}

fn header(file: &BatchFile) -> String {
    format!(
        "Project: {}\nFound {} tasks to create\n{}",
        file.project_name,
        file.subtasks.len(),
        rule()
    )
}

/// What `batch --dry-run` prints: every title and estimate, then the totals.
pub fn preview(file: &BatchFile) -> String {
    let mut out = header(file);
    for draft in &file.subtasks {
        out.push_str(&format!(
            "\n\n[DRY RUN] {}\n  Estimate: {}",
            file.title_for(draft),
            draft.estimate.as_deref().unwrap_or("")
        ));
    }
    out.push_str(&format!(
        "\n{}\n{}\nDry run complete. {} tasks would be created.",
        rule(),
        total_hours_line(file.total_hours()),
        file.subtasks.len()
    ));
    out
}

/// Closing lines of a real run.
pub fn summary(report: &BatchReport) -> String {
    let counts = if report.failed > 0 {
        format!(
            "Created {}/{} tasks ({} failed).",
            report.created, report.total, report.failed
        )
    } else {
        format!("Created {}/{} tasks.", report.created, report.total)
    };
    format!(
        "{}\n{}\n{counts}",
        rule(),
        total_hours_line(report.total_hours)
    )
}

/// Create every task in order. Failures are printed and counted; the rest still run.
/// With `rich`, tasks get HTML notes and their estimate goes into the Dev Hours field.
pub async fn run(
    session: &Session<'_>,
    file: &BatchFile,
    target: &Target,
    rich: bool,
) -> Result<BatchReport> {
    println!("{}", header(file));

    let mut report = BatchReport {
        total: file.subtasks.len(),
        total_hours: file.total_hours(),
        ..Default::default()
    };

    for draft in &file.subtasks {
        let name = file.title_for(draft);
        let mut new_task = NewTask {
            name: name.clone(),
            ..Default::default()
        };
        if rich {
            new_task.html_notes = Some(format_html_notes(draft));
        } else {
            new_task.notes = Some(format_description(draft));
        }

        let Some(task) = MODE.settle(target.create(session.client, new_task).await)? else {
            println!("✗ Failed: {name}");
            report.failed += 1;
            continue;
        };

        report.created += 1;
        let action = if target.is_subtask() {
            "subtask_created"
        } else {
            "task_created"
        };
        session
            .activity
            .record(action, Some(&task.gid), Some(&name), None);
        println!(
            "✓ Created: {} (GID: {})",
            task.name.as_deref().unwrap_or(&name),
            task.gid
        );

        if rich {
            if let Some(hours) = draft
                .estimate
                .as_deref()
                .and_then(parse_hours)
                .filter(|h| *h > 0.0)
            {
                set_dev_hours(session, &task.gid, hours).await?;
            }
        }
    }

    println!("{}", summary(&report));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityLog;
    use crate::client::AsanaClient;
    use crate::config::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const THREE_TASKS: &str = r#"{
        "project_name": "Shop",
        "subtasks": [
            { "platform": "BE", "title": "Schema", "details": ["Add table"], "estimate": "4h" },
            { "platform": "FE", "title": "Form", "details": ["Add form"], "tests": ["Submits"], "estimate": "2" },
            { "platform": "QA", "title": "Smoke", "estimate": "later" }
        ]
    }"#;

    fn session<'a>(client: &'a AsanaClient, activity: &'a ActivityLog) -> Session<'a> {
        Session {
            client,
            activity,
            dev_hours_field: "Dev Hours",
        }
    }

    #[test]
    fn parse_applies_defaults_and_alias() {
        let file = BatchFile::parse(r#"{ "tasks": [ {} ] }"#).unwrap();
        assert_eq!(file.project_name, "Project");
        assert_eq!(file.subtasks.len(), 1);
        assert_eq!(file.title_for(&file.subtasks[0]), "[Project][API] Untitled");
    }

    #[test]
    fn total_hours_skips_unparseable_estimates() {
        let file = BatchFile::parse(THREE_TASKS).unwrap();
        assert_eq!(file.total_hours(), 6.0);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = BatchFile::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, THREE_TASKS).unwrap();
        assert_eq!(BatchFile::load(&path).unwrap().subtasks.len(), 3);
    }

    #[test]
    fn dry_run_lists_every_title_and_estimate() {
        let file = BatchFile::parse(
            r#"{
                "project_name": "Shop",
                "subtasks": [
                    { "platform": "BE", "title": "Schema", "estimate": "4h" },
                    { "platform": "FE", "title": "Form" }
                ]
            }"#,
        )
        .unwrap();

        let text = preview(&file);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines.contains(&"[DRY RUN] [Shop][BE] Schema"));
        assert!(lines.contains(&"  Estimate: 4h"));
        assert!(lines.contains(&"[DRY RUN] [Shop][FE] Form"));
        assert!(lines.contains(&"  Estimate: "));
        assert!(lines.contains(&"Total estimated hours: 4.0h"));
        assert_eq!(
            lines.last(),
            Some(&"Dry run complete. 2 tasks would be created.")
        );
    }

    #[test]
    fn total_hours_always_show_a_decimal_point() {
        assert_eq!(total_hours_line(6.0), "Total estimated hours: 6.0h");
        assert_eq!(total_hours_line(0.0), "Total estimated hours: 0.0h");
        assert_eq!(total_hours_line(2.5), "Total estimated hours: 2.5h");
    }

    #[test]
    fn summary_mentions_failures_only_when_there_are_some() {
        let clean = BatchReport {
            total: 2,
            created: 2,
            failed: 0,
            total_hours: 6.0,
        };
        assert!(summary(&clean).ends_with("Total estimated hours: 6.0h\nCreated 2/2 tasks."));

        let partial = BatchReport {
            created: 1,
            failed: 1,
            ..clean
        };
        assert!(summary(&partial).ends_with("Created 1/2 tasks (1 failed)."));
    }

    #[tokio::test]
    async fn second_failure_does_not_stop_the_batch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks/parent-1/subtasks"))
            .and(body_string_contains("[Shop][FE] Form"))
            .respond_with(ResponseTemplate::new(500).set_body_string("{\"errors\":[{\"message\":\"boom\"}]}"))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/tasks/parent-1/subtasks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "gid": "900", "name": "created" }
            })))
            .mount(&server)
            .await;

        let client = AsanaClient::new(&ApiConfig::new(&server.uri(), "t".into()));
        let activity = ActivityLog::disabled();
        let file = BatchFile::parse(THREE_TASKS).unwrap();

        let report = run(
            &session(&client, &activity),
            &file,
            &Target::Parent("parent-1".into()),
            false,
        )
        .await
        .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        // The failed task's 2h still counts; "later" never parsed.
        assert_eq!(report.total_hours, 6.0);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn plain_mode_sends_markdown_notes_to_project() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks"))
            .and(body_string_contains("\"projects\":[\"p1\"]"))
            .and(body_string_contains("**Implementation Detail:**"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "gid": "901", "name": "x" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AsanaClient::new(&ApiConfig::new(&server.uri(), "t".into()));
        let activity = ActivityLog::disabled();
        let file = BatchFile::parse(
            r#"{ "project_name": "Shop", "subtasks": [ { "title": "One", "details": ["d"] } ] }"#,
        )
        .unwrap();

        let report = run(
            &session(&client, &activity),
            &file,
            &Target::Project("p1".into()),
            false,
        )
        .await
        .unwrap();
        assert_eq!(report.created, 1);
    }

    #[tokio::test]
    async fn rich_mode_sets_dev_hours() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks/parent-1/subtasks"))
            .and(body_string_contains("\"html_notes\""))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "gid": "902", "name": "x" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks/902"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "gid": "902", "custom_fields": [
                    { "gid": "77", "name": "Dev Hours", "type": "number" }
                ]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/tasks/902"))
            .and(body_string_contains("\"77\":3.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "gid": "902" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AsanaClient::new(&ApiConfig::new(&server.uri(), "t".into()));
        let activity = ActivityLog::disabled();
        let file = BatchFile::parse(
            r#"{ "subtasks": [ { "title": "One", "details": ["d"], "estimate": "3h" } ] }"#,
        )
        .unwrap();

        let report = run(
            &session(&client, &activity),
            &file,
            &Target::Parent("parent-1".into()),
            true,
        )
        .await
        .unwrap();
        assert_eq!(report.created, 1);
    }
}
