use crate::model::draft::TaskDraft;

const HOUR_SUFFIXES: [&str; 5] = ["hours", "hour", "hrs", "hr", "h"];

/// `[project][platform] title`, verbatim.
pub fn format_title(project_name: &str, platform: &str, title: &str) -> String {
    format!("[{project_name}][{platform}] {title}")
}

/// Parse an estimate such as `4h`, `2.5 hrs` or `4`. Anything else is `None`.
pub fn parse_hours(estimate: &str) -> Option<f64> {
    let lowered = estimate.trim().to_lowercase();
    let number = HOUR_SUFFIXES
        .iter()
        .find_map(|suffix| lowered.strip_suffix(suffix))
        .unwrap_or(&lowered)
        .trim();
    if number.is_empty() {
        return None;
    }
    number.parse::<f64>().ok().filter(|h| h.is_finite())
}

/// Split a `|`-separated flag value into trimmed, non-empty items.
pub fn split_pipes(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Markdown-flavoured plain text description, used for `notes`.
pub fn format_description(draft: &TaskDraft) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !draft.details.is_empty() {
        lines.push("**Implementation Detail:**\n".into());
        lines.extend(draft.details.iter().map(|d| format!("- {d}")));
        lines.push(String::new());
    }

    if !draft.tests.is_empty() {
        lines.push("**Testing Checklist:**\n".into());
        lines.extend(draft.tests.iter().map(|t| format!("- [ ] {t}")));
        lines.push(String::new());
    }

    if !draft.files.is_empty() {
        lines.push("**Files:**".into());
        lines.extend(draft.files.iter().map(|f| format!("- `{f}`")));
        lines.push(String::new());
    }

    if !draft.dependencies.is_empty() {
        lines.push("**Dependencies:**".into());
        lines.extend(draft.dependencies.iter().map(|d| format!("- {d}")));
        lines.push(String::new());
    }

    if let Some(estimate) = draft.estimate.as_deref().filter(|e| !e.is_empty()) {
        lines.push(format!("**Estimate:** {estimate}"));
    }

    lines.join("\n")
}

/// Rich text description for `html_notes`. The estimate is left out; it belongs in the
/// Dev Hours custom field.
pub fn format_html_notes(draft: &TaskDraft) -> String {
    let mut parts: Vec<String> = Vec::new();

    push_html_section(&mut parts, "Implementation Detail", &draft.details, escape_html);
    push_html_section(&mut parts, "Testing Checklist", &draft.tests, |t| {
        format!("[ ] {}", escape_html(t))
    });
    push_html_section(&mut parts, "Files", &draft.files, |f| {
        format!("<code>{}</code>", escape_html(f))
    });
    push_html_section(&mut parts, "Dependencies", &draft.dependencies, escape_html);

    format!("<body>{}</body>", parts.join("\n"))
}

fn push_html_section(
    parts: &mut Vec<String>,
    label: &str,
    items: &[String],
    render: impl Fn(&str) -> String,
) {
    if items.is_empty() {
        return;
    }
    parts.push(format!("<strong>{label}:</strong>"));
    parts.push("<ul>".into());
    parts.extend(items.iter().map(|item| format!("<li>{}</li>", render(item.as_str()))));
    parts.push("</ul>".into());
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
