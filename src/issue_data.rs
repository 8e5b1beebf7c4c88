use crate::fingerprint::checksum;
use crate::options::ReportOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const RAW_NOTE: &str = "#### :zap: Note: this issue has been automatically opened.";
const STRUCTURED_NOTE: &str = "Note: this issue has been automatically opened.";
const SEPARATOR: &str = "\n\n---\n\n";

/// Error payload with enough context to file a readable issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredReport {
    pub message: String,
    pub url: String,
    pub stacktrace: String,
    /// Named values captured at the failure site, rendered in insertion order.
    #[serde(default)]
    pub vars: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ErrorReport {
    /// A bare stack trace or error string.
    Raw(String),
    Structured(StructuredReport),
}

/// Title and description of the issue to file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueData {
    pub title: String,
    pub description: String,
}

impl ErrorReport {
    /// Text the fingerprint is computed from.
    pub fn fingerprint_source(&self) -> &str {
        match self {
            ErrorReport::Raw(error) => error,
            ErrorReport::Structured(report) => &report.message,
        }
    }

    pub fn checksum(&self) -> String {
        checksum(self.fingerprint_source())
    }

    /// Structured titles carry no checksum, so those reports dedupe on `message` alone.
    pub fn to_issue_data(&self, checksum: &str, options: &ReportOptions) -> Result<IssueData> {
        match self {
            ErrorReport::Raw(error) => Ok(raw_issue_data(error, checksum, options)),
            ErrorReport::Structured(report) => structured_issue_data(report, options),
        }
    }
}

fn fenced(out: &mut String, language: &str, body: &str) {
    out.push_str("```");
    out.push_str(language);
    out.push('\n');
    out.push_str(body);
    out.push_str("\n```");
}

fn raw_issue_data(error: &str, checksum: &str, options: &ReportOptions) -> IssueData {
    let mut description = String::from(RAW_NOTE);
    description.push_str(SEPARATOR);
    fenced(&mut description, &options.fence_language, error);

    IssueData {
        title: format!(
            "[ERROR@{}] Events Server Exception ({checksum})",
            options.environment
        ),
        description,
    }
}

fn structured_issue_data(report: &StructuredReport, options: &ReportOptions) -> Result<IssueData> {
    let language = options.fence_language.as_str();

    let mut description = String::from(STRUCTURED_NOTE);
    description.push_str(SEPARATOR);

    writeln!(description, "+   URL : {}\n", report.url)?;

    description.push_str("# Stacktrace\n\n");
    fenced(&mut description, language, &report.stacktrace);
    description.push_str("\n\n");

    if let Some(vars) = &report.vars {
        description.push_str("# Variables\n\n");

        for (name, value) in vars {
            writeln!(description, "## {name}\n")?;
            fenced(&mut description, language, &serde_json::to_string_pretty(value)?);
            description.push_str("\n\n");
        }
    }

    Ok(IssueData {
        title: format!("[ERROR] {}", report.message),
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> ReportOptions {
        ReportOptions::new("42", "production")
    }

    fn structured(vars: Option<serde_json::Value>) -> ErrorReport {
        ErrorReport::Structured(StructuredReport {
            message: "Null pointer".to_owned(),
            url: "https://x/y".to_owned(),
            stacktrace: "at foo()".to_owned(),
            vars: vars.and_then(|v| v.as_object().cloned()),
        })
    }

    #[test]
    fn raw_report_title_embeds_environment_and_checksum() {
        let report = ErrorReport::Raw("TypeError: x is undefined".to_owned());
        let checksum = report.checksum();

        let issue = report.to_issue_data(&checksum, &options()).unwrap();

        assert_eq!(
            issue.title,
            format!(
                "[ERROR@production] Events Server Exception ({})",
                crate::fingerprint::checksum("TypeError: x is undefined")
            )
        );
        assert_eq!(
            issue.description,
            "#### :zap: Note: this issue has been automatically opened.\n\n---\n\n\
             ```javascript\nTypeError: x is undefined\n```"
        );
    }

    #[test]
    fn raw_report_is_rendered_identically_every_time() {
        let report = ErrorReport::Raw("Error: boom\n    at run (app.js:3:9)".to_owned());
        let checksum = report.checksum();

        let first = report.to_issue_data(&checksum, &options()).unwrap();
        let second = report.to_issue_data(&report.checksum(), &options()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn structured_report_renders_url_stacktrace_and_vars() {
        let report = structured(Some(json!({ "user": { "id": 1 } })));

        let issue = report.to_issue_data(&report.checksum(), &options()).unwrap();

        assert_eq!(issue.title, "[ERROR] Null pointer");
        assert_eq!(
            issue.description,
            "Note: this issue has been automatically opened.\n\n---\n\n\
             +   URL : https://x/y\n\n\
             # Stacktrace\n\n```javascript\nat foo()\n```\n\n\
             # Variables\n\n\
             ## user\n\n```javascript\n{\n  \"id\": 1\n}\n```\n\n"
        );
    }

    #[test]
    fn structured_report_without_vars_has_no_variables_section() {
        let report = structured(None);

        let issue = report.to_issue_data(&report.checksum(), &options()).unwrap();

        assert!(issue.description.contains("+   URL : https://x/y"));
        assert!(issue.description.contains("```javascript\nat foo()\n```"));
        assert!(!issue.description.contains("# Variables"));
    }

    #[test]
    fn empty_vars_still_get_a_variables_header() {
        let report = structured(Some(json!({})));

        let issue = report.to_issue_data(&report.checksum(), &options()).unwrap();

        assert!(issue.description.ends_with("```javascript\nat foo()\n```\n\n# Variables\n\n"));
    }

    #[test]
    fn vars_keep_caller_order() {
        let report = structured(Some(json!({ "zeta": 1, "alpha": 2 })));

        let issue = report.to_issue_data(&report.checksum(), &options()).unwrap();
        let zeta = issue.description.find("## zeta").unwrap();
        let alpha = issue.description.find("## alpha").unwrap();

        assert!(zeta < alpha);
    }

    #[test]
    fn structured_checksum_comes_from_message() {
        let report = structured(None);

        assert_eq!(report.fingerprint_source(), "Null pointer");
        assert_eq!(report.checksum(), crate::fingerprint::checksum("Null pointer"));
    }

    #[test]
    fn fence_language_is_configurable() {
        let mut options = options();
        options.fence_language = "rust".to_owned();
        let report = ErrorReport::Raw("panicked at src/main.rs:1:1".to_owned());

        let issue = report.to_issue_data(&report.checksum(), &options).unwrap();

        assert!(issue.description.contains("```rust\npanicked at src/main.rs:1:1\n```"));
    }

    #[test]
    fn structured_report_deserializes_without_vars() {
        let report: StructuredReport = serde_json::from_value(json!({
            "message": "Null pointer",
            "url": "https://x/y",
            "stacktrace": "at foo()",
        }))
        .unwrap();

        assert!(report.vars.is_none());
    }
}
