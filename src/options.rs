use serde::Deserialize;

pub const DEFAULT_FENCE_LANGUAGE: &str = "javascript";

/// Per-call settings for a report: where the issue goes and how it is labelled.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportOptions {
    /// Numeric project id or `namespace/path`.
    pub project_id: String,
    pub assignee_id: Option<u64>,
    pub environment: String,
    /// Info string of the code fences in issue bodies.
    #[serde(default = "default_fence_language")]
    pub fence_language: String,
}

fn default_fence_language() -> String {
    DEFAULT_FENCE_LANGUAGE.to_owned()
}

impl ReportOptions {
    pub fn new(project_id: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            assignee_id: None,
            environment: environment.into(),
            fence_language: default_fence_language(),
        }
    }

    pub fn with_assignee(mut self, assignee_id: Option<u64>) -> Self {
        self.assignee_id = assignee_id;
        self
    }

    /// Labels attached to newly created issues.
    pub fn labels(&self) -> String {
        format!("error, bug, {}", self.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_include_environment() {
        let options = ReportOptions::new("42", "staging");

        assert_eq!(options.labels(), "error, bug, staging");
    }

    #[test]
    fn fence_language_defaults_when_missing() {
        let options: ReportOptions = serde_json::from_str(
            r#"{"project_id": "group/app", "environment": "production"}"#,
        )
        .unwrap();

        assert_eq!(options.fence_language, DEFAULT_FENCE_LANGUAGE);
        assert_eq!(options.assignee_id, None);
    }
}
