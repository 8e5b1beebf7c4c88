use crate::gitlab::GitlabConfig;
use crate::options::ReportOptions;
use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "GITLAB_LOGGING";

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Only needed to send reports, a dry run works without it.
    pub gitlab: Option<GitlabConfig>,
    pub report: ReportOptions,
}

impl Settings {
    /// Loads `path` (or the default config file, if any) overlaid with
    /// `GITLAB_LOGGING_*` environment variables.
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => Some(File::from(p).required(true)),
            None => default_config_path().map(|p| File::from(p).required(false)),
        };

        Self::build(file, Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__"))
    }

    fn build<S>(file: Option<S>, env: Environment) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let mut builder = Config::builder();

        if let Some(file) = file {
            builder = builder.add_source(file);
        }

        builder
            // Eg. `GITLAB_LOGGING_REPORT__ENVIRONMENT=staging`
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gitlab-logging").map(|dirs| dirs.config_dir().join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const YAML: &str = r#"
gitlab:
  client:
    host: https://gitlab.example.com/
    auth_token: secret
report:
  project_id: 42
  assignee_id: 7
  environment: production
"#;

    fn unused_env() -> Environment {
        Environment::with_prefix("GITLAB_LOGGING_TEST_UNSET").separator("__")
    }

    #[test]
    fn loads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, YAML).unwrap();

        let settings = Settings::build(Some(File::from(path.as_path())), unused_env()).unwrap();

        let gitlab = settings.gitlab.unwrap();
        assert_eq!(gitlab.client.host.as_str(), "https://gitlab.example.com/");
        assert_eq!(gitlab.client.auth_token, "secret");
        assert_eq!(settings.report.project_id, "42");
        assert_eq!(settings.report.assignee_id, Some(7));
        assert_eq!(settings.report.environment, "production");
        assert_eq!(settings.report.fence_language, "javascript");
    }

    #[test]
    fn gitlab_section_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "report:\n  project_id: group/app\n  environment: staging\n").unwrap();

        let settings = Settings::build(Some(File::from(path.as_path())), unused_env()).unwrap();

        assert!(settings.gitlab.is_none());
        assert_eq!(settings.report.project_id, "group/app");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        assert!(Settings::new(Some(&path)).is_err());
    }

    #[test]
    fn missing_fields_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "report:\n  environment: production\n").unwrap();

        assert!(Settings::build(Some(File::from(path.as_path())), unused_env()).is_err());
    }
}
