use anyhow::Result;
use async_trait::async_trait;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// State the tracker reports for an issue that needs no reopening.
pub const OPENED: &str = "opened";

/// Issue as returned by the tracker.
#[derive(Debug, Clone, Deserialize)]
pub struct ExistingIssue {
    pub id: u64,
    /// Project-scoped id, the one updates are addressed by.
    pub iid: u64,
    pub title: String,
    pub state: String,
}

impl ExistingIssue {
    pub fn is_opened(&self) -> bool {
        self.state == OPENED
    }
}

#[derive(Debug, Serialize)]
pub struct CreateIssue<'a> {
    pub title: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    pub labels: String,
}

#[derive(Debug, Clone, Copy, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateEvent {
    #[display(fmt = "reopen")]
    Reopen,
}

#[derive(Debug, Serialize)]
pub struct UpdateIssue<'a> {
    pub description: &'a str,
    pub state_event: StateEvent,
}

/// Issue tracker backend.
///
/// Implementations surface transport and API failures as errors; a result is
/// only meaningful when no error was returned.
#[async_trait]
pub trait IssueGateway: Send + Sync {
    /// All issues of the project, in tracker order.
    async fn list(&self, project_id: &str) -> Result<Vec<ExistingIssue>>;

    async fn create(&self, project_id: &str, issue: &CreateIssue<'_>) -> Result<ExistingIssue>;

    async fn update(
        &self,
        project_id: &str,
        issue_iid: u64,
        update: &UpdateIssue<'_>,
    ) -> Result<ExistingIssue>;
}
