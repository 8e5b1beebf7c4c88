use crate::gateway::{CreateIssue, ExistingIssue, IssueGateway, StateEvent, UpdateIssue, OPENED};
use crate::issue_data::{ErrorReport, IssueData, StructuredReport};
use crate::options::ReportOptions;
use anyhow::{bail, Context, Result};
use derive_more::Display;
use tracing::{debug, error, info};

/// What a reconciliation did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    #[display(fmt = "Opened issue #{} on GitLab", _0)]
    Created(u64),

    #[display(fmt = "Re-opened existing issue #{} on GitLab", _0)]
    Reopened(u64),

    #[display(fmt = "Issue #{} exists and is already opened, not re-opening", _0)]
    AlreadyOpened(u64),
}

/// First issue whose title equals `title`, scanning in tracker order.
pub fn find_existing<'a>(issues: &'a [ExistingIssue], title: &str) -> Option<&'a ExistingIssue> {
    issues.iter().find(|issue| issue.title == title)
}

/// Files `issue` unless an issue with the same title is already open.
///
/// One list call, then at most one create or update call, strictly in that
/// order. Concurrent calls for the same title are not serialized: both can
/// miss each other's issue and create a duplicate.
pub async fn reconcile<G>(gateway: &G, issue: &IssueData, options: &ReportOptions) -> Result<Outcome>
where
    G: IssueGateway + ?Sized,
{
    let issues = gateway
        .list(&options.project_id)
        .await
        .context("Could not list issues from GitLab")?;

    debug!("{} existing issues in project {}", issues.len(), options.project_id);

    match find_existing(&issues, &issue.title) {
        None => {
            let body = CreateIssue {
                title: &issue.title,
                description: &issue.description,
                assignee_id: options.assignee_id,
                labels: options.labels(),
            };

            let created = gateway
                .create(&options.project_id, &body)
                .await
                .context("Could not open issue on GitLab")?;

            Ok(Outcome::Created(created.iid))
        }

        Some(existing) if existing.is_opened() => Ok(Outcome::AlreadyOpened(existing.iid)),

        Some(existing) => {
            let body = UpdateIssue {
                description: &issue.description,
                state_event: StateEvent::Reopen,
            };

            let row = gateway
                .update(&options.project_id, existing.iid, &body)
                .await
                .with_context(|| format!("Could not re-open existing issue #{} on GitLab", existing.iid))?;

            match row.state.as_str() {
                OPENED | "reopened" => Ok(Outcome::Reopened(row.iid)),
                state => bail!(
                    "Could not re-open existing issue #{} on GitLab: state is still {state:?}",
                    existing.iid
                ),
            }
        }
    }
}

async fn try_report<G>(gateway: &G, report: &ErrorReport, options: &ReportOptions) -> Result<Outcome>
where
    G: IssueGateway + ?Sized,
{
    let checksum = report.checksum();
    debug!("checksum {checksum}");

    let issue = report
        .to_issue_data(&checksum, options)
        .context("Could not format issue")?;

    reconcile(gateway, &issue, options).await
}

/// Reports an error and logs what happened. Never fails.
pub async fn report<G>(gateway: &G, report: &ErrorReport, options: &ReportOptions)
where
    G: IssueGateway + ?Sized,
{
    info!("Engaging GitLab issue opening process...");

    match try_report(gateway, report, options).await {
        Ok(outcome) => info!("{outcome}"),
        Err(e) => error!("{e:#}"),
    }
}

/// Reports a raw stack trace. Outcome is only visible in the logs.
pub async fn report_raw<G>(gateway: &G, error: &str, options: &ReportOptions)
where
    G: IssueGateway + ?Sized,
{
    report(gateway, &ErrorReport::Raw(error.to_owned()), options).await
}

/// Reports a structured error. Outcome is only visible in the logs.
pub async fn report_structured<G>(gateway: &G, params: &StructuredReport, options: &ReportOptions)
where
    G: IssueGateway + ?Sized,
{
    report(gateway, &ErrorReport::Structured(params.clone()), options).await
}
