//! Files application errors as GitLab issues, reopening the existing issue
//! when the same error comes back instead of opening a duplicate.

pub mod api;
pub mod fingerprint;
pub mod gateway;
pub mod gitlab;
pub mod issue_data;
pub mod options;
pub mod reconcile;
pub mod settings;

pub use crate::fingerprint::checksum;
pub use crate::gateway::{ExistingIssue, IssueGateway};
pub use crate::issue_data::{ErrorReport, IssueData, StructuredReport};
pub use crate::options::ReportOptions;
pub use crate::reconcile::{reconcile, report, report_raw, report_structured, Outcome};
