use super::{encode_project, Client};
use crate::gateway::{CreateIssue, ExistingIssue, IssueGateway, UpdateIssue};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

const PER_PAGE: usize = 100;

fn issues_url(project_id: &str) -> String {
    format!("api/v4/projects/{}/issues", encode_project(project_id))
}

fn page_url(project_id: &str, page: u32) -> String {
    format!("{}?per_page={PER_PAGE}&page={page}", issues_url(project_id))
}

#[async_trait]
impl<'a> IssueGateway for Client<'a> {
    async fn list(&self, project_id: &str) -> Result<Vec<ExistingIssue>> {
        let mut issues = Vec::new();
        let mut page = 1;

        loop {
            let batch: Vec<ExistingIssue> = self.http_client.get(page_url(project_id, page)).await?;
            let last = batch.len() < PER_PAGE;

            debug!("page {page}: {} issues", batch.len());
            issues.extend(batch);

            if last {
                break;
            }

            page += 1;
        }

        Ok(issues)
    }

    async fn create(&self, project_id: &str, issue: &CreateIssue<'_>) -> Result<ExistingIssue> {
        self.http_client.post(issues_url(project_id), issue).await
    }

    async fn update(
        &self,
        project_id: &str,
        issue_iid: u64,
        update: &UpdateIssue<'_>,
    ) -> Result<ExistingIssue> {
        let url = format!("{}/{issue_iid}", issues_url(project_id));

        self.http_client.put(url, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_test() {
        assert_eq!(
            page_url("group/app", 3),
            "api/v4/projects/group%2Fapp/issues?per_page=100&page=3"
        );
    }
}
