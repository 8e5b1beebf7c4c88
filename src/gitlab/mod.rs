pub mod issue;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabConfig {
    pub client: crate::api::ApiConfig,
}

pub struct Client<'a> {
    pub http_client: crate::api::Client<'a>,
}

impl<'a> Client<'a> {
    pub fn new(config: &'a GitlabConfig) -> Result<Self> {
        Ok(Self {
            http_client: crate::api::Client::new(&config.client)?,
        })
    }
}

/// Path segment for a numeric project id or a `namespace/path`.
pub(crate) fn encode_project(project_id: &str) -> String {
    url::form_urlencoded::byte_serialize(project_id.as_bytes()).collect()
}
