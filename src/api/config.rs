use url::Url;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base url, may carry a path when the API is served under a prefix.
    pub host: Url,
    pub auth_token: String,
}

impl ApiConfig {
    /// `host` with a trailing slash, so relative paths resolve below it.
    pub fn base_url(&self) -> Url {
        let mut base = self.host.clone();

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base
    }
}
