use anyhow::Result;
use reqwest::{header, Method};
use tracing::info;
use super::config::ApiConfig;
use colored_json::to_colored_json_auto;

/// JSON client bound to one API host.
pub struct Client<'a> {
    http_client: reqwest::Client,
    config: &'a ApiConfig,
}

impl<'a> Client<'a> {
    pub fn new(config: &'a ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .default_headers(Self::default_headers(config)?)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn default_headers(config: &ApiConfig) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();

        let token = format!("Bearer {}", config.auth_token);
        let mut auth_value = header::HeaderValue::from_str(&token)?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Resolves `path` below the configured host, keeping any host prefix.
    pub fn url(&self, path: &str) -> Result<reqwest::Url> {
        self.config
            .base_url()
            .join(path.trim_start_matches('/'))
            .map_err(anyhow::Error::new)
    }

    pub async fn get<U, R>(&self, url: U) -> Result<R>
    where
        U: Into<String>,
        R: serde::de::DeserializeOwned
    {
        let u = self.url(&url.into())?;

        info!("GET {u}");

        self
            .http_client
            .get(u)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(anyhow::Error::new)
    }

    pub async fn post<B, R, U>(&self, url: U, body: &B) -> Result<R>
    where
        U: Into<String>,
        B: serde::Serialize + std::fmt::Debug + ?Sized + Sync,
        R: serde::de::DeserializeOwned
    {
        self.send_json(Method::POST, url.into(), body).await
    }

    pub async fn put<B, R, U>(&self, url: U, body: &B) -> Result<R>
    where
        U: Into<String>,
        B: serde::Serialize + std::fmt::Debug + ?Sized + Sync,
        R: serde::de::DeserializeOwned
    {
        self.send_json(Method::PUT, url.into(), body).await
    }

    async fn send_json<B, R>(&self, method: Method, url: String, body: &B) -> Result<R>
    where
        B: serde::Serialize + std::fmt::Debug + ?Sized + Sync,
        R: serde::de::DeserializeOwned
    {
        let u = self.url(&url)?;

        #[cfg(windows)]
        let _enabled = colored_json::enable_ansi_support();

        info!("{method} {u}\n{}", serde_json::to_value(body).and_then(|v| to_colored_json_auto(&v))?);

        self
            .http_client
            .request(method, u)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(anyhow::Error::new)
    }
}
