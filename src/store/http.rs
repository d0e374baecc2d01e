// src/store/http.rs
//
// Remote tier as one JSON document behind a URL: GET to read, PUT to replace.
// A 404 reads as "nothing stored yet".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::consts::USER_AGENT;
use crate::config::options::StoreOptions;
use crate::error::{Error, Result};

use super::remote::{RemoteDocument, RemoteStore};

#[derive(Clone, Debug)]
pub struct HttpRemote {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpRemote {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!("remote url must be http(s): {url}")));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, url, token })
    }

    /// `None` when the options carry no remote url.
    pub fn from_options(opts: &StoreOptions) -> Result<Option<Self>> {
        if !opts.remote_configured() {
            return Ok(None);
        }
        let url = opts.remote_url.clone().unwrap_or_default();
        let timeout = Duration::from_secs(opts.remote_timeout_secs);
        Self::new(url.trim(), opts.remote_token.clone(), timeout).map(Some)
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let req = self.client.request(method, &self.url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn fetch(&self) -> Result<Option<RemoteDocument>> {
        let resp = self.request(reqwest::Method::GET).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            s if s.is_success() => Ok(Some(resp.json::<RemoteDocument>().await?)),
            s => Err(Error::Remote(format!("GET {} -> {}", self.url, s))),
        }
    }

    async fn store(&self, doc: &RemoteDocument) -> Result<()> {
        let resp = self.request(reqwest::Method::PUT).json(doc).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Remote(format!("PUT {} -> {}", self.url, status)))
        }
    }

    fn describe(&self) -> String { format!("http {}", self.url) }
}
