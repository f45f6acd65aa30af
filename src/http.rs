use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Applied to every outbound request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Plain HTTP calls used by the notifier and the reporter
pub trait Transport {
    /// GETs `url` and returns the body of a successful response
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String>>;

    /// POSTs `body` as JSON and returns the response status, whatever it is
    fn post_json(&self, url: &str, body: &Value) -> impl Future<Output = Result<u16>>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: client()?,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("GET {url} returned status {status}");
        }
        res.text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<u16> {
        let res = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?;
        Ok(res.status().as_u16())
    }
}
