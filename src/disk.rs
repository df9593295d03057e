// Storage module: blocking client for the Yandex.Disk REST API.
// Folder creation and the existence check go through the `resources`
// endpoint; actual byte transfer is a two-step dance: ask the API for a
// one-time upload href, then PUT the raw bytes straight to that href.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;

const DISK_API_BASE: &str = "https://cloud-api.yandex.net/v1/disk/resources";

/// Remote store the backup writes into. The orchestrator only talks to
/// this trait, so tests can substitute an in-memory fake.
pub trait RemoteStore {
    /// Make sure the folder at `path` exists. Creating it and finding it
    /// already present are both success.
    fn ensure_folder(&self, path: &str) -> Result<()>;

    /// Whether a resource exists at `path`.
    fn exists(&self, path: &str) -> Result<bool>;

    /// Upload `bytes` to `path`, overwriting any previous content.
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<()>;
}

/// Client for the Yandex.Disk API. Holds the reqwest client, the API
/// base URL and the operator's OAuth token.
pub struct DiskClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Response of the `/upload` endpoint: a short-lived href authorizing
/// one direct byte upload.
#[derive(Deserialize, Debug)]
struct UploadHrefResponse {
    href: String,
}

impl DiskClient {
    pub fn new(token: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(DiskClient {
            client,
            base_url: DISK_API_BASE.to_string(),
            token: token.to_string(),
        })
    }

    /// Authorization header sent on every Disk API call. The token goes
    /// out verbatim; Yandex expects the `OAuth` scheme, not `Bearer`.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let val = format!("OAuth {}", self.token);
        let value = HeaderValue::from_str(&val).context("Invalid characters in OAuth token")?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Ask the Disk API for a one-time upload href for `path`.
    fn upload_href(&self, path: &str) -> Result<String> {
        let url = format!("{}/upload", &self.base_url);
        let res = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .query(&[("path", path), ("overwrite", "true")])
            .send()
            .context("Failed to request upload href")?;
        if !res.status().is_success() {
            anyhow::bail!("Upload href request failed: {}", res.status());
        }
        let resp: UploadHrefResponse = res.json().context("Parsing upload href json")?;
        Ok(resp.href)
    }
}

impl RemoteStore for DiskClient {
    fn ensure_folder(&self, path: &str) -> Result<()> {
        let res = self
            .client
            .put(&self.base_url)
            .headers(self.auth_headers()?)
            .query(&[("path", path)])
            .send()
            .context("Failed to send folder creation request")?;
        match res.status() {
            StatusCode::CREATED | StatusCode::CONFLICT => Ok(()),
            status => anyhow::bail!("Folder creation failed: {}", status),
        }
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let res = self
            .client
            .get(&self.base_url)
            .headers(self.auth_headers()?)
            .query(&[("path", path)])
            .send()
            .context("Failed to send existence check")?;
        Ok(res.status() == StatusCode::OK)
    }

    fn upload(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let href = self.upload_href(path)?;
        // The href already encodes the authorization; no headers here.
        let res = self
            .client
            .put(&href)
            .body(bytes.to_vec())
            .send()
            .context("Failed to transfer image bytes")?;
        match res.status() {
            StatusCode::CREATED | StatusCode::ACCEPTED => Ok(()),
            status => anyhow::bail!("Byte transfer failed: {}", status),
        }
    }
}
