// Image-source module: a small blocking HTTP client that talks to the
// public dog.ceo API. It resolves sub-breeds, picks random image URLs
// and downloads image bytes. Calls are synchronous; failures surface as
// `anyhow` errors and the orchestrator decides how lenient to be.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

const DOG_API_BASE: &str = "https://dog.ceo/api";

/// Source of breed taxonomy and image bytes. The orchestrator only talks
/// to this trait, so tests can substitute an in-memory fake.
pub trait ImageSource {
    /// List the sub-breeds of `breed`. The list may be empty.
    fn sub_breeds(&self, breed: &str) -> Result<Vec<String>>;

    /// URL of one random image for `breed` (or `breed`/`sub_breed`).
    fn random_image_url(&self, breed: &str, sub_breed: Option<&str>) -> Result<String>;

    /// Download the raw bytes behind an image URL.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking client for the dog.ceo API. Holds a reqwest client and the
/// API base URL; no authentication is needed on this side.
pub struct DogApiClient {
    client: Client,
    base_url: String,
}

// Both dog.ceo endpoints wrap their payload in a `message` field: the
// list endpoint carries an array, the random endpoint a URL string.
#[derive(Deserialize, Debug)]
struct BreedListResponse {
    message: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct RandomImageResponse {
    message: String,
}

impl DogApiClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(DogApiClient {
            client,
            base_url: DOG_API_BASE.to_string(),
        })
    }
}

impl ImageSource for DogApiClient {
    fn sub_breeds(&self, breed: &str) -> Result<Vec<String>> {
        let url = format!("{}/breed/{}/list", &self.base_url, breed);
        let res = self
            .client
            .get(&url)
            .send()
            .context("Failed to send sub-breed list request")?;
        if !res.status().is_success() {
            anyhow::bail!("Sub-breed list failed: {}", res.status());
        }
        let resp: BreedListResponse = res.json().context("Parsing sub-breed list json")?;
        Ok(resp.message)
    }

    fn random_image_url(&self, breed: &str, sub_breed: Option<&str>) -> Result<String> {
        let url = match sub_breed {
            Some(sub) => format!("{}/breed/{}/{}/images/random", &self.base_url, breed, sub),
            None => format!("{}/breed/{}/images/random", &self.base_url, breed),
        };
        let res = self
            .client
            .get(&url)
            .send()
            .context("Failed to send random image request")?;
        if !res.status().is_success() {
            anyhow::bail!("Random image failed: {}", res.status());
        }
        let resp: RandomImageResponse = res.json().context("Parsing random image json")?;
        Ok(resp.message)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let res = self
            .client
            .get(url)
            .send()
            .context("Failed to download image")?;
        if !res.status().is_success() {
            anyhow::bail!("Image download failed: {}", res.status());
        }
        let bytes = res.bytes().context("Reading image body")?;
        Ok(bytes.to_vec())
    }
}
