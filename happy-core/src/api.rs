//! Backend API client
//!
//! The page only needs one call: post the multipart payload to
//! `<base>/orphanages` and learn whether it was accepted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{HappyError, Result};
use crate::payload::{OrphanagePayload, PartValue, ORPHANAGES_PATH};

/// Anything that can store a new orphanage record
#[async_trait]
pub trait OrphanageApi: Send + Sync {
    /// Post the payload; `Ok` means the API answered with a 2xx status
    async fn create_orphanage(&self, payload: &OrphanagePayload) -> Result<()>;
}

/// `reqwest` implementation posting multipart form data
#[derive(Debug, Clone)]
pub struct HttpOrphanageApi {
    client: Client,
    endpoint: Url,
}

impl HttpOrphanageApi {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client with a request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let endpoint = resource_url(base_url, ORPHANAGES_PATH)?;
        Ok(Self { client, endpoint })
    }

    /// Full URL the payload is posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn build_form(payload: &OrphanagePayload) -> Result<Form> {
        let mut form = Form::new();

        for part in payload.parts() {
            form = match &part.value {
                PartValue::Text { value } => form.text(part.name, value.clone()),
                PartValue::File { file } => {
                    let bytes = tokio::fs::read(&file.path)
                        .await
                        .map_err(|source| HappyError::image_read(&file.path, source))?;
                    debug!(file = %file.file_name, size = bytes.len(), "attaching image");

                    let file_part = Part::bytes(bytes)
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime)?;
                    form.part(part.name, file_part)
                }
            };
        }

        Ok(form)
    }
}

#[async_trait]
impl OrphanageApi for HttpOrphanageApi {
    async fn create_orphanage(&self, payload: &OrphanagePayload) -> Result<()> {
        let form = Self::build_form(payload).await?;

        info!(url = %self.endpoint, "posting orphanage");
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "orphanage rejected by API");
            return Err(HappyError::rejected(status.as_u16(), body));
        }

        info!(%status, "orphanage created");
        Ok(())
    }
}

/// Join a relative resource path onto a base URL, treating the base as a
/// directory even when it lacks a trailing slash
pub fn resource_url(base_url: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)
        .map_err(|e| HappyError::invalid_url(base_url, e.to_string()))?;

    if base.cannot_be_a_base() {
        return Err(HappyError::invalid_url(base_url, "not a hierarchical URL"));
    }

    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }

    base.join(path)
        .map_err(|e| HappyError::invalid_url(base_url, e.to_string()))
}
