//! HTTP client for the STCH REST backend

use crate::config::ServiceConfig;
use crate::record::{InspectionImage, InspectionRecord};
use crate::service::{parse_images_payload, parse_record_payload, InspectionRecordService};
use crate::{Result, ServiceError};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

const RESOURCE: &str = "revista-vehicular";

/// [`InspectionRecordService`] backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpInspectionService {
    http_client: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpInspectionService {
    /// Create a client from configuration
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or HTTP client creation fails.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ServiceError::Config(format!("invalid base URL {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Config(format!(
                "base URL {} cannot carry a path",
                config.base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            auth_token: config.auth_token,
        })
    }

    /// URL of `{base}/revista-vehicular/{id}[/{suffix}]`
    fn endpoint(&self, id: &str, suffix: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ServiceError::Config("base URL cannot carry a path".to_string()))?;
            segments.pop_if_empty().push(RESOURCE).push(id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    /// GET a URL and return its body, or `None` for a non-success status
    async fn fetch_body(&self, url: Url) -> Result<Option<String>> {
        let mut request = self.http_client.get(url.clone());
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "backend returned a non-success status");
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl InspectionRecordService for HttpInspectionService {
    async fn get_record(&self, id: &str) -> Result<Option<InspectionRecord>> {
        let url = self.endpoint(id, None)?;
        debug!(%url, "fetching inspection record");

        match self.fetch_body(url).await? {
            Some(body) => parse_record_payload(&body),
            None => Ok(None),
        }
    }

    async fn get_images(&self, id: &str) -> Result<Vec<InspectionImage>> {
        let url = self.endpoint(id, Some("imagenes"))?;
        debug!(%url, "fetching inspection images");

        match self.fetch_body(url).await? {
            Some(body) => parse_images_payload(&body),
            None => Ok(Vec::new()),
        }
    }
}
