use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, multipart::Form};

use crate::{
    config::Api,
    engines::ImageSearchEngine,
    error::{Result, SearchError},
    files::ImageUpload,
    models::{RawHit, SearchResponse},
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the marketplace backend's search-by-image endpoint
#[derive(Clone, Debug)]
pub struct HealthLink {
    client: Client,
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
}

impl HealthLink {
    pub fn new(api: &Api) -> Result<Self> {
        let base_url = api
            .base_url
            .as_deref()
            .ok_or_else(|| SearchError::Config("api.base_url is not set".to_string()))?;
        let search_path = api.search_path.as_deref().unwrap_or_default();

        Ok(Self {
            client: Client::new(),
            endpoint: join_url(base_url, search_path),
            token: api.token.clone(),
            timeout: Duration::from_secs(api.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        base_url.to_string()
    } else {
        format!("{base_url}/{path}")
    }
}

#[async_trait]
impl ImageSearchEngine for HealthLink {
    fn name(&self) -> &'static str {
        "healthlink"
    }

    async fn search(&self, upload: &ImageUpload) -> Result<Vec<RawHit>> {
        log::info!(
            "Searching {} for {} ({} bytes)",
            self.endpoint,
            upload.file_name,
            upload.bytes.len()
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .multipart(Form::new().part("image", upload.to_part()?))
            .timeout(self.timeout);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|err| {
            log::error!("Image search request failed: {}", err);
            SearchError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Image search returned {}: {}", status, body);
            return Err(SearchError::Status { status, body });
        }

        let body = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body).map_err(|err| {
            log::error!("Failed to decode image search response: {}", err);
            SearchError::from(err)
        })?;

        let hits = parsed.into_hits();
        log::info!("{} returned {} hits", self.name(), hits.len());

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:5000/", "/api/search"),
            "http://localhost:5000/api/search"
        );
        assert_eq!(
            join_url("http://localhost:5000", "api/search"),
            "http://localhost:5000/api/search"
        );
        assert_eq!(join_url("http://localhost:5000/", ""), "http://localhost:5000");
    }

    #[test]
    fn test_requires_base_url() {
        let result = HealthLink::new(&Api::default());
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[test]
    fn test_endpoint_from_config() {
        let api = Api {
            base_url: Some("https://healthlink.example".to_string()),
            search_path: Some("/api/products/search/image".to_string()),
            ..Default::default()
        };
        let engine = HealthLink::new(&api).unwrap();
        assert_eq!(
            engine.endpoint(),
            "https://healthlink.example/api/products/search/image"
        );
        assert_eq!(engine.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
