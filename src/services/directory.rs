use crate::config::DirectorySettings;
use crate::models::CandidateProfile;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the profile directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Profile directory client
///
/// The candidate store lives behind the platform's document API; this
/// client covers the two calls the pipeline needs: listing the candidate
/// set and fetching a single profile.
pub struct DirectoryClient {
    base_url: String,
    api_key: String,
    project_id: String,
    collection: String,
    client: Client,
}

impl DirectoryClient {
    /// Create a new directory client from configuration
    pub fn new(settings: DirectorySettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: settings.endpoint,
            api_key: settings.api_key,
            project_id: settings.project_id,
            collection: settings.profiles_collection,
            client,
        }
    }

    /// List candidate profiles, preserving the directory's ordering
    ///
    /// Documents that fail to decode are skipped rather than failing the
    /// whole listing.
    pub async fn list_candidates(&self, limit: usize) -> Result<Vec<CandidateProfile>, DirectoryError> {
        let queries = vec![format!("limit({})", limit)];
        let queries_json = serde_json::to_string(&queries)
            .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))?;
        let encoded_queries = urlencoding::encode(&queries_json);

        let url = format!(
            "{}/collections/{}/documents?query={}",
            self.base_url.trim_end_matches('/'),
            self.collection,
            encoded_queries
        );

        tracing::debug!("Listing candidates from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .header("X-Project-Id", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DirectoryError::ApiError(format!(
                "Failed to list candidates: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing documents array".into()))?;

        let profiles: Vec<CandidateProfile> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                serde_json::from_value(data.clone()).ok()
            })
            .collect();

        tracing::debug!("Listed {} candidates (total: {})", profiles.len(), total);

        Ok(profiles)
    }

    /// Get a single profile by candidate ID
    pub async fn get_profile(&self, id: &str) -> Result<CandidateProfile, DirectoryError> {
        let query_json = format!(r#"["id={}"]"#, id);
        let encoded_query = urlencoding::encode(&query_json);

        let url = format!(
            "{}/collections/{}/documents?query={}",
            self.base_url.trim_end_matches('/'),
            self.collection,
            encoded_query
        );

        tracing::debug!("Fetching profile: {}", id);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .header("X-Project-Id", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch profile {}: {} - {}", id, status, body);
            return Err(DirectoryError::ApiError(format!(
                "Failed to fetch profile: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing documents array".into()))?;

        let doc = documents
            .first()
            .ok_or_else(|| DirectoryError::NotFound(format!("Profile not found: {}", id)))?;

        let data = doc.get("data").unwrap_or(doc);

        serde_json::from_value(data.clone())
            .map_err(|e| DirectoryError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_client_creation() {
        let client = DirectoryClient::new(DirectorySettings {
            endpoint: "https://directory.test/v1".to_string(),
            api_key: "test_key".to_string(),
            project_id: "test_project".to_string(),
            profiles_collection: "profiles".to_string(),
            timeout_secs: 15,
        });

        assert_eq!(client.base_url, "https://directory.test/v1");
        assert_eq!(client.collection, "profiles");
    }
}
