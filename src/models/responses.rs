use serde::{Deserialize, Serialize};

/// Result of one match-and-rank request
///
/// Always well-formed: `matches` is an array (possibly empty) of candidate
/// IDs in relevance order with duplicates removed, every ID present in the
/// request context. Upstream failures travel in `error` instead of an HTTP
/// failure status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub matches: Vec<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn ranked(matches: Vec<String>, explanation: String) -> Self {
        Self {
            matches,
            explanation,
            error: None,
        }
    }

    /// Empty-safe result for the upstream-failure branch
    pub fn failed(explanation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            matches: Vec::new(),
            explanation: explanation.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_configured: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
