//! Client-side search orchestration
//!
//! The dispatcher turns a user-entered query into a final, ordered candidate
//! list. It owns the candidate set, invokes the Matching Service, reconciles
//! the returned ranking, and never leaves the caller without a result: every
//! failure path degrades to the unranked candidate list plus a notification.

use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::core::reconcile;
use crate::models::{
    project_candidates, CandidateProfile, SearchRequest, SearchResponse, SearchState,
};
use crate::services::directory::{DirectoryClient, DirectoryError};
use crate::services::{Notifier, Severity};

/// Errors crossing the dispatcher/service transport
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Service returned error: {0}")]
    ServiceError(String),
}

/// Transport seam between the dispatcher and the Matching Service
pub trait MatchingApi: Send + Sync {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<SearchResponse, ApiError>> + Send;
}

/// Candidate store seam (`list candidates`)
pub trait CandidateSource: Send + Sync {
    fn list_candidates(
        &self,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<CandidateProfile>, DirectoryError>> + Send;
}

impl CandidateSource for DirectoryClient {
    async fn list_candidates(
        &self,
        limit: usize,
    ) -> Result<Vec<CandidateProfile>, DirectoryError> {
        DirectoryClient::list_candidates(self, limit).await
    }
}

/// HTTP implementation of [`MatchingApi`]
pub struct MatchingServiceClient {
    base_url: String,
    client: Client,
}

impl MatchingServiceClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

impl MatchingApi for MatchingServiceClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        let url = format!(
            "{}/api/v1/search",
            self.base_url.trim_end_matches('/')
        );

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::ServiceError(format!(
                "Search request failed: {}",
                response.status()
            )));
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}

/// How a search concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Empty or whitespace-only query: no network call was made
    Unfiltered,
    /// The service ranked at least one candidate
    Enhanced,
    /// The service answered but matched nothing; distinct from an empty
    /// candidate set
    NoMatches,
    /// The service was unreachable or answered with an error; the unranked
    /// list was returned instead
    Fallback,
}

/// Result of one dispatcher search: always a permutation of the candidate set
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub profiles: Vec<CandidateProfile>,
    pub status: SearchStatus,
    pub explanation: Option<String>,
}

struct DispatcherState {
    state: SearchState,
    explanation: Option<String>,
    candidates: Vec<CandidateProfile>,
}

/// Client-side Query Dispatcher
///
/// Only one search is logically active at a time. A newer invocation
/// supersedes an in-flight one: each search takes a generation ticket and a
/// result landing after a newer ticket was issued keeps its return value but
/// is barred from updating the recorded state and explanation.
pub struct SearchDispatcher<A: MatchingApi, N: Notifier> {
    api: A,
    notifier: N,
    inner: Mutex<DispatcherState>,
    generation: AtomicU64,
}

impl<A: MatchingApi, N: Notifier> SearchDispatcher<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            inner: Mutex::new(DispatcherState {
                state: SearchState::Idle,
                explanation: None,
                candidates: Vec::new(),
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Current lifecycle state
    pub async fn state(&self) -> SearchState {
        self.inner.lock().await.state
    }

    /// Explanation recorded by the last completed search, if any
    pub async fn explanation(&self) -> Option<String> {
        self.inner.lock().await.explanation.clone()
    }

    /// Snapshot of the owned candidate set
    pub async fn candidates(&self) -> Vec<CandidateProfile> {
        self.inner.lock().await.candidates.clone()
    }

    /// Replace the owned candidate set
    pub async fn set_candidates(&self, candidates: Vec<CandidateProfile>) {
        let mut inner = self.inner.lock().await;
        inner.candidates = candidates;
        if inner.state == SearchState::Idle || inner.state == SearchState::LoadingCandidates {
            inner.state = SearchState::Ready;
        }
    }

    /// Refresh the candidate set from the profile directory
    ///
    /// On failure the previous set is kept, the caller is notified, and the
    /// dispatcher moves to `Failed`.
    pub async fn refresh_candidates<S: CandidateSource>(
        &self,
        source: &S,
        limit: usize,
    ) -> Vec<CandidateProfile> {
        {
            let mut inner = self.inner.lock().await;
            inner.state = SearchState::LoadingCandidates;
        }

        match source.list_candidates(limit).await {
            Ok(candidates) => {
                let mut inner = self.inner.lock().await;
                inner.candidates = candidates;
                inner.state = SearchState::Ready;
                inner.candidates.clone()
            }
            Err(e) => {
                tracing::error!("Failed to load candidates: {}", e);
                self.notifier.notify(
                    "Profiles",
                    "Could not refresh the candidate list.",
                    Severity::Error,
                );
                let mut inner = self.inner.lock().await;
                inner.state = SearchState::Failed;
                inner.candidates.clone()
            }
        }
    }

    /// Run one search against the owned candidate set
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let candidates = self.candidates().await;
        self.search_within(query, candidates).await
    }

    /// Run one search against an explicit candidate set
    pub async fn search_within(
        &self,
        query: &str,
        candidates: Vec<CandidateProfile>,
    ) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome {
                profiles: candidates,
                status: SearchStatus::Unfiltered,
                explanation: None,
            };
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            // Stale explanations must never show against new results
            let mut inner = self.inner.lock().await;
            inner.state = SearchState::Searching;
            inner.explanation = None;
        }

        let request = SearchRequest::new(query, project_candidates(&candidates));
        let result = self.api.search(&request).await;
        let latest = self.generation.load(Ordering::SeqCst) == ticket;

        match result {
            Ok(response) if !response.is_failure() => {
                let explanation = if response.explanation.is_empty() {
                    None
                } else {
                    Some(response.explanation.clone())
                };

                if latest {
                    let mut inner = self.inner.lock().await;
                    inner.state = SearchState::Ready;
                    inner.explanation = explanation.clone();
                }

                if response.matches.is_empty() {
                    SearchOutcome {
                        profiles: candidates,
                        status: SearchStatus::NoMatches,
                        explanation,
                    }
                } else {
                    SearchOutcome {
                        profiles: reconcile(candidates, &response.matches),
                        status: SearchStatus::Enhanced,
                        explanation,
                    }
                }
            }
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| "Service reported an error".to_string());
                self.fall_back(latest, candidates, message).await
            }
            Err(e) => self.fall_back(latest, candidates, e.to_string()).await,
        }
    }

    /// Failure branch: unranked list, notification, never an error
    async fn fall_back(
        &self,
        latest: bool,
        candidates: Vec<CandidateProfile>,
        message: String,
    ) -> SearchOutcome {
        tracing::error!("Search enhancement failed: {}", message);

        if latest {
            self.notifier.notify(
                "Search",
                "Search enhancement failed. Falling back to basic search.",
                Severity::Warning,
            );
            let mut inner = self.inner.lock().await;
            inner.state = SearchState::Failed;
        }

        SearchOutcome {
            profiles: candidates,
            status: SearchStatus::Fallback,
            explanation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct StubApi {
        response: Result<SearchResponse, String>,
    }

    impl MatchingApi for StubApi {
        async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse, ApiError> {
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(message) => Err(ApiError::ServiceError(message.clone())),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: StdMutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _title: &str, message: &str, _severity: Severity) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn candidate(id: &str) -> CandidateProfile {
        CandidateProfile {
            id: id.to_string(),
            name: format!("Candidate {}", id),
            role: "Engineer".to_string(),
            location: "Remote".to_string(),
            skills: vec![],
            experience: "3 years".to_string(),
            available: true,
            hourly_rate: None,
            image_url: None,
        }
    }

    fn candidate_set() -> Vec<CandidateProfile> {
        vec![candidate("a"), candidate("b"), candidate("c"), candidate("d")]
    }

    fn ids(profiles: &[CandidateProfile]) -> Vec<&str> {
        profiles.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let dispatcher = SearchDispatcher::new(
            StubApi {
                response: Err("must not be called".to_string()),
            },
            RecordingNotifier::default(),
        );

        let outcome = dispatcher.search_within("   ", candidate_set()).await;

        assert_eq!(outcome.status, SearchStatus::Unfiltered);
        assert_eq!(ids(&outcome.profiles), vec!["a", "b", "c", "d"]);
        // No failure notification: the API was never invoked
        assert_eq!(dispatcher.state().await, SearchState::Idle);
    }

    #[tokio::test]
    async fn test_enhanced_search_reconciles() {
        let dispatcher = SearchDispatcher::new(
            StubApi {
                response: Ok(SearchResponse::ranked(
                    vec!["b".to_string(), "d".to_string()],
                    "skills line up".to_string(),
                )),
            },
            RecordingNotifier::default(),
        );

        let outcome = dispatcher.search_within("rust", candidate_set()).await;

        assert_eq!(outcome.status, SearchStatus::Enhanced);
        assert_eq!(ids(&outcome.profiles), vec!["b", "d", "a", "c"]);
        assert_eq!(outcome.explanation.as_deref(), Some("skills line up"));
        assert_eq!(dispatcher.state().await, SearchState::Ready);
        assert_eq!(
            dispatcher.explanation().await.as_deref(),
            Some("skills line up")
        );
    }

    #[tokio::test]
    async fn test_empty_matches_is_no_enhancement() {
        let dispatcher = SearchDispatcher::new(
            StubApi {
                response: Ok(SearchResponse::ranked(vec![], "nothing fits".to_string())),
            },
            RecordingNotifier::default(),
        );

        let outcome = dispatcher.search_within("cobol", candidate_set()).await;

        assert_eq!(outcome.status, SearchStatus::NoMatches);
        assert_eq!(ids(&outcome.profiles), vec!["a", "b", "c", "d"]);
        assert_eq!(dispatcher.state().await, SearchState::Ready);
    }

    #[tokio::test]
    async fn test_failure_falls_back_and_notifies() {
        let notifier = RecordingNotifier::default();
        let dispatcher = SearchDispatcher::new(
            StubApi {
                response: Err("connection refused".to_string()),
            },
            notifier,
        );

        let outcome = dispatcher.search_within("rust", candidate_set()).await;

        assert_eq!(outcome.status, SearchStatus::Fallback);
        assert_eq!(ids(&outcome.profiles), vec!["a", "b", "c", "d"]);
        assert_eq!(dispatcher.state().await, SearchState::Failed);
        assert_eq!(
            dispatcher.notifier.messages.lock().unwrap().as_slice(),
            &["Search enhancement failed. Falling back to basic search."]
        );
    }

    #[tokio::test]
    async fn test_in_band_error_falls_back() {
        let dispatcher = SearchDispatcher::new(
            StubApi {
                response: Ok(SearchResponse::failed(
                    "Failed to process search results",
                    "upstream 502",
                )),
            },
            RecordingNotifier::default(),
        );

        let outcome = dispatcher.search_within("rust", candidate_set()).await;

        assert_eq!(outcome.status, SearchStatus::Fallback);
        assert_eq!(ids(&outcome.profiles), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_explanation_cleared_on_new_search() {
        let dispatcher = SearchDispatcher::new(
            StubApi {
                response: Ok(SearchResponse::ranked(vec![], String::new())),
            },
            RecordingNotifier::default(),
        );

        {
            let mut inner = dispatcher.inner.lock().await;
            inner.explanation = Some("from a previous search".to_string());
        }

        let outcome = dispatcher.search_within("react", candidate_set()).await;

        assert_eq!(outcome.status, SearchStatus::NoMatches);
        assert_eq!(dispatcher.explanation().await, None);
    }

    /// Stub whose calls each pop a scripted (delay, explanation) step
    struct SequencedApi {
        steps: StdMutex<std::collections::VecDeque<(u64, String)>>,
    }

    impl MatchingApi for SequencedApi {
        async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse, ApiError> {
            let (delay_ms, explanation) = self
                .steps
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted step left");
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            Ok(SearchResponse::ranked(vec!["a".to_string()], explanation))
        }
    }

    #[tokio::test]
    async fn test_superseded_search_does_not_write_state() {
        let steps = std::collections::VecDeque::from(vec![
            (50, "stale reasoning".to_string()),
            (0, "fresh reasoning".to_string()),
        ]);
        let dispatcher = SearchDispatcher::new(
            SequencedApi {
                steps: StdMutex::new(steps),
            },
            RecordingNotifier::default(),
        );

        // The slow first search is superseded by the fast second one
        let (old, new) = tokio::join!(
            dispatcher.search_within("old query", candidate_set()),
            dispatcher.search_within("new query", candidate_set()),
        );

        // Both calls still return a result for their callers
        assert_eq!(old.status, SearchStatus::Enhanced);
        assert_eq!(new.status, SearchStatus::Enhanced);

        // Only the newest ticket recorded its explanation and state
        assert_eq!(
            dispatcher.explanation().await.as_deref(),
            Some("fresh reasoning")
        );
        assert_eq!(dispatcher.state().await, SearchState::Ready);
    }
}
