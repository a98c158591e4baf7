// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{project_candidates, CandidateProfile, ContextEntry, SearchState};
pub use requests::SearchRequest;
pub use responses::{ErrorResponse, HealthResponse, SearchResponse};
