use serde::{Deserialize, Serialize};

/// A profile record eligible to be matched against a query
///
/// IDs are opaque strings, unique within one candidate set. The record is
/// immutable for the duration of a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    pub name: String,
    pub role: String,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience: String,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(rename = "hourlyRate", default)]
    pub hourly_rate: Option<f64>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

fn default_true() -> bool { true }

/// The projection of a candidate disclosed to the external model
///
/// Only the fields useful for relevance judgement are sent; image URLs and
/// other presentation data stay local.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: String,
    pub name: String,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub bio: String,
    pub available: bool,
    #[serde(rename = "hourlyRate", default)]
    pub hourly_rate: Option<f64>,
}

impl From<&CandidateProfile> for ContextEntry {
    fn from(profile: &CandidateProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            title: profile.role.clone(),
            location: profile.location.clone(),
            skills: profile.skills.clone(),
            bio: profile.experience.clone(),
            available: profile.available,
            hourly_rate: profile.hourly_rate,
        }
    }
}

/// Project a candidate set into the context sent to the model
pub fn project_candidates(candidates: &[CandidateProfile]) -> Vec<ContextEntry> {
    candidates.iter().map(ContextEntry::from).collect()
}

/// Dispatcher-side search lifecycle
///
/// One explicit state machine instead of separate "has searched",
/// "is loading" and "is searching" booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    LoadingCandidates,
    Searching,
    Ready,
    Failed,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::Idle
    }
}
