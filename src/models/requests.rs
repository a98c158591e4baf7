use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::ContextEntry;

/// Request to rank candidates against a free-text query
///
/// `query` is the one mandatory field; `context` may be empty, in which case
/// the model has nothing to rank and the response carries no matches.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
    #[serde(default)]
    pub context: Vec<ContextEntry>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, context: Vec<ContextEntry>) -> Self {
        Self {
            query: query.into(),
            context,
        }
    }
}
