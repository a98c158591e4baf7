use crate::models::ContextEntry;

/// System instruction sent with every ranking request
///
/// Demands strict JSON so the structured parse succeeds on the happy path;
/// the parser still tolerates free-text replies.
pub const SYSTEM_INSTRUCTION: &str = "You are a specialized search assistant for a tech talent platform. \
Your task is to enhance search queries by understanding user intent and context. \
When given a search query and context information about available candidate profiles, \
return an array of relevant profile IDs sorted by relevance, \
along with an explanation of why each profile matches. \
Format your response as a JSON object with 'matches' (array of profile IDs as strings) \
and 'explanation' (text explaining the reasoning). Respond with JSON only.";

/// Build the user message embedding the literal query and the serialized context
pub fn build_user_prompt(query: &str, context: &[ContextEntry]) -> String {
    let serialized = serde_json::to_string(context).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Search query: \"{}\"\nAvailable profiles context: {}",
        query, serialized
    )
}
