use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;

lazy_static! {
    static ref UUID_REGEX: Regex =
        Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .unwrap();
    static ref NUMERIC_ID_REGEX: Regex = Regex::new(r"\b\d+\b").unwrap();
}

/// Normalized verdict extracted from the model's reply text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelVerdict {
    pub matches: Vec<String>,
    pub explanation: String,
}

/// Wire shape the model is instructed to produce
///
/// `matches` is required: a JSON reply without it does not count as a
/// structured verdict and falls through to pattern extraction. IDs are
/// opaque strings; numeric IDs are coerced to their decimal string form.
#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(deserialize_with = "ids_as_strings")]
    matches: Vec<String>,
    #[serde(default)]
    explanation: String,
}

/// Accept `"1"` and `1` interchangeably inside `matches`
fn ids_as_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdValue {
        Text(String),
        Number(serde_json::Number),
    }

    let values = Vec::<IdValue>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            IdValue::Text(s) => s,
            IdValue::Number(n) => n.to_string(),
        })
        .collect())
}

/// Parse the model's reply into a verdict, never failing
///
/// Strategy, in order:
/// 1. direct JSON parse into `{matches, explanation}`
/// 2. UUID-shaped substrings in the raw text
/// 3. bare numeric substrings in the raw text
///
/// Extracted IDs are deduplicated preserving first-seen order; on the
/// extraction path the full raw text becomes the explanation.
pub fn parse_model_reply(raw: &str) -> ModelVerdict {
    if let Ok(parsed) = serde_json::from_str::<RawVerdict>(raw.trim()) {
        return ModelVerdict {
            matches: dedup_first_seen(parsed.matches),
            explanation: parsed.explanation,
        };
    }

    tracing::debug!("Model reply is not valid JSON, using pattern extraction");

    let mut extracted: Vec<String> = UUID_REGEX
        .find_iter(raw)
        .map(|m| m.as_str().to_string())
        .collect();

    if extracted.is_empty() {
        extracted = NUMERIC_ID_REGEX
            .find_iter(raw)
            .map(|m| m.as_str().to_string())
            .collect();
    }

    ModelVerdict {
        matches: dedup_first_seen(extracted),
        explanation: raw.to_string(),
    }
}

/// Remove duplicates while preserving first-seen order
pub fn dedup_first_seen(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Drop IDs that do not belong to the request context
///
/// Guarantees every returned match corresponds to a candidate the caller
/// actually disclosed, no matter what the model produced.
pub fn retain_known_ids(ids: Vec<String>, known: &HashSet<String>) -> Vec<String> {
    ids.into_iter().filter(|id| known.contains(id)).collect()
}
