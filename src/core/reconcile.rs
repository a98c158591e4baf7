use crate::models::CandidateProfile;
use std::collections::HashMap;

/// Reorder a candidate set against a ranked list of matched IDs
///
/// Matched candidates come first, ordered by their ID's position in
/// `matches`; every remaining candidate follows in its original relative
/// order. The output is always a permutation of the input: partial model
/// coverage never drops a candidate, and unknown IDs in `matches` are
/// ignored.
pub fn reconcile(candidates: Vec<CandidateProfile>, matches: &[String]) -> Vec<CandidateProfile> {
    if matches.is_empty() {
        return candidates;
    }

    let rank: HashMap<&str, usize> = matches
        .iter()
        .enumerate()
        .map(|(position, id)| (id.as_str(), position))
        .collect();

    let mut matched: Vec<(usize, CandidateProfile)> = Vec::new();
    let mut remainder: Vec<CandidateProfile> = Vec::new();

    for candidate in candidates {
        match rank.get(candidate.id.as_str()) {
            Some(&position) => matched.push((position, candidate)),
            None => remainder.push(candidate),
        }
    }

    matched.sort_by_key(|(position, _)| *position);

    let mut ordered: Vec<CandidateProfile> =
        matched.into_iter().map(|(_, candidate)| candidate).collect();
    ordered.extend(remainder);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn ids(candidates: &[CandidateProfile]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_matched_first_then_remainder_in_original_order() {
        let candidates = vec![candidate("a"), candidate("b"), candidate("c"), candidate("d")];
        let matches = vec!["b".to_string(), "d".to_string()];

        let ordered = reconcile(candidates, &matches);
        assert_eq!(ids(&ordered), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_output_is_permutation_of_input() {
        let candidates = vec![candidate("a"), candidate("b"), candidate("c")];
        let matches = vec!["c".to_string()];

        let ordered = reconcile(candidates, &matches);
        assert_eq!(ordered.len(), 3);
        let mut sorted = ids(&ordered);
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_match_ids_are_ignored() {
        let candidates = vec![candidate("a"), candidate("b")];
        let matches = vec!["z".to_string(), "b".to_string()];

        let ordered = reconcile(candidates, &matches);
        assert_eq!(ids(&ordered), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_matches_is_identity() {
        let candidates = vec![candidate("a"), candidate("b")];
        let ordered = reconcile(candidates.clone(), &[]);
        assert_eq!(ids(&ordered), ids(&candidates));
    }

    #[test]
    fn test_full_coverage_follows_match_order() {
        let candidates = vec![candidate("a"), candidate("b"), candidate("c")];
        let matches = vec!["c".to_string(), "a".to_string(), "b".to_string()];

        let ordered = reconcile(candidates, &matches);
        assert_eq!(ids(&ordered), vec!["c", "a", "b"]);
    }
}
