//! "did you mean" suggestions for selectors that match nothing

use strsim::levenshtein;

use crate::dom::memory::MemoryDocument;

/// maximum edit distance for a suggestion
const FUZZY_THRESHOLD: usize = 2;

/// `#id` and `[name=..]` selectors of the form's controls close to `query`,
/// best match first
pub fn selectors(document: &MemoryDocument, query: &str) -> Vec<String> {
    let mut candidates: Vec<String> = document
        .snapshot()
        .into_iter()
        .flat_map(|element| {
            let id = element.id.map(|id| format!("#{}", id));
            let name = element.name.map(|name| format!("[name={}]", name));
            id.into_iter().chain(name)
        })
        .collect();
    candidates.sort();
    candidates.dedup();

    let query = query.to_lowercase();
    let mut matches: Vec<(String, usize)> = candidates
        .into_iter()
        .map(|candidate| {
            let distance = levenshtein(&query, &candidate.to_lowercase());
            (candidate, distance)
        })
        .filter(|(_, distance)| *distance <= FUZZY_THRESHOLD)
        .collect();

    matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    matches.into_iter().map(|(candidate, _)| candidate).collect()
}
