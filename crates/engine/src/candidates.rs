use renoscope_reference::{PriceDefinition, PriceLibrary};

/// A repair candidate: one library item, not yet priced or contextualized
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub code: String,
    pub definition: PriceDefinition,
}

/// Expand the full library into a flat candidate list, one per item code,
/// independent of user context. Library maps are ordered, so the output is
/// stable across runs.
pub fn generate_candidates(library: &PriceLibrary) -> Vec<Candidate> {
    library
        .values()
        .flat_map(|items| {
            items.iter().map(|(code, definition)| Candidate {
                code: code.clone(),
                definition: definition.clone(),
            })
        })
        .collect()
}
