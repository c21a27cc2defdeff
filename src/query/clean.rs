use crate::analysis::tokenizer::tokenize;

/// Tokenizes, deduplicates, and lexicographically sorts a raw query string
/// (§4.6). The canonical form is the surviving tokens joined by single
/// spaces — deterministic regardless of term order or repetition in the
/// original query.
pub fn clean(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = tokenize(query).into_iter().map(|t| t.text).collect();
    terms.sort();
    terms.dedup();
    terms
}

pub fn canonical(query: &str) -> String {
    clean(query).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn dedupes_and_sorts() {
        let terms = clean("beta alpha beta Alpha");
        assert_eq!(terms, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn canonical_form_is_space_joined() {
        assert_eq!(canonical("gamma alpha"), "alpha gamma");
    }

    proptest! {
        // Invariant 4 (§8): cleaning is idempotent.
        #[test]
        fn clean_is_idempotent(words in prop::collection::vec("[a-z]{1,8}", 0..15)) {
            let query = words.join(" ");
            let once = canonical(&query);
            let twice = canonical(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
