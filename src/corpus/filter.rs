// Token normalisation applied while loading a corpus.
//
// The default filter is the identity: tokens reach the vocabulary exactly as
// they appear in the input. Lowercasing and English stop-word removal are
// opt-in.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Which normalisations to apply to every token before counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenFilter {
    /// Lowercase every token
    pub lowercase: bool,
    /// Drop English stop words (checked after lowercasing)
    pub stop_words: bool,
}

impl TokenFilter {
    pub fn is_identity(&self) -> bool {
        !self.lowercase && !self.stop_words
    }

    /// Apply the filter to every document. Documents are never removed, only
    /// tokens, so document indices stay stable.
    pub fn apply(&self, documents: Vec<Vec<String>>) -> Vec<Vec<String>> {
        if self.is_identity() {
            return documents;
        }

        let stop_set = self.stop_set();
        documents
            .into_iter()
            .map(|doc| self.filter_tokens(doc, &stop_set))
            .collect()
    }

    /// Apply the filter to a single word list, e.g. an inference query, so it
    /// is matched against the vocabulary the same way training tokens were.
    pub fn normalize<S: AsRef<str>>(&self, words: &[S]) -> Vec<String> {
        let words = words.iter().map(|w| w.as_ref().to_string());
        if self.is_identity() {
            return words.collect();
        }
        self.filter_tokens(words, &self.stop_set())
    }

    fn stop_set(&self) -> HashSet<String> {
        if self.stop_words {
            let words: Vec<String> = get(LANGUAGE::English);
            words.into_iter().collect()
        } else {
            HashSet::new()
        }
    }

    fn filter_tokens(
        &self,
        tokens: impl IntoIterator<Item = String>,
        stop_set: &HashSet<String>,
    ) -> Vec<String> {
        tokens
            .into_iter()
            .map(|token| {
                if self.lowercase {
                    token.to_lowercase()
                } else {
                    token
                }
            })
            .filter(|token| !stop_set.contains(token))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_identity_keeps_tokens() {
        let docs = vec![doc(&["The", "Cat"])];
        let out = TokenFilter::default().apply(docs.clone());
        assert_eq!(out, docs);
    }

    #[test]
    fn test_lowercase() {
        let filter = TokenFilter {
            lowercase: true,
            stop_words: false,
        };
        let out = filter.apply(vec![doc(&["The", "Cat"])]);
        assert_eq!(out[0], vec!["the", "cat"]);
    }

    #[test]
    fn test_stop_words_removed_documents_kept() {
        let filter = TokenFilter {
            lowercase: true,
            stop_words: true,
        };
        let out = filter.apply(vec![doc(&["The", "market", "and"]), doc(&["the"])]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], vec!["market"]);
        assert!(out[1].is_empty());
    }

    #[test]
    fn test_normalize_matches_apply() {
        let filter = TokenFilter {
            lowercase: true,
            stop_words: true,
        };
        let query = filter.normalize(&["The", "Market", "MARKET"]);
        assert_eq!(query, vec!["market", "market"]);
        assert_eq!(filter.apply(vec![doc(&["The", "Market", "MARKET"])])[0], query);
        assert_eq!(TokenFilter::default().normalize(&["The"]), vec!["The"]);
    }
}
