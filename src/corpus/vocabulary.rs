// Word <-> id dictionary for the training corpus.
//
// Ids are dense in [0, V) and handed out in first-occurrence order over the
// flattened token stream, so the same corpus always yields the same ids.

use std::collections::HashMap;

/// Bijective mapping between words and dense integer ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    word_to_id: HashMap<String, usize>,
    id_to_word: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary covering exactly the distinct words in `documents`.
    pub fn from_documents(documents: &[Vec<String>]) -> Self {
        let mut vocab = Self::default();
        for word in documents.iter().flatten() {
            vocab.insert(word);
        }
        vocab
    }

    /// Return the id for `word`, assigning the next free id if it is new.
    fn insert(&mut self, word: &str) -> usize {
        if let Some(&id) = self.word_to_id.get(word) {
            return id;
        }
        let id = self.id_to_word.len();
        self.word_to_id.insert(word.to_string(), id);
        self.id_to_word.push(word.to_string());
        id
    }

    pub fn id(&self, word: &str) -> Option<usize> {
        self.word_to_id.get(word).copied()
    }

    pub fn word(&self, id: usize) -> Option<&str> {
        self.id_to_word.get(id).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_to_id.contains_key(word)
    }

    /// Number of distinct words (V).
    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_word.is_empty()
    }

    /// Iterate `(id, word)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.id_to_word
            .iter()
            .enumerate()
            .map(|(id, word)| (id, word.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|w| w.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_first_occurrence_ids() {
        let vocab = Vocabulary::from_documents(&docs(&[&["b", "a", "b"], &["c", "a"]]));
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.id("b"), Some(0));
        assert_eq!(vocab.id("a"), Some(1));
        assert_eq!(vocab.id("c"), Some(2));
        assert_eq!(vocab.word(2), Some("c"));
    }

    #[test]
    fn test_round_trip_is_bijective() {
        let vocab = Vocabulary::from_documents(&docs(&[&["x", "y"], &["z", "x", "w"]]));
        for (id, word) in vocab.iter() {
            assert_eq!(vocab.id(word), Some(id));
        }
        assert_eq!(vocab.word(vocab.len()), None);
    }

    #[test]
    fn test_unknown_word() {
        let vocab = Vocabulary::from_documents(&docs(&[&["a"]]));
        assert!(!vocab.contains("zzz"));
        assert_eq!(vocab.id("zzz"), None);
    }

    #[test]
    fn test_empty_documents() {
        let vocab = Vocabulary::from_documents(&docs(&[&[], &[]]));
        assert!(vocab.is_empty());
    }
}
