// Training corpus: vocabulary plus document-term counts.
//
// This is the ready-made representation the EM loop consumes. It is built
// once, before training starts, and never changes afterwards.

pub mod filter;
pub mod reader;
pub mod vocabulary;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{MixtureError, Result};
use filter::TokenFilter;
use vocabulary::Vocabulary;

/// Where training documents come from.
#[derive(Debug, Clone)]
pub enum CorpusSource {
    /// Text file, one document per line
    File(PathBuf),
    /// In-memory documents, each an ordered list of tokens
    Documents(Vec<Vec<String>>),
}

impl CorpusSource {
    /// Pick a source from optional inputs. A path wins over documents when
    /// both are supplied; supplying neither is a configuration error.
    pub fn from_options(
        path: Option<&Path>,
        documents: Option<Vec<Vec<String>>>,
    ) -> Result<Self> {
        match (path, documents) {
            (Some(path), _) => Ok(Self::File(path.to_path_buf())),
            (None, Some(documents)) => Ok(Self::Documents(documents)),
            (None, None) => Err(MixtureError::Configuration(
                "either a corpus file path or in-memory documents must be supplied".into(),
            )),
        }
    }

    /// Read (if needed), filter and index the documents.
    pub fn load(self, filter: &TokenFilter) -> Result<Corpus> {
        let documents = match self {
            Self::File(path) => reader::read_documents(&path)?,
            Self::Documents(documents) => documents,
        };
        Corpus::from_documents(&filter.apply(documents))
    }
}

/// D x V word counts, stored per document as sorted `(word id, count)` pairs
/// with non-zero counts only.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTermMatrix {
    rows: Vec<Vec<(usize, u32)>>,
    n_words: usize,
}

impl DocumentTermMatrix {
    /// Count every token of every document against `vocabulary`.
    ///
    /// Tokens missing from the vocabulary are ignored; when the vocabulary was
    /// built from the same documents there are none.
    pub fn build(documents: &[Vec<String>], vocabulary: &Vocabulary) -> Self {
        let rows = documents
            .iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for word in doc {
                    if let Some(id) = vocabulary.id(word) {
                        *counts.entry(id).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();

        Self {
            rows,
            n_words: vocabulary.len(),
        }
    }

    /// Number of documents (D).
    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (V).
    pub fn n_words(&self) -> usize {
        self.n_words
    }

    /// Non-zero `(word id, count)` cells of document `d`, sorted by word id.
    pub fn row(&self, d: usize) -> &[(usize, u32)] {
        &self.rows[d]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(usize, u32)]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Count of word `w` in document `d` (0 when absent).
    pub fn count(&self, d: usize, w: usize) -> u32 {
        self.rows[d]
            .binary_search_by_key(&w, |&(id, _)| id)
            .map(|idx| self.rows[d][idx].1)
            .unwrap_or(0)
    }

    /// Token count of document `d` (the row sum).
    pub fn document_length(&self, d: usize) -> u32 {
        self.rows[d].iter().map(|&(_, c)| c).sum()
    }
}

/// Vocabulary and counts for a training collection.
#[derive(Debug, Clone)]
pub struct Corpus {
    vocabulary: Vocabulary,
    matrix: DocumentTermMatrix,
}

impl Corpus {
    /// Index a collection of tokenised documents.
    ///
    /// Requires at least one document. Individual documents may be empty.
    pub fn from_documents(documents: &[Vec<String>]) -> Result<Self> {
        if documents.is_empty() {
            return Err(MixtureError::Configuration(
                "corpus contains no documents".into(),
            ));
        }

        let vocabulary = Vocabulary::from_documents(documents);
        let matrix = DocumentTermMatrix::build(documents, &vocabulary);

        info!(
            documents = matrix.n_documents(),
            vocabulary = vocabulary.len(),
            tokens = matrix.rows().flatten().map(|&(_, c)| c as u64).sum::<u64>(),
            "Built corpus"
        );

        Ok(Self { vocabulary, matrix })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn matrix(&self) -> &DocumentTermMatrix {
        &self.matrix
    }

    pub fn n_documents(&self) -> usize {
        self.matrix.n_documents()
    }

    pub fn n_words(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn document_lengths(&self) -> Vec<u32> {
        (0..self.n_documents())
            .map(|d| self.matrix.document_length(d))
            .collect()
    }

    pub fn total_tokens(&self) -> u64 {
        self.document_lengths().iter().map(|&n| n as u64).sum()
    }
}
