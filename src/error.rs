// Error types for corpus loading, training and inference.
//
// Every failure is unrecoverable for the current call and propagates straight
// back to the caller. Nothing is retried, and a failed fit never replaces a
// previously trained model.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the mixture library.
#[derive(Error, Debug)]
pub enum MixtureError {
    /// Training data missing or unusable (no path and no documents, empty
    /// corpus, or `fit` called before any data was set).
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model not fitted yet: call fit() before infer()")]
    ModelNotFitted,

    /// None of the words passed to `infer` appear in the training vocabulary.
    #[error("No input word found in the training vocabulary")]
    UnknownVocabulary,

    /// A document's component weights normalised to zero or NaN.
    #[error("Numeric degeneracy: responsibilities for document {document} cannot be normalised")]
    NumericDegeneracy { document: usize },

    #[error("Invalid hyperparameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to read corpus file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for mixture operations
pub type Result<T> = std::result::Result<T, MixtureError>;
