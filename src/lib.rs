// unimix: Unigram Mixture document clustering fitted with EM.
//
// This is the library root. `corpus` turns raw documents into counts,
// `mixture` fits and queries the model, `output` renders results for the CLI.

pub mod config;
pub mod corpus;
pub mod error;
pub mod mixture;
pub mod output;

pub use config::MixtureConfig;
pub use corpus::filter::TokenFilter;
pub use corpus::Corpus;
pub use error::{MixtureError, Result};
pub use mixture::{FitOutcome, TrainedModel, TrainerPhase, UnigramMixture};
