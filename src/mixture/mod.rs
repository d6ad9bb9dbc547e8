// Unigram Mixture model: initialization, EM steps, fit loop and inference.
//
// Step functions are free functions over `TrainingState` values; the trainer
// sequences them. See `trainer::UnigramMixture` for the entry point.

pub mod estep;
pub mod likelihood;
pub mod model;
pub mod mstep;
pub mod progress;
pub mod state;
pub mod trainer;

pub use estep::e_step;
pub use likelihood::{log_likelihood, log_posterior, log_prior};
pub use model::{FitOutcome, ModelSummary, TrainedModel};
pub use mstep::m_step;
pub use progress::{FitSummary, IterationReport, ProgressObserver, RecordingObserver, TracingObserver};
pub use state::TrainingState;
pub use trainer::{TrainerPhase, UnigramMixture};
