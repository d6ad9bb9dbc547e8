// The fit loop: initialize -> (E-step, M-step, likelihood)* -> stop.
//
// `UnigramMixture` owns its corpus and, after a successful fit, the trained
// model. The numeric work lives in the step functions; this module only
// sequences them, tests for convergence and reports progress.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::MixtureConfig;
use crate::corpus::filter::TokenFilter;
use crate::corpus::{Corpus, CorpusSource};
use crate::error::{MixtureError, Result};

use super::estep::e_step;
use super::likelihood::log_likelihood;
use super::model::{FitOutcome, TrainedModel};
use super::mstep::m_step;
use super::progress::{FitSummary, IterationReport, ProgressObserver, TracingObserver};
use super::state::TrainingState;

/// Where the trainer is in its lifecycle.
///
/// `Initialized` and `Iterating` are only held while `fit_with_observer` is
/// running. Once it returns, the phase is `Converged` or `MaxIterReached` on
/// success, or whatever it was before the call on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerPhase {
    /// No trained model (fresh, or training data just changed)
    Uninitialized,
    /// Starting distributions drawn
    Initialized,
    /// Running EM iterations
    Iterating,
    Converged,
    MaxIterReached,
}

impl From<FitOutcome> for TrainerPhase {
    fn from(outcome: FitOutcome) -> Self {
        match outcome {
            FitOutcome::Converged => Self::Converged,
            FitOutcome::MaxIterReached => Self::MaxIterReached,
        }
    }
}

/// Unigram Mixture model fitted with EM.
///
/// ```no_run
/// use unimix::{MixtureConfig, UnigramMixture};
///
/// let mut um = UnigramMixture::new(MixtureConfig::new(2).seed(42))?;
/// let docs = vec![
///     vec!["a".to_string(), "b".to_string(), "a".to_string()],
///     vec!["c".to_string(), "c".to_string(), "b".to_string()],
/// ];
/// um.set_param(None, Some(docs))?;
/// um.fit()?;
/// let probs = um.infer(&["a"])?;
/// assert_eq!(probs.len(), 2);
/// # Ok::<(), unimix::MixtureError>(())
/// ```
#[derive(Debug)]
pub struct UnigramMixture {
    config: MixtureConfig,
    filter: TokenFilter,
    corpus: Option<Corpus>,
    model: Option<TrainedModel>,
    phase: TrainerPhase,
}

impl UnigramMixture {
    /// Create an untrained model. Fails on invalid hyperparameters.
    pub fn new(config: MixtureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            filter: TokenFilter::default(),
            corpus: None,
            model: None,
            phase: TrainerPhase::Uninitialized,
        })
    }

    /// Normalise tokens with `filter` when training data is loaded.
    pub fn with_filter(mut self, filter: TokenFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Load training data from a file path or from in-memory documents.
    ///
    /// The path wins when both are given. Supplying neither is a
    /// `Configuration` error. Loading new data discards any trained model.
    pub fn set_param(
        &mut self,
        path: Option<&Path>,
        documents: Option<Vec<Vec<String>>>,
    ) -> Result<()> {
        let source = CorpusSource::from_options(path, documents)?;
        let corpus = source.load(&self.filter)?;
        self.set_corpus(corpus);
        Ok(())
    }

    /// Use an already-built corpus as training data.
    pub fn set_corpus(&mut self, corpus: Corpus) {
        self.corpus = Some(corpus);
        self.model = None;
        self.phase = TrainerPhase::Uninitialized;
    }

    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }

    pub fn corpus(&self) -> Option<&Corpus> {
        self.corpus.as_ref()
    }

    /// The trained model, once `fit` has succeeded.
    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    pub fn phase(&self) -> TrainerPhase {
        self.phase
    }

    /// Fit with progress logged through `tracing`.
    pub fn fit(&mut self) -> Result<&TrainedModel> {
        self.fit_with_observer(&mut TracingObserver)
    }

    /// Run EM to convergence or `max_iterations`, reporting to `observer`.
    ///
    /// Each call starts from a fresh initial draw, so two fits with the same
    /// seed and data give identical results. On error the previous model and
    /// phase are left untouched.
    pub fn fit_with_observer(
        &mut self,
        observer: &mut dyn ProgressObserver,
    ) -> Result<&TrainedModel> {
        let corpus = self.corpus.as_ref().ok_or_else(|| {
            MixtureError::Configuration(
                "no training data: call set_param() before fit()".into(),
            )
        })?;

        let previous_phase = self.phase;
        match run_em(&self.config, corpus, observer, &mut self.phase) {
            Ok(model) => {
                self.phase = model.outcome().into();
                Ok(self.model.insert(model))
            }
            Err(e) => {
                self.phase = previous_phase;
                Err(e)
            }
        }
    }

    /// P(component | words) for an unseen word list.
    ///
    /// The words pass through the same token filter as the training data
    /// before they are looked up in the vocabulary.
    pub fn infer<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<f64>> {
        let model = self.model.as_ref().ok_or(MixtureError::ModelNotFitted)?;
        let query = self.filter.normalize(words);
        model.infer(query.as_slice())
    }
}

fn run_em(
    config: &MixtureConfig,
    corpus: &Corpus,
    observer: &mut dyn ProgressObserver,
    phase: &mut TrainerPhase,
) -> Result<TrainedModel> {
    let counts = corpus.matrix();

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut state = TrainingState::initialize(
        counts.n_documents(),
        counts.n_words(),
        config.n_components,
        config.alpha,
        &mut rng,
    )?;
    *phase = TrainerPhase::Initialized;

    let mut likelihood = log_likelihood(&state, counts)?;
    info!(
        documents = counts.n_documents(),
        vocabulary = counts.n_words(),
        components = config.n_components,
        initial_log_likelihood = likelihood,
        "Starting EM"
    );

    *phase = TrainerPhase::Iterating;
    let mut iterations = 0;
    let mut outcome = FitOutcome::MaxIterReached;

    for i in 0..config.max_iterations {
        let previous = likelihood;
        state = e_step(state, counts)?;
        state = m_step(state, counts, config.alpha, config.beta)?;
        likelihood = log_likelihood(&state, counts)?;
        iterations = i + 1;

        let delta = likelihood - previous;
        debug!(iteration = iterations, log_likelihood = likelihood, delta, "EM step");

        if i % config.report_interval == 0 {
            observer.on_iteration(&IterationReport {
                iteration: iterations,
                max_iterations: config.max_iterations,
                log_likelihood: likelihood,
                delta,
            });
        }

        if delta.abs() < config.convergence_threshold {
            outcome = FitOutcome::Converged;
            break;
        }
    }

    if iterations == 0 {
        // No EM pass ran; fill q from the initial draw so every row is a
        // distribution.
        state = e_step(state, counts)?;
    }

    if outcome == FitOutcome::MaxIterReached {
        warn!(
            max_iterations = config.max_iterations,
            log_likelihood = likelihood,
            "EM stopped at the iteration limit without converging"
        );
    }

    observer.on_complete(&FitSummary {
        iterations,
        log_likelihood: likelihood,
        outcome,
    });

    Ok(TrainedModel::new(
        state,
        corpus.vocabulary().clone(),
        likelihood,
        iterations,
        outcome,
    ))
}
