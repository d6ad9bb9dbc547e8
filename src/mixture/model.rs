// Trained model: the post-fit snapshot and inference on unseen word lists.

use std::collections::{BTreeMap, HashMap};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::corpus::vocabulary::Vocabulary;
use crate::error::{MixtureError, Result};

use super::likelihood::normalize_log_weights;
use super::state::{LogParameters, TrainingState};

/// Why the fit loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitOutcome {
    /// Log-likelihood moved by less than the convergence threshold
    Converged,
    /// Ran out of iterations first
    MaxIterReached,
}

/// Final theta/phi plus everything needed to score new word lists.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    theta: Array1<f64>,
    phi: Array2<f64>,
    responsibilities: Array2<f64>,
    vocabulary: Vocabulary,
    word_probabilities: Vec<HashMap<String, f64>>,
    log_likelihood: f64,
    iterations: usize,
    outcome: FitOutcome,
}

impl TrainedModel {
    pub fn new(
        state: TrainingState,
        vocabulary: Vocabulary,
        log_likelihood: f64,
        iterations: usize,
        outcome: FitOutcome,
    ) -> Self {
        // Readable per-component view: word -> P(word | component)
        let word_probabilities: Vec<HashMap<String, f64>> = state
            .phi
            .rows()
            .into_iter()
            .map(|row| {
                vocabulary
                    .iter()
                    .map(|(id, word)| (word.to_string(), row[id]))
                    .collect()
            })
            .collect();

        Self {
            theta: state.theta,
            phi: state.phi,
            responsibilities: state.responsibilities,
            vocabulary,
            word_probabilities,
            log_likelihood,
            iterations,
            outcome,
        }
    }

    /// Mixture weights P(component).
    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// Word distributions P(word | component), K x V in vocabulary id order.
    pub fn phi(&self) -> &Array2<f64> {
        &self.phi
    }

    /// P(component | training document) from the last E-step.
    pub fn responsibilities(&self) -> &Array2<f64> {
        &self.responsibilities
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn n_components(&self) -> usize {
        self.theta.len()
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn outcome(&self) -> FitOutcome {
        self.outcome
    }

    /// One `word -> probability` map per component.
    pub fn word_probabilities(&self) -> &[HashMap<String, f64>] {
        &self.word_probabilities
    }

    pub fn word_probability(&self, component: usize, word: &str) -> Option<f64> {
        self.word_probabilities.get(component)?.get(word).copied()
    }

    /// The `n` most probable words of a component, highest first. Ties keep
    /// vocabulary order.
    pub fn top_words(&self, component: usize, n: usize) -> Vec<(&str, f64)> {
        if component >= self.n_components() {
            return Vec::new();
        }
        let row = self.phi.row(component);
        let mut ranked: Vec<(&str, f64)> = self
            .vocabulary
            .iter()
            .map(|(id, word)| (word, row[id]))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }

    /// P(component | words) for an unseen document.
    ///
    /// Every occurrence of an in-vocabulary word multiplies in its phi;
    /// out-of-vocabulary words are skipped rather than treated as zero
    /// probability. At least one word must be known.
    pub fn infer<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<f64>> {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for word in words {
            if let Some(id) = self.vocabulary.id(word.as_ref()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        if counts.is_empty() {
            return Err(MixtureError::UnknownVocabulary);
        }

        let row: Vec<(usize, u32)> = counts.into_iter().collect();
        let logs = LogParameters::new(&self.theta, &self.phi);
        // The query is scored as a single document, index 0.
        normalize_log_weights(&logs.joint(&row))
            .ok_or(MixtureError::NumericDegeneracy { document: 0 })
    }

    /// Most likely component for `words` and its probability.
    pub fn classify<S: AsRef<str>>(&self, words: &[S]) -> Result<(usize, f64)> {
        let probs = self.infer(words)?;
        Ok(argmax(probs.iter().copied()))
    }

    /// Most likely component for each training document.
    pub fn document_assignments(&self) -> Vec<usize> {
        self.responsibilities
            .rows()
            .into_iter()
            .map(|row| argmax(row.iter().copied()).0)
            .collect()
    }

    /// Serialisable overview: per-component weight and top words.
    pub fn summary(&self, top_n: usize) -> ModelSummary {
        let components = (0..self.n_components())
            .map(|z| ComponentSummary {
                index: z,
                weight: self.theta[z],
                top_words: self
                    .top_words(z, top_n)
                    .into_iter()
                    .map(|(word, probability)| WordProbability {
                        word: word.to_string(),
                        probability,
                    })
                    .collect(),
            })
            .collect();

        ModelSummary {
            components,
            vocabulary_size: self.vocabulary.len(),
            documents: self.responsibilities.nrows(),
            log_likelihood: self.log_likelihood,
            iterations: self.iterations,
            outcome: self.outcome,
        }
    }
}

/// First index of the largest value, with that value.
fn argmax<I: IntoIterator<Item = f64>>(values: I) -> (usize, f64) {
    values
        .into_iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub components: Vec<ComponentSummary>,
    pub vocabulary_size: usize,
    pub documents: usize,
    pub log_likelihood: f64,
    pub iterations: usize,
    pub outcome: FitOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub index: usize,
    /// theta for this component
    pub weight: f64,
    pub top_words: Vec<WordProbability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordProbability {
    pub word: String,
    pub probability: f64,
}
