use crate::error::{MixtureError, Result};

/// Hyperparameters for a Unigram Mixture fit.
///
/// Everything is fixed at construction. `UnigramMixture::new` validates the
/// config once and never mutates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureConfig {
    /// Dirichlet concentration for the initial draws and pseudo-count for
    /// the mixture weights (default 1.0)
    pub alpha: f64,
    /// Pseudo-count added to every word of every component (default 1.0)
    pub beta: f64,
    /// Number of mixture components K (default 10)
    pub n_components: usize,
    /// Stop once the log-likelihood moves by less than this (default 0.01)
    pub convergence_threshold: f64,
    /// Upper bound on EM iterations (default 100)
    pub max_iterations: usize,
    /// Seed for the initial Dirichlet draws. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Progress is reported every this many iterations (default 10)
    pub report_interval: usize,
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            n_components: 10,
            convergence_threshold: 0.01,
            max_iterations: 100,
            seed: None,
            report_interval: 10,
        }
    }
}

impl MixtureConfig {
    /// Create a configuration with `n_components` mixture components and
    /// defaults for everything else.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            ..Default::default()
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn report_interval(mut self, every: usize) -> Self {
        self.report_interval = every;
        self
    }

    /// Check that the hyperparameters describe a model EM can fit.
    ///
    /// alpha and beta must be strictly positive: they are what keeps every
    /// theta and phi entry above zero, so the log-space steps stay finite.
    pub fn validate(&self) -> Result<()> {
        if self.n_components == 0 {
            return Err(MixtureError::InvalidParameter(
                "number of components must be positive".into(),
            ));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(MixtureError::InvalidParameter(format!(
                "alpha must be positive and finite, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(MixtureError::InvalidParameter(format!(
                "beta must be positive and finite, got {}",
                self.beta
            )));
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold >= 0.0) {
            return Err(MixtureError::InvalidParameter(format!(
                "convergence threshold must be non-negative, got {}",
                self.convergence_threshold
            )));
        }
        if self.report_interval == 0 {
            return Err(MixtureError::InvalidParameter(
                "report interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
