// Training state: the distributions EM moves between steps.
//
// theta (K), phi (K x V) and the responsibilities q (D x K) travel together
// as one value. Each step function takes the state by value and hands back
// the updated one, so a step can be run and inspected in isolation.

use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::{Distribution, Gamma};

use crate::corpus::DocumentTermMatrix;
use crate::error::{MixtureError, Result};

/// Current parameter estimates plus the latest responsibilities.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingState {
    /// Mixture weights P(component), length K
    pub theta: Array1<f64>,
    /// Word distributions P(word | component), K x V
    pub phi: Array2<f64>,
    /// Posterior P(component | document), D x K
    pub responsibilities: Array2<f64>,
}

impl TrainingState {
    /// Draw a fresh starting point.
    ///
    /// theta comes from a symmetric Dirichlet(alpha) over K components, and
    /// each row of phi from an independent symmetric Dirichlet(alpha) over V
    /// words. Every entry is strictly positive. Responsibilities start at zero
    /// until the first E-step.
    pub fn initialize<R: Rng + ?Sized>(
        n_documents: usize,
        n_words: usize,
        n_components: usize,
        alpha: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if n_components == 0 {
            return Err(MixtureError::InvalidParameter(
                "number of components must be positive".into(),
            ));
        }

        let theta = sample_symmetric_dirichlet(alpha, n_components, rng)?;
        let mut phi: Array2<f64> = Array2::zeros((n_components, n_words));
        for mut row in phi.rows_mut() {
            row.assign(&sample_symmetric_dirichlet(alpha, n_words, rng)?);
        }

        Ok(Self {
            theta,
            phi,
            responsibilities: Array2::zeros((n_documents, n_components)),
        })
    }

    /// Build a state from explicit parameters, e.g. to run a single step on
    /// hand-picked values.
    pub fn from_parameters(
        theta: Array1<f64>,
        phi: Array2<f64>,
        n_documents: usize,
    ) -> Result<Self> {
        if theta.len() != phi.nrows() {
            return Err(MixtureError::InvalidParameter(format!(
                "theta has {} components but phi has {} rows",
                theta.len(),
                phi.nrows()
            )));
        }
        let k = theta.len();
        Ok(Self {
            theta,
            phi,
            responsibilities: Array2::zeros((n_documents, k)),
        })
    }

    /// Number of components (K).
    pub fn n_components(&self) -> usize {
        self.theta.len()
    }

    /// Number of vocabulary words (V).
    pub fn n_words(&self) -> usize {
        self.phi.ncols()
    }

    /// Number of documents (D).
    pub fn n_documents(&self) -> usize {
        self.responsibilities.nrows()
    }

    /// Fail unless this state was sized for `counts`.
    pub(crate) fn check_shape(&self, counts: &DocumentTermMatrix) -> Result<()> {
        if self.n_words() != counts.n_words() || self.n_documents() != counts.n_documents() {
            return Err(MixtureError::InvalidParameter(format!(
                "state is sized for {} documents x {} words but corpus has {} x {}",
                self.n_documents(),
                self.n_words(),
                counts.n_documents(),
                counts.n_words()
            )));
        }
        Ok(())
    }
}

/// Logarithms of theta and phi, computed once per pass over the corpus.
pub(crate) struct LogParameters {
    ln_theta: Array1<f64>,
    ln_phi: Array2<f64>,
}

impl LogParameters {
    pub(crate) fn new(theta: &Array1<f64>, phi: &Array2<f64>) -> Self {
        Self {
            ln_theta: theta.mapv(f64::ln),
            ln_phi: phi.mapv(f64::ln),
        }
    }

    /// ln theta_z + sum_w count * ln phi_z[w] for every component z.
    ///
    /// Only non-zero cells are passed in; absent words contribute a factor of
    /// one and are skipped.
    pub(crate) fn joint(&self, row: &[(usize, u32)]) -> Vec<f64> {
        self.ln_theta
            .iter()
            .enumerate()
            .map(|(z, &ln_t)| {
                ln_t + row
                    .iter()
                    .map(|&(w, c)| c as f64 * self.ln_phi[[z, w]])
                    .sum::<f64>()
            })
            .collect()
    }
}

/// Draw from a symmetric Dirichlet by normalising independent Gamma(alpha, 1)
/// draws.
///
/// Draws that underflow to zero (likely for small alpha) are floored at the
/// smallest positive f64 so every probability stays strictly positive.
pub fn sample_symmetric_dirichlet<R: Rng + ?Sized>(
    alpha: f64,
    size: usize,
    rng: &mut R,
) -> Result<Array1<f64>> {
    let gamma = Gamma::new(alpha, 1.0).map_err(|e| {
        MixtureError::InvalidParameter(format!("Dirichlet concentration {alpha}: {e}"))
    })?;

    let mut draws: Array1<f64> =
        (0..size).map(|_| gamma.sample(&mut *rng).max(f64::MIN_POSITIVE)).collect();
    let total = draws.sum();
    if size > 0 {
        draws.mapv_inplace(|x| (x / total).max(f64::MIN_POSITIVE));
    }
    Ok(draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initialize_shapes_and_sums() {
        let mut rng = StdRng::seed_from_u64(7);
        let state = TrainingState::initialize(4, 6, 3, 1.0, &mut rng).unwrap();

        assert_eq!(state.theta.len(), 3);
        assert_eq!(state.phi.dim(), (3, 6));
        assert_eq!(state.responsibilities.dim(), (4, 3));
        assert!((state.theta.sum() - 1.0).abs() < 1e-9);
        for row in state.phi.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|&p| p > 0.0));
        }
        assert!(state.theta.iter().all(|&p| p > 0.0));
    }

    #[test]
    fn test_initialize_same_seed_same_draw() {
        let a = TrainingState::initialize(2, 5, 2, 1.0, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = TrainingState::initialize(2, 5, 2, 1.0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tiny_alpha_stays_positive() {
        let mut rng = StdRng::seed_from_u64(11);
        let draw = sample_symmetric_dirichlet(1e-3, 500, &mut rng).unwrap();
        assert!(draw.iter().all(|&p| p > 0.0));
        assert!((draw.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_symmetric_dirichlet(-1.0, 3, &mut rng).unwrap_err();
        assert!(matches!(err, MixtureError::InvalidParameter(_)));
    }

    #[test]
    fn test_from_parameters_rejects_mismatch() {
        let theta = Array1::from(vec![0.5, 0.5]);
        let phi = Array2::from_elem((3, 2), 0.5);
        assert!(TrainingState::from_parameters(theta, phi, 1).is_err());
    }

    #[test]
    fn test_joint_skips_absent_words() {
        let theta = Array1::from(vec![0.25, 0.75]);
        let phi = ndarray::arr2(&[[0.5, 0.5], [0.1, 0.9]]);
        let logs = LogParameters::new(&theta, &phi);
        let joint = logs.joint(&[(1, 2)]);
        let expected0 = 0.25f64.ln() + 2.0 * 0.5f64.ln();
        let expected1 = 0.75f64.ln() + 2.0 * 0.9f64.ln();
        assert!((joint[0] - expected0).abs() < 1e-12);
        assert!((joint[1] - expected1).abs() < 1e-12);
    }
}
