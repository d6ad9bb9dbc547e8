// Corpus log-likelihood under the current parameters.
//
// log P(corpus) = sum_d log sum_z theta_z * prod_w phi_z[w]^count[d,w]
//
// The inner product underflows to zero for long documents, so every term is
// kept in log space and components are combined with log-sum-exp.

use crate::corpus::DocumentTermMatrix;
use crate::error::{MixtureError, Result};

use super::state::{LogParameters, TrainingState};

/// Total log-likelihood of the corpus. Drives the convergence test.
pub fn log_likelihood(state: &TrainingState, counts: &DocumentTermMatrix) -> Result<f64> {
    state.check_shape(counts)?;
    let logs = LogParameters::new(&state.theta, &state.phi);

    let mut total = 0.0;
    for (d, row) in counts.rows().enumerate() {
        let term = log_sum_exp(&logs.joint(row));
        if !term.is_finite() {
            return Err(MixtureError::NumericDegeneracy { document: d });
        }
        total += term;
    }
    Ok(total)
}

/// Log density of the Dirichlet pseudo-counts, up to a constant:
/// `alpha * sum ln theta + beta * sum ln phi`.
pub fn log_prior(state: &TrainingState, alpha: f64, beta: f64) -> f64 {
    alpha * state.theta.mapv(f64::ln).sum() + beta * state.phi.mapv(f64::ln).sum()
}

/// Likelihood plus prior, the objective the smoothed M-step maximises.
/// Unlike the bare likelihood it never decreases from one iteration to the
/// next.
pub fn log_posterior(
    state: &TrainingState,
    counts: &DocumentTermMatrix,
    alpha: f64,
    beta: f64,
) -> Result<f64> {
    Ok(log_likelihood(state, counts)? + log_prior(state, alpha, beta))
}

/// Numerically stable `ln(sum(exp(values)))`.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_val.is_infinite() {
        return max_val;
    }
    max_val + values.iter().map(|&v| (v - max_val).exp()).sum::<f64>().ln()
}

/// Turn log weights into probabilities summing to one.
///
/// Returns `None` when the normaliser is not finite, i.e. every weight is
/// zero or something upstream produced NaN.
pub(crate) fn normalize_log_weights(log_weights: &[f64]) -> Option<Vec<f64>> {
    let norm = log_sum_exp(log_weights);
    if !norm.is_finite() {
        return None;
    }
    Some(log_weights.iter().map(|&lw| (lw - norm).exp()).collect())
}
