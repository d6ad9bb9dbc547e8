// E-step: posterior responsibilities of each component for each document.

use ndarray::Array2;

use crate::corpus::DocumentTermMatrix;
use crate::error::{MixtureError, Result};

use super::likelihood::normalize_log_weights;
use super::state::{LogParameters, TrainingState};

/// Recompute q[d, :] = P(component | document d) from the current theta/phi.
///
/// Weights are formed as ln theta_z + sum count * ln phi_z[w] and normalised
/// with log-sum-exp, so long documents cannot underflow every component to
/// zero. A row whose normaliser is still not finite is reported as
/// `NumericDegeneracy` instead of being filled with NaN.
pub fn e_step(mut state: TrainingState, counts: &DocumentTermMatrix) -> Result<TrainingState> {
    state.check_shape(counts)?;
    let logs = LogParameters::new(&state.theta, &state.phi);

    let mut responsibilities = Array2::zeros((counts.n_documents(), state.n_components()));
    for (d, row) in counts.rows().enumerate() {
        let probs = normalize_log_weights(&logs.joint(row))
            .ok_or(MixtureError::NumericDegeneracy { document: d })?;
        for (z, p) in probs.into_iter().enumerate() {
            responsibilities[[d, z]] = p;
        }
    }

    state.responsibilities = responsibilities;
    Ok(state)
}
