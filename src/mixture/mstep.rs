// M-step: re-estimate theta and phi from the responsibilities.
//
//   theta_z  = (alpha + sum_d q[d,z]) / (alpha * K + D)
//   phi_z[w] ∝ beta + sum_d q[d,z] * count[d,w]
//
// With alpha, beta > 0 every entry stays strictly positive, even for words or
// components no document is responsible for.

use ndarray::{Array1, Array2};

use crate::corpus::DocumentTermMatrix;
use crate::error::Result;

use super::state::TrainingState;

/// Replace theta and phi with their smoothed estimates given `state.responsibilities`.
pub fn m_step(
    mut state: TrainingState,
    counts: &DocumentTermMatrix,
    alpha: f64,
    beta: f64,
) -> Result<TrainingState> {
    state.check_shape(counts)?;
    let q = &state.responsibilities;
    let k = state.n_components();
    let n_docs = counts.n_documents() as f64;

    let denom = alpha * k as f64 + n_docs;
    let theta: Array1<f64> = q.columns().into_iter().map(|col| (alpha + col.sum()) / denom).collect();

    let mut phi = Array2::from_elem((k, counts.n_words()), beta);
    for (d, row) in counts.rows().enumerate() {
        for z in 0..k {
            let r = q[[d, z]];
            if r == 0.0 {
                continue;
            }
            for &(w, c) in row {
                phi[[z, w]] += r * c as f64;
            }
        }
    }
    for mut row in phi.rows_mut() {
        let total = row.sum();
        if total > 0.0 {
            row.mapv_inplace(|x| x / total);
        }
    }

    state.theta = theta;
    state.phi = phi;
    Ok(state)
}
