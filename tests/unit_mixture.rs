// Unit tests for the public training and inference API.
//
// Covers the behavioural contract of UnigramMixture: distribution invariants
// after fitting, the error kinds for missing data / unfitted models / unknown
// words, and determinism under a fixed seed.

use unimix::mixture::RecordingObserver;
use unimix::{FitOutcome, MixtureConfig, MixtureError, TrainerPhase, UnigramMixture};

fn docs(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|w| w.to_string()).collect())
        .collect()
}

fn two_doc_corpus() -> Vec<Vec<String>> {
    docs(&[&["a", "b", "a"], &["c", "c", "b"]])
}

fn fitted(config: MixtureConfig) -> UnigramMixture {
    let mut um = UnigramMixture::new(config).unwrap();
    um.set_param(None, Some(two_doc_corpus())).unwrap();
    um.fit().unwrap();
    um
}

// ============================================================
// fit: invariants
// ============================================================

#[test]
fn fit_two_documents_terminates_with_valid_theta() {
    let um = fitted(MixtureConfig::new(2).alpha(1.0).beta(1.0).max_iterations(50).seed(42));
    let model = um.model().unwrap();

    assert!(model.iterations() <= 50);
    assert_eq!(model.theta().len(), 2);
    assert!(
        (model.theta().sum() - 1.0).abs() < 1e-9,
        "theta sums to {}",
        model.theta().sum()
    );
}

#[test]
fn fit_phi_rows_are_distributions() {
    let um = fitted(MixtureConfig::new(3).max_iterations(50).seed(7));
    let model = um.model().unwrap();

    assert_eq!(model.phi().dim(), (3, 3));
    for row in model.phi().rows() {
        assert!((row.sum() - 1.0).abs() < 1e-9, "phi row sums to {}", row.sum());
        assert!(row.iter().all(|&p| p > 0.0));
    }
}

#[test]
fn fit_responsibilities_are_distributions() {
    let um = fitted(MixtureConfig::new(4).max_iterations(20).seed(3));
    let q = um.model().unwrap().responsibilities();

    assert_eq!(q.dim(), (2, 4));
    for row in q.rows() {
        assert!((row.sum() - 1.0).abs() < 1e-9);
        assert!(row.iter().all(|&p| p >= 0.0));
    }
}

#[test]
fn fit_without_seed_still_holds_invariants() {
    let um = fitted(MixtureConfig::new(2).max_iterations(50));
    let model = um.model().unwrap();
    assert!((model.theta().sum() - 1.0).abs() < 1e-9);
    for row in model.phi().rows() {
        assert!((row.sum() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn fit_phase_matches_outcome() {
    let um = fitted(MixtureConfig::new(2).max_iterations(50).seed(1));
    let expected = match um.model().unwrap().outcome() {
        FitOutcome::Converged => TrainerPhase::Converged,
        FitOutcome::MaxIterReached => TrainerPhase::MaxIterReached,
    };
    assert_eq!(um.phase(), expected);
}

#[test]
fn fit_single_iteration_limit() {
    let um = fitted(
        MixtureConfig::new(2)
            .max_iterations(1)
            .convergence_threshold(0.0)
            .seed(8),
    );
    let model = um.model().unwrap();
    assert_eq!(model.iterations(), 1);
    assert_eq!(model.outcome(), FitOutcome::MaxIterReached);
    assert_eq!(um.phase(), TrainerPhase::MaxIterReached);
}

#[test]
fn fit_huge_threshold_converges_after_first_iteration() {
    let um = fitted(MixtureConfig::new(2).convergence_threshold(1e9).seed(8));
    let model = um.model().unwrap();
    assert_eq!(model.iterations(), 1);
    assert_eq!(model.outcome(), FitOutcome::Converged);
}

#[test]
fn fit_observer_sees_final_summary() {
    let mut um = UnigramMixture::new(MixtureConfig::new(2).seed(12)).unwrap();
    um.set_param(None, Some(two_doc_corpus())).unwrap();

    let mut recorder = RecordingObserver::default();
    let likelihood = um.fit_with_observer(&mut recorder).unwrap().log_likelihood();

    let summary = recorder.summary.expect("observer should get a summary");
    assert_eq!(summary.log_likelihood, likelihood);
    assert!(!recorder.reports.is_empty());
    assert_eq!(recorder.reports[0].iteration, 1);
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn same_seed_same_parameters() {
    let mut um = UnigramMixture::new(MixtureConfig::new(2).seed(2024)).unwrap();
    um.set_param(None, Some(two_doc_corpus())).unwrap();

    let first = um.fit().unwrap().clone();
    let second = um.fit().unwrap();

    assert_eq!(first.theta(), second.theta());
    assert_eq!(first.phi(), second.phi());
    assert_eq!(first.log_likelihood(), second.log_likelihood());
}

#[test]
fn same_seed_across_instances() {
    let a = fitted(MixtureConfig::new(3).seed(99));
    let b = fitted(MixtureConfig::new(3).seed(99));
    assert_eq!(a.model().unwrap().theta(), b.model().unwrap().theta());
    assert_eq!(a.model().unwrap().phi(), b.model().unwrap().phi());
}

// ============================================================
// infer
// ============================================================

#[test]
fn infer_known_word_returns_distribution() {
    let um = fitted(MixtureConfig::new(2).alpha(1.0).beta(1.0).max_iterations(50).seed(42));
    let probs = um.infer(&["a"]).unwrap();

    assert_eq!(probs.len(), 2);
    assert!(probs.iter().all(|&p| p >= 0.0));
    let total: f64 = probs.iter().sum();
    assert!((total - 1.0).abs() < 1e-9, "probabilities sum to {total}");
}

#[test]
fn infer_empty_is_unknown_vocabulary() {
    let um = fitted(MixtureConfig::new(2).seed(42));
    let empty: Vec<String> = Vec::new();
    assert!(matches!(
        um.infer(empty.as_slice()),
        Err(MixtureError::UnknownVocabulary)
    ));
}

#[test]
fn infer_unknown_word_is_unknown_vocabulary() {
    let um = fitted(MixtureConfig::new(2).seed(42));
    assert!(matches!(
        um.infer(&["unknown_word_xyz"]),
        Err(MixtureError::UnknownVocabulary)
    ));
}

#[test]
fn infer_mixed_known_and_unknown_ignores_unknown() {
    let um = fitted(MixtureConfig::new(2).seed(42));
    let mixed = um.infer(&["a", "unknown_word_xyz", "b"]).unwrap();
    let known = um.infer(&["a", "b"]).unwrap();
    assert_eq!(mixed, known);
}

#[test]
fn infer_before_fit_is_model_not_fitted() {
    let mut um = UnigramMixture::new(MixtureConfig::new(2)).unwrap();
    assert!(matches!(um.infer(&["a"]), Err(MixtureError::ModelNotFitted)));

    // Loading data alone is not enough
    um.set_param(None, Some(two_doc_corpus())).unwrap();
    assert!(matches!(um.infer(&["a"]), Err(MixtureError::ModelNotFitted)));
}

// ============================================================
// set_param
// ============================================================

#[test]
fn set_param_without_source_is_configuration_error() {
    let mut um = UnigramMixture::new(MixtureConfig::default()).unwrap();
    let err = um.set_param(None, None).unwrap_err();
    assert!(matches!(err, MixtureError::Configuration(_)));
}

#[test]
fn set_param_empty_document_list_is_configuration_error() {
    let mut um = UnigramMixture::new(MixtureConfig::default()).unwrap();
    let err = um.set_param(None, Some(Vec::new())).unwrap_err();
    assert!(matches!(err, MixtureError::Configuration(_)));
}

#[test]
fn set_param_missing_file_is_io_error() {
    let mut um = UnigramMixture::new(MixtureConfig::default()).unwrap();
    let err = um
        .set_param(Some(std::path::Path::new("/no/such/unimix/corpus.txt")), None)
        .unwrap_err();
    assert!(matches!(err, MixtureError::Io { .. }));
}

#[test]
fn fit_tolerates_empty_documents() {
    let mut um = UnigramMixture::new(MixtureConfig::new(2).seed(4)).unwrap();
    um.set_param(None, Some(docs(&[&["a", "b"], &[], &["b", "c"]])))
        .unwrap();
    let model = um.fit().unwrap();
    assert!(model.log_likelihood().is_finite());
    assert_eq!(model.responsibilities().nrows(), 3);
}
