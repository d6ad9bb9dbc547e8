// Progress reporting for the fit loop.
//
// The trainer never prints. It hands an `IterationReport` to an observer every
// `report_interval` iterations and a `FitSummary` once at the end; what
// happens to them (log lines, a progress bar, a test recorder) is up to the
// observer.

use serde::Serialize;
use tracing::info;

use super::model::FitOutcome;

/// Snapshot taken after one E/M iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationReport {
    /// 1-based iteration number
    pub iteration: usize,
    pub max_iterations: usize,
    pub log_likelihood: f64,
    /// Change from the previous iteration's log-likelihood
    pub delta: f64,
}

/// How a fit ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitSummary {
    pub iterations: usize,
    pub log_likelihood: f64,
    pub outcome: FitOutcome,
}

/// Receives progress from `UnigramMixture::fit_with_observer`.
pub trait ProgressObserver {
    /// Called every `report_interval` iterations (iterations 1, 1 + n, ...).
    fn on_iteration(&mut self, report: &IterationReport);

    /// Called once after the last iteration.
    fn on_complete(&mut self, _summary: &FitSummary) {}
}

/// Default observer: structured log lines through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_iteration(&mut self, report: &IterationReport) {
        info!(
            iteration = report.iteration,
            max_iterations = report.max_iterations,
            log_likelihood = report.log_likelihood,
            delta = report.delta,
            "EM iteration finished"
        );
    }

    fn on_complete(&mut self, summary: &FitSummary) {
        info!(
            iterations = summary.iterations,
            log_likelihood = summary.log_likelihood,
            outcome = ?summary.outcome,
            "Fit finished"
        );
    }
}

/// Keeps every report it receives. Handy for inspecting a run afterwards.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub reports: Vec<IterationReport>,
    pub summary: Option<FitSummary>,
}

impl ProgressObserver for RecordingObserver {
    fn on_iteration(&mut self, report: &IterationReport) {
        self.reports.push(*report);
    }

    fn on_complete(&mut self, summary: &FitSummary) {
        self.summary = Some(*summary);
    }
}
