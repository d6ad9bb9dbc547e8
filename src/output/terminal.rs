// Colored terminal output for fitted models and inference results.
//
// main.rs delegates all terminal formatting here: colors, bars, the fit
// progress bar.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::mixture::model::TrainedModel;
use crate::mixture::progress::{FitSummary, IterationReport, ProgressObserver};
use crate::mixture::FitOutcome;

use super::{probability_bar, truncate_chars};

const BAR_WIDTH: usize = 20;

/// Display every component as a weighted bar with its top words.
pub fn display_model(model: &TrainedModel, top_n: usize) {
    let outcome = match model.outcome() {
        FitOutcome::Converged => "converged".green(),
        FitOutcome::MaxIterReached => "iteration limit reached".yellow(),
    };

    println!(
        "\n{}",
        format!(
            "=== Unigram Mixture ({} components, {} words, {} documents) ===",
            model.n_components(),
            model.vocabulary().len(),
            model.responsibilities().nrows()
        )
        .bold()
    );
    println!(
        "  Log-likelihood: {:.4}  after {} iterations ({})",
        model.log_likelihood(),
        model.iterations(),
        outcome
    );
    println!();

    for (z, &weight) in model.theta().iter().enumerate() {
        println!(
            "  {:>2}. {} {:.3}",
            z,
            colorize_bar(probability_bar(weight, BAR_WIDTH), weight),
            weight
        );

        let words: Vec<String> = model
            .top_words(z, top_n)
            .into_iter()
            .map(|(word, p)| format!("{} ({:.3})", truncate_chars(word, 24), p))
            .collect();
        println!("      Top words: {}", words.join(", ").dimmed());
        println!();
    }
}

/// List the most likely component for each training document.
pub fn display_assignments(model: &TrainedModel) {
    println!("{}", "=== Document assignments ===".bold());
    let q = model.responsibilities();
    for (d, z) in model.document_assignments().into_iter().enumerate() {
        println!("  doc {:>5} -> component {:>2}  (p = {:.3})", d, z, q[[d, z]]);
    }
    println!();
}

/// Display P(component | words) for an inferred word list.
pub fn display_distribution(words: &[String], probs: &[f64]) {
    println!(
        "\n{}",
        format!("=== Component probabilities for: {} ===", words.join(" ")).bold()
    );

    let best = probs
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |b, (i, p)| if p > b.1 { (i, p) } else { b });

    for (z, &p) in probs.iter().enumerate() {
        let marker = if z == best.0 { "*".bright_green().bold() } else { " ".normal() };
        println!(
            "  {}{:>2}. {} {:.4}",
            marker,
            z,
            colorize_bar(probability_bar(p, BAR_WIDTH), p),
            p
        );
    }
    println!();
}

fn colorize_bar(bar: String, p: f64) -> colored::ColoredString {
    if p >= 0.25 {
        bar.bright_green()
    } else if p >= 0.10 {
        bar.bright_yellow()
    } else {
        bar.bright_blue()
    }
}

/// Progress bar fed by the fit loop's reports.
pub struct ProgressBarObserver {
    pb: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(max_iterations: usize) -> Self {
        let pb = ProgressBar::new(max_iterations as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  EM [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { pb }
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_iteration(&mut self, report: &IterationReport) {
        self.pb.set_position(report.iteration as u64);
        self.pb.set_message(format!(
            "log-likelihood {:.4} (delta {:+.4})",
            report.log_likelihood, report.delta
        ));
    }

    fn on_complete(&mut self, summary: &FitSummary) {
        self.pb.set_position(summary.iterations as u64);
        self.pb.finish_with_message(format!(
            "log-likelihood {:.4}, {:?}",
            summary.log_likelihood, summary.outcome
        ));
    }
}

impl Drop for ProgressBarObserver {
    // A fit that errors out never reaches on_complete.
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.abandon();
        }
    }
}
