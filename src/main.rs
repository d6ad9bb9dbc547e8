use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use unimix::output::terminal;
use unimix::{MixtureConfig, TokenFilter, UnigramMixture};

/// unimix: cluster documents with a Unigram Mixture model fitted by EM.
///
/// Training data is a text file with one document per line and tokens
/// separated by single spaces.
#[derive(Parser)]
#[command(name = "unimix", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model and show the learned components
    Fit {
        /// Training corpus (one document per line)
        input: PathBuf,

        #[command(flatten)]
        model: ModelArgs,

        /// Words to show per component (default: 10)
        #[arg(long, default_value = "10")]
        top_words: usize,

        /// Also list the most likely component of every training document
        #[arg(long)]
        assignments: bool,

        /// Print a JSON summary instead of the terminal view
        #[arg(long)]
        json: bool,
    },

    /// Fit the model, then classify a list of words
    Infer {
        /// Training corpus (one document per line)
        input: PathBuf,

        /// Words of the document to classify
        #[arg(required = true)]
        words: Vec<String>,

        #[command(flatten)]
        model: ModelArgs,

        /// Print the probabilities as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Hyperparameters and preprocessing shared by every subcommand.
#[derive(Args)]
struct ModelArgs {
    /// Number of mixture components
    #[arg(short = 'k', long, default_value = "10")]
    components: usize,

    /// Dirichlet prior for the initial draws and mixture weights
    #[arg(long, default_value = "1.0")]
    alpha: f64,

    /// Pseudo-count smoothing for word distributions
    #[arg(long, default_value = "1.0")]
    beta: f64,

    /// Stop when the log-likelihood changes by less than this
    #[arg(long, default_value = "0.01")]
    threshold: f64,

    /// Maximum number of EM iterations
    #[arg(long, default_value = "100")]
    max_iter: usize,

    /// Seed for the initial draw (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Report progress every N iterations
    #[arg(long, default_value = "10")]
    report_every: usize,

    /// Lowercase tokens before counting
    #[arg(long)]
    lowercase: bool,

    /// Drop English stop words before counting
    #[arg(long)]
    stop_words: bool,
}

impl ModelArgs {
    fn config(&self) -> MixtureConfig {
        let config = MixtureConfig::new(self.components)
            .alpha(self.alpha)
            .beta(self.beta)
            .convergence_threshold(self.threshold)
            .max_iterations(self.max_iter)
            .report_interval(self.report_every);
        match self.seed {
            Some(seed) => config.seed(seed),
            None => config,
        }
    }

    fn filter(&self) -> TokenFilter {
        TokenFilter {
            lowercase: self.lowercase,
            stop_words: self.stop_words,
        }
    }
}

fn main() -> Result<()> {
    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("unimix=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fit {
            input,
            model,
            top_words,
            assignments,
            json,
        } => {
            let um = train(&input, &model, !json)?;
            let trained = um
                .model()
                .context("fit finished without producing a model")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&trained.summary(top_words))?);
            } else {
                terminal::display_model(trained, top_words);
                if assignments {
                    terminal::display_assignments(trained);
                }
            }
        }

        Commands::Infer {
            input,
            words,
            model,
            json,
        } => {
            let um = train(&input, &model, !json)?;
            let probs = um.infer(words.as_slice())?;
            info!(words = words.len(), "Classified word list");

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "words": words,
                        "probabilities": probs,
                    }))?
                );
            } else {
                terminal::display_distribution(&words, &probs);
            }
        }
    }

    Ok(())
}

/// Load the corpus and fit. Shows a progress bar unless output is JSON.
fn train(input: &Path, args: &ModelArgs, show_progress: bool) -> Result<UnigramMixture> {
    let mut um = UnigramMixture::new(args.config())?.with_filter(args.filter());
    um.set_param(Some(input), None)
        .with_context(|| format!("loading corpus from {}", input.display()))?;

    if let Some(corpus) = um.corpus().filter(|_| show_progress) {
        println!(
            "Fitting {} components to {} documents ({} distinct words)...",
            args.components,
            corpus.n_documents(),
            corpus.n_words()
        );
    }

    if show_progress {
        let mut observer = terminal::ProgressBarObserver::new(args.max_iter);
        um.fit_with_observer(&mut observer)?;
        println!("{}", "Fit complete.".bold());
    } else {
        um.fit()?;
    }
    Ok(um)
}
