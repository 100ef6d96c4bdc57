// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — trains the autoencoder and reports accuracy
//   2. `evaluate` — reloads a checkpoint and re-scores it
//
// Running with no subcommand trains with the default
// hyperparameters (k=50, lr=0.015, 80 epochs, λ=0).

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, TrainArgs};

use crate::application::train_use_case::TrainConfig;

#[derive(Parser, Debug)]
#[command(
    name = "response-imputer",
    version = "0.1.0",
    about = "Impute missing student answers with an autoencoder, then report accuracy."
)]
pub struct Cli {
    /// The subcommand to run (defaults to `train`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Route to the matching use case. The CLI layer never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(Commands::Train(args))    => run_train(args.into()),
            Some(Commands::Evaluate(args)) => run_evaluate(args),
            None                           => run_train(TrainConfig::default()),
        }
    }
}

fn run_train(config: TrainConfig) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on answers in: {}", config.data_dir);

    let output_dir = config.output_dir.clone();
    let report     = TrainUseCase::new(config).execute()?;

    println!("Training complete after {} epochs. Checkpoint saved to '{}'.", report.epochs_run, output_dir);
    println!("Final validation accuracy: {:.4}", report.valid_acc);
    println!("Final test accuracy:       {:.4}", report.test_acc);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let report = EvaluateUseCase::new(args.data_dir, args.output_dir).execute()?;

    println!("Validation accuracy: {:.4}", report.valid_acc);
    println!("Test accuracy:       {:.4}", report.test_acc);
    Ok(())
}
