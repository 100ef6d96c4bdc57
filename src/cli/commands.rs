// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the `train` and `evaluate` subcommands and their
// flags. Every train default mirrors TrainConfig::default(),
// so `train` with no flags equals running with no subcommand.

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the autoencoder on the training matrix
    Train(TrainArgs),

    /// Re-score a saved checkpoint on the validation and test sets
    Evaluate(EvaluateArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding train_data.csv, valid_data.csv and test_data.csv
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory for the checkpoint, metrics CSV and history JSON
    #[arg(long, default_value = "output")]
    pub output_dir: String,

    /// Latent dimension k
    #[arg(long, default_value_t = 50)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 0.015)]
    pub lr: f64,

    /// First epoch trained at the decayed learning rate
    #[arg(long, default_value_t = 40)]
    pub lr_decay_epoch: usize,

    /// Multiplier applied to the learning rate from --lr-decay-epoch on
    #[arg(long, default_value_t = 0.5)]
    pub lr_decay_factor: f64,

    /// Number of full passes over every student
    #[arg(long, default_value_t = 80)]
    pub epochs: usize,

    /// Weight of the L2 penalty, applied as λ/2 · ‖W‖²
    #[arg(long, default_value_t = 0.0)]
    pub lambda: f64,

    /// Seed for weight initialisation
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Stop after this many epochs without validation-loss improvement.
    /// Off when omitted.
    #[arg(long)]
    pub early_stopping_patience: Option<usize>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:                a.data_dir,
            output_dir:              a.output_dir,
            hidden_size:             a.hidden_size,
            learning_rate:           a.lr,
            lr_decay_epoch:          a.lr_decay_epoch,
            lr_decay_factor:         a.lr_decay_factor,
            num_epochs:              a.epochs,
            lambda:                  a.lambda,
            seed:                    a.seed,
            early_stopping_patience: a.early_stopping_patience,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory with the answer CSV files.
    /// Defaults to the one recorded in train_config.json.
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Directory where training saved the checkpoint
    #[arg(long, default_value = "output")]
    pub output_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse_train(args: &[&str]) -> TrainConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Commands::Train(a)) => a.into(),
            other => panic!("expected train, got {:?}", other),
        }
    }

    #[test]
    fn test_train_flag_defaults_match_config_defaults() {
        assert_eq!(parse_train(&["response-imputer", "train"]), TrainConfig::default());
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["response-imputer"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_train_flags_override_defaults() {
        let cfg = parse_train(&[
            "response-imputer", "train",
            "--hidden-size", "10",
            "--lr", "0.05",
            "--epochs", "5",
            "--lambda", "0.01",
            "--early-stopping-patience", "3",
        ]);
        assert_eq!(cfg.hidden_size, 10);
        assert_eq!(cfg.learning_rate, 0.05);
        assert_eq!(cfg.num_epochs, 5);
        assert_eq!(cfg.lambda, 0.01);
        assert_eq!(cfg.early_stopping_patience, Some(3));
    }

    #[test]
    fn test_evaluate_defaults() {
        let cli = Cli::try_parse_from(["response-imputer", "evaluate"]).unwrap();
        match cli.command {
            Some(Commands::Evaluate(a)) => {
                assert_eq!(a.data_dir, None);
                assert_eq!(a.output_dir, "output");
            }
            other => panic!("expected evaluate, got {:?}", other),
        }
    }
}
