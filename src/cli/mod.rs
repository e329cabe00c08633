//! Command-line parsing for `dla`.
//!
//! Argument parsing and command dispatch stay separate from the numerical code:
//! this module only describes flags, `crate::app` turns them into configs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ModelKind, SolveMethod};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dla", version, about = "Dense linear algebra: GEMM, least-squares fits and Jacobi SVD")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Multiply two matrices read from a text file and write C = A*B.
    Multiply(MultiplyArgs),
    /// Fit a linear or quadratic model by least squares.
    Fit(FitArgs),
    /// Factor a square matrix with one-sided Jacobi SVD and check the reconstruction.
    Svd(SvdArgs),
}

#[derive(Debug, Args, Clone)]
pub struct MultiplyArgs {
    /// Input file: `m n l`, then A (m rows of n), then B (n rows of l).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file for C (`m l` header, then m rows of l).
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Model to fit.
    #[arg(long, value_enum, default_value_t = ModelKind::Linear)]
    pub model: ModelKind,

    /// Solve strategy (defaults: normal for linear, qr for quadratic).
    #[arg(long, value_enum)]
    pub method: Option<SolveMethod>,

    /// CSV with `x` and `y` columns. The built-in reference data is used when absent.
    #[arg(long, value_name = "CSV")]
    pub points: Option<PathBuf>,

    /// Write samples + fitted grid (`x_pts,y_pts,x_fit,y_fit`) to CSV.
    #[arg(long = "export-csv", value_name = "PATH")]
    pub export_csv: Option<PathBuf>,

    /// Grid points in the exported CSV.
    #[arg(long, default_value_t = 200)]
    pub steps: usize,

    /// Write the fit report to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Render an ASCII plot in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct SvdArgs {
    /// Matrix file (`rows cols` header, then the rows).
    #[arg(long, value_name = "PATH", conflicts_with = "random")]
    pub input: Option<PathBuf>,

    /// Factor a random n×n standard-normal matrix instead.
    #[arg(long, value_name = "N")]
    pub random: Option<usize>,

    /// Seed for `--random`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Write the SVD report to JSON.
    #[arg(long = "export-json", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fit_flags() {
        let cli = Cli::try_parse_from(["dla", "fit", "--model", "quadratic", "--method", "normal", "--plot"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.model, ModelKind::Quadratic);
        assert_eq!(args.method, Some(SolveMethod::Normal));
        assert!(args.plot);
        assert_eq!(args.steps, 200);
    }

    #[test]
    fn svd_input_and_random_conflict() {
        assert!(Cli::try_parse_from(["dla", "svd", "--input", "m.txt", "--random", "4"]).is_err());
        assert!(Cli::try_parse_from(["dla", "svd", "--random", "4", "--seed", "7"]).is_ok());
    }
}
