//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real entry point that:
//! - parses CLI arguments
//! - builds the per-subcommand config
//! - runs the pipeline
//! - prints reports/plots

use clap::Parser;

use crate::cli::{Cli, Command, FitArgs, MultiplyArgs, SvdArgs};
use crate::domain::{FitConfig, MultiplyConfig, SvdConfig, SvdSource};
use crate::error::AppError;
use crate::report::{format_fit_report, format_multiply_summary, format_svd_report};

pub mod pipeline;

/// Entry point for the `dla` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Multiply(args) => handle_multiply(&args),
        Command::Fit(args) => handle_fit(&args),
        Command::Svd(args) => handle_svd(&args),
    }
}

fn handle_multiply(args: &MultiplyArgs) -> Result<(), AppError> {
    let config = multiply_config_from_args(args);
    let out = pipeline::run_multiply(&config)?;
    println!("{}", format_multiply_summary(&out.product));
    Ok(())
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(args);
    let out = pipeline::run_fit(&config)?;

    if !out.row_errors.is_empty() {
        eprintln!(
            "Skipped {} of {} rows in the points CSV.",
            out.row_errors.len(),
            out.rows_read
        );
    }
    println!("{}", format_fit_report(&out.report));

    if config.plot {
        let plot = crate::plot::render_fit_plot(&out.report, config.plot_width, config.plot_height);
        println!("{plot}");
    }
    if let Some(path) = &config.export_csv {
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &config.export_json {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_svd(args: &SvdArgs) -> Result<(), AppError> {
    let config = svd_config_from_args(args);
    let report = pipeline::run_svd(&config)?;
    println!("{}", format_svd_report(&report));
    if let Some(path) = &config.export_json {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

pub fn multiply_config_from_args(args: &MultiplyArgs) -> MultiplyConfig {
    MultiplyConfig {
        input: args.input.clone(),
        output: args.output.clone(),
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        points_path: args.points.clone(),
        model: args.model,
        method: args.method.unwrap_or_else(|| args.model.default_method()),
        export_csv: args.export_csv.clone(),
        grid_steps: args.steps,
        export_json: args.export_json.clone(),
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
    }
}

pub fn svd_config_from_args(args: &SvdArgs) -> SvdConfig {
    let source = match (&args.input, args.random) {
        (Some(path), _) => SvdSource::File(path.clone()),
        (None, Some(n)) => SvdSource::Random { n, seed: args.seed },
        (None, None) => SvdSource::Reference,
    };
    SvdConfig {
        source,
        export_json: args.export_json.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKind, SolveMethod};

    fn parse(argv: &[&str]) -> Command {
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn fit_method_defaults_per_model() {
        let Command::Fit(args) = parse(&["dla", "fit", "--model", "quadratic"]) else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&args);
        assert_eq!(config.model, ModelKind::Quadratic);
        assert_eq!(config.method, SolveMethod::Qr);
        assert_eq!(config.grid_steps, 200);

        let Command::Fit(args) = parse(&["dla", "fit"]) else {
            panic!("expected fit");
        };
        assert_eq!(fit_config_from_args(&args).method, SolveMethod::Normal);
    }

    #[test]
    fn svd_source_selection() {
        let Command::Svd(args) = parse(&["dla", "svd"]) else {
            panic!("expected svd");
        };
        assert_eq!(svd_config_from_args(&args).source, SvdSource::Reference);

        let Command::Svd(args) = parse(&["dla", "svd", "--random", "6", "--seed", "9"]) else {
            panic!("expected svd");
        };
        assert_eq!(svd_config_from_args(&args).source, SvdSource::Random { n: 6, seed: 9 });
    }
}
