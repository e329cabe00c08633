use std::process::ExitCode;

use env_logger::{Builder, Env};

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("warn")).init();

    match densela::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
