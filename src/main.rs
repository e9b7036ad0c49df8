//! slack-send: send data to Slack from a GitHub Actions job
//!
//! Entry point for the slack-send application.

use slack_send::config::Cli;
use slack_send::runner::{ActionsRunner, Environment, Runner};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};
use run::RunError;

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let env = Environment::capture();
    let cli = Cli::parse_args();
    let runner = ActionsRunner::from_env(&env);

    setup_tracing(cli.verbose || runner.is_debug());

    run_application(&cli, &env, &runner)
}

/// Runs one invocation and maps its result to an exit code.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(cli: &Cli, env: &Environment, runner: &ActionsRunner) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            runner.set_failed(&format!("Failed to create Tokio runtime: {e}"));
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(cli, env, runner)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            runner.set_failed(&e.to_string());
            if let RunError::Config(config_error) = &e {
                print_config_hint(config_error);
            }
            if e.is_input_error() {
                exit_code::CONFIG_ERROR
            } else {
                exit_code::runtime_error()
            }
        }
    }
}
