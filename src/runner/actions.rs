//! GitHub Actions runner implementation.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Environment, Runner};

/// Environment variable naming the step output file.
pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Environment variable set to `1` when the run has debug logging enabled.
pub const DEBUG_VAR: &str = "RUNNER_DEBUG";

/// Runner that speaks the GitHub Actions workflow command protocol.
///
/// Masks, warnings and failures are written to stdout as `::command::`
/// lines. Outputs are appended to the file named by `GITHUB_OUTPUT`;
/// outside of Actions (no output file) they are printed as `name=value`.
#[derive(Debug, Clone, Default)]
pub struct ActionsRunner {
    output_file: Option<PathBuf>,
    debug: bool,
}

impl ActionsRunner {
    /// Creates a runner from the environment snapshot.
    #[must_use]
    pub fn from_env(env: &Environment) -> Self {
        Self {
            output_file: env.get(OUTPUT_FILE_VAR).map(PathBuf::from),
            debug: env.get(DEBUG_VAR) == Some("1"),
        }
    }

    /// Returns the configured output file, if any.
    #[must_use]
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    fn issue(command: &str, data: &str) {
        println!("{}", format_command(command, data));
    }
}

impl Runner for ActionsRunner {
    fn mask(&self, secret: &str) {
        Self::issue("add-mask", secret);
    }

    fn warning(&self, message: &str) {
        Self::issue("warning", message);
    }

    fn set_output(&self, name: &str, value: &str) -> std::io::Result<()> {
        let Some(path) = &self.output_file else {
            println!("{name}={value}");
            return Ok(());
        };

        let delimiter = format!("ghadelimiter_{:016x}", rand::random::<u64>());
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(format_output(name, value, &delimiter).as_bytes())
    }

    fn set_failed(&self, message: &str) {
        Self::issue("error", message);
    }

    fn is_debug(&self) -> bool {
        self.debug
    }
}

/// Escapes command data so it survives the single-line command format.
#[must_use]
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Formats a `::command::data` workflow command line.
pub(crate) fn format_command(command: &str, data: &str) -> String {
    format!("::{command}::{}", escape_data(data))
}

/// Formats a heredoc-style entry for the output file.
pub(crate) fn format_output(name: &str, value: &str, delimiter: &str) -> String {
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}
