//! GitHub Actions workflow commands.
//!
//! Plain lines show up in the step log, `::warning::` and `::error::` lines
//! additionally become annotations on the run summary.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Writes workflow commands to the CI log.
pub struct Annotations<W: Write> {
    out: W,
}

impl Annotations<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Annotations<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }

    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        self.command("notice", message)
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        self.command("warning", message)
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.command("error", message)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn command(&mut self, name: &str, message: &str) -> io::Result<()> {
        writeln!(self.out, "::{}::{}", name, escape_data(message))
    }
}

/// Escape message data the way the Actions toolkit does so multi-line
/// messages stay inside one command.
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Append `name=value` to the step output file (`GITHUB_OUTPUT`).
pub fn set_output(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open step output file {}", path.display()))?;
    writeln!(file, "{}={}", name, value)
        .with_context(|| format!("Failed to write step output {}", name))?;
    Ok(())
}
