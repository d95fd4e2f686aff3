//! External command execution.
//!
//! Used for the template regeneration step: the configured command runs in
//! the project root, its output is captured, and a non-zero exit becomes an
//! error carrying both streams.
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! Cmd::from_slice(&["templ", "generate"]).cwd(root).run()?;
//! ```

use crate::log;
use anyhow::{Context, Result, bail};
use regex::Regex;
use std::{
    env,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
    sync::LazyLock,
};

/// Command builder for external process execution.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Cmd {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g. `["templ", "generate"]`).
    ///
    /// The first element is the program, the rest are arguments.
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        Self::new(program).args(iter)
    }

    /// Add arguments, skipping empty ones.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|a| a.as_ref().to_owned())
                .filter(|a| !a.is_empty()),
        );
        self
    }

    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Bare names search `PATH`; relative paths like `./gen.sh` resolve
    /// against the working directory the command will run in.
    fn resolve_program(&self) -> which::Result<PathBuf> {
        match &self.cwd {
            Some(dir) => which::which_in(&self.program, env::var_os("PATH"), dir),
            None => which::which(&self.program),
        }
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Run to completion, capturing stdout and stderr.
    ///
    /// Fails when the program cannot be found, cannot be spawned, or exits
    /// with a non-zero status.
    pub fn run(self) -> Result<Output> {
        let name = self.program_name();
        if name.is_empty() {
            bail!("empty command");
        }

        let program = self
            .resolve_program()
            .with_context(|| format!("`{name}` not found in PATH"))?;

        let mut cmd = Command::new(program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        if !output.status.success() {
            bail!(format_error(&name, &output));
        }

        log_stderr(&name, &output);
        Ok(output)
    }
}

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\x1b\[[0-9;]*m").expect("ansi pattern is valid")
    });
    RE.replace_all(s, "")
}

/// Forward non-empty stderr lines of a successful run (tools often print
/// progress there).
fn log_stderr(name: &str, output: &Output) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<_> = stderr
        .lines()
        .map(strip_ansi)
        .filter(|l| !l.trim().is_empty())
        .collect();

    if !lines.is_empty() {
        log!(name; "{}", lines.join("\n"));
    }
}

/// Format error message for a failed command.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}", output.status);

    let stderr = strip_ansi(stderr.trim());
    if !stderr.is_empty() {
        msg.push('\n');
        msg.push_str(&stderr);
    }

    let stdout = strip_ansi(stdout.trim());
    if !stdout.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(&stdout);
    }
    msg
}
