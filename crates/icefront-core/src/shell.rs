//! Execution of opaque shell commands.
//!
//! Board command templates are written in shell syntax (quoted yosys scripts,
//! redirections), so after substitution each one is handed whole to the
//! platform command interpreter. This is the only place that spawns
//! processes.

use std::{
    env,
    ffi::{OsStr, OsString},
    io,
    path::{Path, PathBuf},
    process::Command,
};

/// A fully substituted command line plus the environment it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub command: String,
    /// Replacement for `PATH` in the child only
    pub search_path: Option<OsString>,
    pub work_dir: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            search_path: None,
            work_dir: None,
        }
    }

    fn to_command(&self) -> Command {
        // cmd.exe does not understand the backslash escaping `arg` applies to
        // embedded quotes, so the command line is passed through untouched
        #[cfg(windows)]
        let mut cmd = {
            use std::os::windows::process::CommandExt;

            let mut cmd = Command::new("cmd");
            cmd.arg("/C").raw_arg(&self.command);
            cmd
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        };

        if let Some(path) = &self.search_path {
            cmd.env("PATH", path);
        }
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

/// Runs shell commands to completion, one at a time.
pub trait CommandRunner {
    /// Returns the exit code, or `None` if the process was killed by a signal.
    fn run(&mut self, command: &ShellCommand) -> io::Result<Option<i32>>;
}

/// Runs commands through the real system shell, inheriting stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl CommandRunner for SystemShell {
    fn run(&mut self, command: &ShellCommand) -> io::Result<Option<i32>> {
        let status = command.to_command().status()?;
        Ok(status.code())
    }
}

/// Appends `<tools>/bin` and `<tools>/lib` to the search path `current`.
pub fn search_path_with_tools(
    current: Option<&OsStr>,
    tools: &Path,
) -> Result<OsString, env::JoinPathsError> {
    let mut paths: Vec<PathBuf> = match current {
        Some(current) => env::split_paths(current).collect(),
        None => Vec::new(),
    };
    paths.push(tools.join("bin"));
    paths.push(tools.join("lib"));

    env::join_paths(paths)
}
