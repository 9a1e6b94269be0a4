use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use log::*;

use crate::{
    boards::{BoardRecord, BoardRegistry},
    files::resolve_file_list,
    shell::{CommandRunner, ShellCommand},
    FlowError,
};

/// Synthesis output consumed by place and route
pub const JSON_ARTIFACT: &str = "temp.json";
/// Place and route output consumed by the bitstream packer
pub const ASC_ARTIFACT: &str = "temp.asc";
/// Scratch file abc leaves behind during synthesis
pub const HISTORY_ARTIFACT: &str = "abc.history";

/// Replaces the board's command list when only statistics are wanted.
pub const STATS_COMMAND: &str = "yosys -p \"synth_ice40 -top %top%\" -p \"stat\" %files%";

const LINE_BREAK_WIDTH: usize = 79;

/// Everything a single run needs besides the board record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub board: String,
    pub output: PathBuf,
    pub top: String,
    /// Overrides the board's default clock constraint
    pub speed: Option<String>,
    pub files: Vec<PathBuf>,
    /// Directory holding the pin constraint files named by the registry
    pub pcf_dir: PathBuf,
    /// `PATH` handed to every command, already extended with the tool directories
    pub search_path: Option<OsString>,
    /// Directory the commands run in. Intermediate artifacts and relative
    /// output paths live here. Defaults to the current directory.
    pub work_dir: Option<PathBuf>,
    pub stats: bool,
}

impl RunConfig {
    pub fn new(board: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            board: board.into(),
            output: PathBuf::from("out.bin"),
            top: "top".to_string(),
            speed: None,
            files,
            pcf_dir: PathBuf::from("pcf"),
            search_path: None,
            work_dir: None,
            stats: false,
        }
    }

    fn in_work_dir(&self, path: &Path) -> PathBuf {
        match &self.work_dir {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }

    fn shell_command(&self, command: String) -> ShellCommand {
        ShellCommand {
            search_path: self.search_path.clone(),
            work_dir: self.work_dir.clone(),
            ..ShellCommand::new(command)
        }
    }
}

/// Placeholder token to value mapping for one run.
///
/// Tokens whose value is unknown (a field missing from the board record) are
/// left out, so they pass through [`Substitutions::apply`] untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    entries: Vec<(&'static str, String)>,
}

impl Substitutions {
    pub fn new(board: &BoardRecord, config: &RunConfig, files: &[PathBuf]) -> Self {
        let mut entries = Vec::new();

        if let Some(package) = &board.package {
            entries.push(("%package%", package.clone()));
        }
        if let Some(device) = &board.device {
            entries.push(("%device%", device.clone()));
        }
        if let Some(speed) = speed_target(board, config) {
            entries.push(("%speed%", speed));
        }
        if let Some(pcf) = &board.pcf {
            entries.push(("%pcf%", path_text(&config.pcf_dir.join(pcf))));
        }
        entries.push(("%json%", JSON_ARTIFACT.to_string()));
        entries.push(("%asc%", ASC_ARTIFACT.to_string()));
        entries.push(("%bin%", path_text(&config.output)));
        entries.push(("%top%", config.top.clone()));

        let files: Vec<String> = files.iter().map(|f| path_text(f)).collect();
        entries.push(("%files%", files.join(" ")));

        Self { entries }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Literal replacement of every known token. No quoting is applied.
    pub fn apply(&self, template: &str) -> String {
        self.entries
            .iter()
            .fold(template.to_string(), |cmd, (token, value)| {
                cmd.replace(token, value)
            })
    }
}

fn speed_target(board: &BoardRecord, config: &RunConfig) -> Option<String> {
    config
        .speed
        .clone()
        .or_else(|| board.speed.as_ref().map(ToString::to_string))
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Result of one command of the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    /// `None` if the shell could not be started or the process died from a signal
    pub code: Option<i32>,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Deletes `path`. Returns `false` if there was nothing to delete.
pub fn remove_artifact(path: &Path) -> Result<bool, FlowError> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("removing {}", path.display());
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(FlowError::FailedToRemoveArtifact(path.to_path_buf(), err)),
    }
}

fn remove_artifacts(config: &RunConfig, paths: &[&Path]) -> Result<(), FlowError> {
    for path in paths {
        remove_artifact(&config.in_work_dir(path))?;
    }
    Ok(())
}

fn line_break() {
    info!("{}", "-".repeat(LINE_BREAK_WIDTH));
}

/// Runs `commands` for `board` one after another.
///
/// A command that fails, or that cannot be started at all, is logged and the
/// remaining commands still run. Some tools in the chain exit non-zero on
/// warnings.
pub fn run_commands<S: AsRef<str>>(
    board: &BoardRecord,
    config: &RunConfig,
    commands: &[S],
    runner: &mut dyn CommandRunner,
) -> Result<Vec<CommandOutcome>, FlowError> {
    remove_artifacts(
        config,
        &[
            Path::new(JSON_ARTIFACT),
            Path::new(ASC_ARTIFACT),
            &config.output,
        ],
    )?;

    let files = resolve_file_list(&config.files)?;
    debug!("Input files: {:?}", files);

    let substitutions = Substitutions::new(board, config, &files);
    debug!("Substitutions: {:?}", substitutions);

    match substitutions.get("%speed%") {
        Some(speed) => info!("targeting speed {}", speed),
        None => warn!("No speed target for board {}", config.board),
    }

    let mut outcomes = Vec::with_capacity(commands.len());
    for template in commands {
        let command = substitutions.apply(template.as_ref());
        info!("{}", command);

        let code = match runner.run(&config.shell_command(command.clone())) {
            Ok(Some(code)) => {
                info!("return code: {}", code);
                Some(code)
            }
            Ok(None) => {
                warn!("return code: none, terminated by signal");
                None
            }
            Err(err) => {
                error!("Failed to start command: {}", err);
                None
            }
        };
        line_break();

        outcomes.push(CommandOutcome { command, code });
    }

    remove_artifacts(
        config,
        &[
            Path::new(JSON_ARTIFACT),
            Path::new(ASC_ARTIFACT),
            Path::new(HISTORY_ARTIFACT),
        ],
    )?;

    Ok(outcomes)
}

/// Looks up the configured board and runs its command list, or the single
/// statistics command when `config.stats` is set.
pub fn run_flow(
    registry: &BoardRegistry,
    config: &RunConfig,
    runner: &mut dyn CommandRunner,
) -> Result<Vec<CommandOutcome>, FlowError> {
    let board = registry.get(&config.board)?;

    if config.stats {
        run_commands(board, config, &[STATS_COMMAND], runner)
    } else {
        run_commands(board, config, &board.cmd, runner)
    }
}
