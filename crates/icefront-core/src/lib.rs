use std::{io, path::PathBuf};

use thiserror::Error;

pub mod boards;
pub mod files;
pub mod flow;
pub mod hex;
pub mod layouts;
pub mod logger;
pub mod shell;

pub use boards::{BoardRecord, BoardRegistry};
pub use files::resolve_file_list;
pub use flow::{
    remove_artifact, run_commands, run_flow, CommandOutcome, RunConfig, Substitutions, STATS_COMMAND,
};
pub use hex::{tohex, write_hex};
pub use layouts::{LayoutIter, RomLayout};
pub use shell::{search_path_with_tools, CommandRunner, ShellCommand, SystemShell};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Failed to read board registry {}", .0.display())]
    FailedToReadConfig(PathBuf, #[source] io::Error),
    #[error("Failed to parse board registry")]
    FailedToParseConfig(#[source] serde_json::Error),
    #[error("unknown board type: {name}")]
    UnknownBoard { name: String, known: Vec<String> },
    #[error("Failed to open list file {}", .0.display())]
    FailedToOpenListFile(PathBuf, #[source] io::Error),
    #[error("Failed to remove {}", .0.display())]
    FailedToRemoveArtifact(PathBuf, #[source] io::Error),
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Input is {len} bytes, which does not fit in the {limit} byte image")]
    SizeExceeded { len: usize, limit: usize },
    #[error("Failed to read input")]
    FailedToRead(#[source] io::Error),
    #[error("Failed to write to output")]
    FailedToWrite(#[source] io::Error),
}
