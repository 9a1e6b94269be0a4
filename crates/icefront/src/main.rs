use std::{
    env,
    path::{Path, PathBuf},
};

use clap::Parser;
use icefront_core::{
    logger, run_flow, search_path_with_tools, BoardRegistry, FlowError, RunConfig, SystemShell,
};
use log::*;

const BOARDS_FILE: &str = "boards.json";
const PCF_DIR: &str = "pcf";

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Development board
    board: String,

    /// Source input files, `.f` list files are expanded
    #[clap(required = true)]
    files: Vec<PathBuf>,

    /// Increase output verbosity
    #[clap(short, long)]
    verbose: bool,

    /// Output file
    #[clap(short, long, default_value = "out.bin")]
    output: PathBuf,

    /// Top level module
    #[clap(short, long, default_value = "top")]
    top: String,

    /// Desired frequency constraint, overrides the board default
    #[clap(short, long)]
    speed: Option<String>,

    /// Path to the oss cad suite, its bin and lib directories are searched for tools
    #[clap(long)]
    tools: Option<PathBuf>,

    /// Only print synthesis statistics
    #[clap(long)]
    stats: bool,

    /// Board registry [default: boards.json next to the executable]
    #[clap(long)]
    boards: Option<PathBuf>,

    /// Pin constraint directory [default: pcf next to the executable]
    #[clap(long)]
    pcf_dir: Option<PathBuf>,
}

/// Directory holding the executable, where the registry and pin constraints are installed
fn install_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let exe = env::current_exe()?;
    Ok(exe.parent().unwrap_or_else(|| Path::new(".")).to_path_buf())
}

fn list_boards(known: &[String]) {
    info!("Supported boards:");
    for board in known {
        info!("  {}", board);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logger::init(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let boards_path = match cli.boards {
        Some(path) => path,
        None => install_dir()?.join(BOARDS_FILE),
    };
    let pcf_dir = match cli.pcf_dir {
        Some(path) => path,
        None => install_dir()?.join(PCF_DIR),
    };

    let search_path = match &cli.tools {
        Some(tools) => Some(search_path_with_tools(
            env::var_os("PATH").as_deref(),
            tools,
        )?),
        None => None,
    };

    let registry = BoardRegistry::load(&boards_path)?;
    debug!(
        "Loaded {} boards from {}",
        registry.len(),
        boards_path.display()
    );
    if registry.is_empty() {
        warn!("No boards defined in {}", boards_path.display());
    }

    let config = RunConfig {
        board: cli.board,
        output: cli.output,
        top: cli.top,
        speed: cli.speed,
        files: cli.files,
        pcf_dir,
        search_path,
        work_dir: None,
        stats: cli.stats,
    };

    match run_flow(&registry, &config, &mut SystemShell) {
        Ok(outcomes) => {
            let failed = outcomes.iter().filter(|o| !o.success()).count();
            if failed > 0 {
                warn!("{} of {} commands failed", failed, outcomes.len());
            }
            Ok(())
        }
        Err(FlowError::UnknownBoard { name, known }) => {
            info!("unknown board type: {}", name);
            list_boards(&known);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
