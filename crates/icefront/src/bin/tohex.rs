use std::{
    fs::{self, File},
    io::BufReader,
    path::PathBuf,
};

use clap::Parser;
use icefront_core::{layouts::LayoutIter, logger, tohex};
use log::*;

#[derive(Parser, Debug)]
#[clap(version, long_about = None)]
#[clap(about = "Convert a binary into a hex ROM image, one byte per line")]
struct Cli {
    /// Input binary
    input: PathBuf,

    /// Output hex file
    output: PathBuf,

    /// ROM layout (plain, bios, bootrom, diskrom)
    #[clap(short, long, value_parser = layout_parser, default_value = "plain")]
    layout: String,

    /// Increase output verbosity
    #[clap(short, long)]
    verbose: bool,
}

fn layout_parser(s: &str) -> Result<String, String> {
    if let Some(layout) = LayoutIter::find_by_name(s) {
        Ok(layout.name().to_string())
    } else {
        let known: Vec<_> = LayoutIter::new().map(|l| l.name()).collect();
        Err(format!("Unknown layout '{}', expected one of {}", s, known.join(", ")))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logger::init(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    let layout = LayoutIter::find_by_name(&cli.layout)
        .expect("This already has been verified by layout_parser");

    let input = BufReader::new(File::open(&cli.input)?);
    let output = File::create(&cli.output)?;

    if let Err(err) = tohex(input, output, layout.as_ref()) {
        fs::remove_file(&cli.output)?;
        return Err(Box::new(err));
    }

    Ok(())
}
