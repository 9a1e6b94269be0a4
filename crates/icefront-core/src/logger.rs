use std::io::Write;

use env_logger::{Builder, Env};
use log::{Level, LevelFilter};

/// Logs to stdout. Info records are printed bare so the command trace reads
/// like a shell transcript, everything else gets a level prefix.
///
/// `level` is the default; `RUST_LOG` overrides it when set.
pub fn init(level: LevelFilter) {
    let mut builder = builder(level);
    builder.parse_env(Env::default());
    builder.init();
}

fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            let level = record.level();
            if level == Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "{}: {}", record.level(), record.args())
            }
        });
    builder
}
