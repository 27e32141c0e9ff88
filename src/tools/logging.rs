use colored::Colorize;
use log::{Level, LevelFilter};
use std::io::Write;

fn level_color(level: Level) -> colored::Color {
    match level {
        Level::Trace => colored::Color::BrightBlack,
        Level::Debug => colored::Color::Cyan,
        Level::Info => colored::Color::Green,
        Level::Warn => colored::Color::Yellow,
        Level::Error => colored::Color::Red,
    }
}

/// Map `-v`/`-q` counts onto a level filter. Quiet wins.
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger. `RUST_LOG` overrides the CLI level.
pub fn init(verbosity: u8, quiet: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for(verbosity, quiet))
        .parse_default_env()
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "[{}] {} {}",
                level.as_str().color(level_color(level)),
                record.target().dimmed(),
                record.args()
            )
        });

    // A second init (tests) is harmless.
    let _ = builder.try_init();
}
