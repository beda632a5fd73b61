use std::{env, str::FromStr, time::SystemTime};

use colored::{Color, Colorize};
use log::LevelFilter;

fn level_color(level: log::Level) -> Color {
    match level {
        log::Level::Error => Color::Red,
        log::Level::Warn => Color::Yellow,
        log::Level::Info => Color::Green,
        log::Level::Debug => Color::Blue,
        log::Level::Trace => Color::Magenta,
    }
}

/// Installs the global `fern` dispatcher writing to stdout.
///
/// The level comes from `RUST_LOG` (`info` when unset or unknown). hyper and
/// reqwest are capped at `warn`.
pub fn setup_logger() -> Result<(), fern::InitError> {
    let level = env::var("RUST_LOG")
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record
                    .level()
                    .to_string()
                    .color(level_color(record.level())),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
