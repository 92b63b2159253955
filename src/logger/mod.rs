use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Coloured `HH:MM:SS.mmm - LEVEL - message` lines. Progress goes to stdout,
/// warnings and errors to stderr.
pub struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format_line(record.level(), &get_formatted_time(), record.args());
            if record.level() <= Level::Warn {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }

    fn flush(&self) {}
}

static LOGGER: SimpleLogger = SimpleLogger;

pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// `--quiet` wins over `--verbose`.
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn format_line(level: Level, timestamp: &str, message: &std::fmt::Arguments) -> String {
    let (color_code, reset_code) = get_color_codes(level);
    format!(
        "{}{} - {} - {}{}",
        color_code, timestamp, level, message, reset_code
    )
}

fn get_formatted_time() -> String {
    let millis_since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let secs = millis_since_epoch / 1000;
    let millis = millis_since_epoch % 1000;

    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

fn get_color_codes(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::Error => ("\x1b[31m", "\x1b[0m"), // Red
        Level::Warn => ("\x1b[33m", "\x1b[0m"),  // Yellow
        Level::Info => ("\x1b[32m", "\x1b[0m"),  // Green
        Level::Debug => ("\x1b[36m", "\x1b[0m"), // Cyan
        Level::Trace => ("\x1b[35m", "\x1b[0m"), // Magenta
    }
}
