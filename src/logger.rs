use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use time::macros::format_description;
use time::OffsetDateTime;

pub enum LogOutput {
    Stdout,
    Stderr,
}

/// Logger behind the `log` facade: colored console lines plus an optional plain log file
pub struct Logger {
    severity: Level,
    console: Option<LogOutput>,
    file: Option<Mutex<File>>,
    enable_colors: bool,
}

impl Logger {
    pub fn new(
        severity: Level,
        console: Option<LogOutput>,
        file_path: Option<PathBuf>,
        enable_colors: bool,
    ) -> Self {
        let file = file_path.and_then(|path| {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| eprintln!("dftr: cannot open log file {:?}: {}", path, e))
                .ok()
                .map(Mutex::new)
        });

        Logger { severity, console, file, enable_colors }
    }

    /// Install a logger configured from the environment.
    ///
    /// `DFTR_LOG` (or `RUST_LOG`) sets the level, `DFTR_LOG_FILE` names a file to
    /// append to, and `NO_COLOR` disables ANSI colors.
    pub fn init() -> Result<(), log::SetLoggerError> {
        let severity = std::env::var("DFTR_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::Info);
        let file_path = std::env::var_os("DFTR_LOG_FILE").map(PathBuf::from);
        let enable_colors = std::env::var_os("NO_COLOR").is_none();

        let logger = Logger::new(severity, Some(LogOutput::Stderr), file_path, enable_colors);
        log::set_max_level(LevelFilter::Trace);
        log::set_logger(Box::leak(Box::new(logger)))
    }

    fn timestamp() -> String {
        let now = OffsetDateTime::now_utc();
        now.format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_default()
    }

    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[36m",
            Level::Debug => "\x1b[35m",
            Level::Trace => "\x1b[37m",
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Self::timestamp();
        let level = record.level();
        let target = record.target();
        let args = record.args();
        let plain = format!("[{timestamp}] {level:<5} {target}: {args}\n");

        if let Some(console) = &self.console {
            let line = if self.enable_colors {
                let color = Self::color(level);
                format!("{color}[{timestamp}] {level:<5}\x1b[0m {target}: {args}\n")
            } else {
                plain.clone()
            };
            let _ = match console {
                LogOutput::Stdout => std::io::stdout().write_all(line.as_bytes()),
                LogOutput::Stderr => std::io::stderr().write_all(line.as_bytes()),
            };
        }

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(plain.as_bytes());
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}
