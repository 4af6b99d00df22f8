//! Logger for the command-line driver.
//!
//! Every record goes to stderr, and optionally to a log file. Each run gets a
//! short id so lines from several runs in one file can be told apart.

use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

pub struct CliLogger {
    level: LevelFilter,
    run_id: String,
    file: Option<Mutex<File>>,
}

impl CliLogger {
    pub fn new(level: LevelFilter, log_file: Option<&Path>) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid_string = Uuid::new_v4().to_string();
        let uuid = uuid_string.split('-').next().unwrap_or("unknown");
        let run_id = format!("{timestamp}_{uuid}");

        let file = match log_file {
            Some(path) => Some(Mutex::new(open_log_file(path)?)),
            None => None,
        };

        Ok(Self { level, run_id, file })
    }

    /// Install as the global logger.
    pub fn init(level: LevelFilter, log_file: Option<PathBuf>) -> Result<()> {
        let logger = Self::new(level, log_file.as_deref())?;
        let run_id = logger.run_id.clone();

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::info!("storyboard logger initialized. Run ID: {}", run_id);
        if let Some(path) = log_file {
            log::info!("Log file: {}", path.display());
        }
        Ok(())
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let message = format!(
            "{} {} {} [{}] {}",
            timestamp,
            self.run_id,
            record.level(),
            record.target(),
            record.args()
        );

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                // A failed log write must not take the run down with it.
                let _ = writeln!(file, "{}", message);
            }
        }
        eprintln!("{}", message);
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}
