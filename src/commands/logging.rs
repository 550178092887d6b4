//! Persistent file logging for the overlay.
//!
//! Backend code logs through the `log` facade (console via `env_logger`);
//! passthrough lifecycle events and frontend messages are additionally
//! written to a daily file with size-based rotation.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tauri::{command, AppHandle, Manager};

use crate::error::{ClickThroughResult, ResultExt};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

const LOG_PREFIX: &str = "clickthrough";

lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
    static ref LOG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Log levels matching frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl LogLevel {
    /// Parse a frontend level name. Unknown names map to Info.
    pub fn parse(level: &str) -> Self {
        match level.to_lowercase().as_str() {
            "debug" | "trace" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    fn to_log_level(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Initialize the logging system
pub fn init_logging(app: &AppHandle) -> ClickThroughResult<()> {
    let log_dir = app
        .path()
        .app_log_dir()
        .context("Failed to get log directory")?;

    fs::create_dir_all(&log_dir)?;

    if let Ok(mut dir) = LOG_DIR.lock() {
        *dir = Some(log_dir.clone());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(current_log_path(&log_dir))?;

    if let Ok(mut log_file) = LOG_FILE.lock() {
        *log_file = Some(file);
    }

    log_internal(LogLevel::Info, "clickthrough", "Logging system initialized");
    log_internal(
        LogLevel::Info,
        "clickthrough",
        &format!("Log directory: {:?}", log_dir),
    );

    cleanup_old_logs(&log_dir);

    Ok(())
}

/// Get the path for the current log file (one per day)
fn current_log_path(log_dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    log_dir.join(format!("{}_{}.log", LOG_PREFIX, date))
}

/// Keep only the most recent MAX_LOG_FILES log files
fn cleanup_old_logs(log_dir: &Path) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "log")
                    .unwrap_or(false)
            })
            .collect();

        // Newest first
        log_files.sort_by(|a, b| {
            let a_time = a.metadata().and_then(|m| m.modified()).ok();
            let b_time = b.metadata().and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time)
        });

        for file in log_files.into_iter().skip(MAX_LOG_FILES) {
            let _ = fs::remove_file(file.path());
        }
    }
}

/// Rotate the current file once it grows past MAX_LOG_SIZE
fn check_rotation() {
    let log_dir = match LOG_DIR.lock() {
        Ok(dir) => match dir.as_ref() {
            Some(d) => d.clone(),
            None => return,
        },
        Err(_) => return,
    };

    let current_path = current_log_path(&log_dir);
    let Ok(metadata) = fs::metadata(&current_path) else {
        return;
    };
    if metadata.len() <= MAX_LOG_SIZE {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
    let rotated_path = log_dir.join(format!("{}_{}.log", LOG_PREFIX, timestamp));
    let _ = fs::rename(&current_path, &rotated_path);

    if let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&current_path)
    {
        if let Ok(mut log_file) = LOG_FILE.lock() {
            *log_file = Some(file);
        }
    }

    cleanup_old_logs(&log_dir);
}

fn format_line(level: LogLevel, source: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] [{}] [{}] {}\n", timestamp, level, source, message)
}

/// Write one line to the log file and mirror it to the `log` facade.
pub fn log_internal(level: LogLevel, source: &str, message: &str) {
    let log_line = format_line(level, source, message);

    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(ref mut file) = *log_file {
            let _ = file.write_all(log_line.as_bytes());
            let _ = file.flush();
        }
    }

    log::log!(level.to_log_level(), "[{}] {}", source, message);

    check_rotation();
}

/// Log from Rust code
#[macro_export]
macro_rules! app_log {
    ($level:expr, $source:expr, $($arg:tt)*) => {
        $crate::commands::logging::log_internal($level, $source, &format!($($arg)*))
    };
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Write a log message from the frontend
#[command]
pub fn write_log(level: String, source: String, message: String) {
    log_internal(LogLevel::parse(&level), &source, &message);
}

/// Write multiple log messages from the frontend (batch)
#[command]
pub fn write_logs(logs: Vec<(String, String, String)>) {
    for (level, source, message) in logs {
        write_log(level, source, message);
    }
}

/// Get the log directory path
#[command]
pub fn get_log_dir(app: AppHandle) -> ClickThroughResult<String> {
    let log_dir = app
        .path()
        .app_log_dir()
        .context("Failed to get log directory")?;

    Ok(log_dir.to_string_lossy().to_string())
}

/// Get recent logs (last N lines) for debugging
#[command]
pub fn get_recent_logs(app: AppHandle, lines: Option<usize>) -> ClickThroughResult<String> {
    let log_dir = app
        .path()
        .app_log_dir()
        .context("Failed to get log directory")?;

    let log_path = current_log_path(&log_dir);
    if !log_path.exists() {
        return Ok(String::new());
    }

    let content = fs::read_to_string(&log_path)?;
    Ok(tail_lines(&content, lines.unwrap_or(100)))
}

fn tail_lines(content: &str, max_lines: usize) -> String {
    let recent: Vec<&str> = content.lines().rev().take(max_lines).collect();
    recent.into_iter().rev().collect::<Vec<_>>().join("\n")
}
