//! Rolling Logger
//!
//! A `tracing` subscriber that writes formatted lines to `<app>.log`, rolls
//! the file over to `<app>.log.1` once it grows past a byte limit, and keeps
//! the most recent lines in memory so a diagnostics screen can show them
//! without touching the filesystem.
//!
//! `log` records are bridged into the same output through
//! tracing-subscriber's `tracing-log` integration.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Default size before the log file rolls over
pub const DEFAULT_MAX_BYTES: u64 = 2 * 1024 * 1024;
/// Default number of lines kept in memory
pub const DEFAULT_BUFFER_LINES: usize = 500;

static GLOBAL: OnceLock<LoggerHandle> = OnceLock::new();

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub app_name: String,
    pub max_bytes: u64,
    pub buffer_lines: usize,
    pub level: Level,
}

impl LoggerConfig {
    pub fn new(log_dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            log_dir: log_dir.into(),
            app_name: app_name.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
            buffer_lines: DEFAULT_BUFFER_LINES,
            level: Level::INFO,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.app_name))
    }
}

struct RollingState {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    lines: VecDeque<String>,
    capacity: usize,
    partial: String,
}

impl RollingState {
    fn open(path: &Path) -> io::Result<(File, u64)> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let written = file.metadata()?.len();
        Ok((file, written))
    }

    fn roll(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let mut rolled = self.path.clone().into_os_string();
        rolled.push(".1");
        let rolled = PathBuf::from(rolled);
        if rolled.exists() {
            fs::remove_file(&rolled)?;
        }
        fs::rename(&self.path, &rolled)?;
        let (file, written) = Self::open(&self.path)?;
        self.file = file;
        self.written = written;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
            }
            self.lines.push_back(line.trim_end().to_string());
        }
    }
}

/// Cloneable writer shared by every formatted event
#[derive(Clone)]
pub struct RollingWriter {
    state: Arc<Mutex<RollingState>>,
}

impl RollingWriter {
    pub fn open(config: &LoggerConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.log_dir)?;
        let path = config.log_path();
        let (file, written) = RollingState::open(&path)?;
        Ok(Self {
            state: Arc::new(Mutex::new(RollingState {
                path,
                file,
                written,
                max_bytes: config.max_bytes,
                lines: VecDeque::with_capacity(config.buffer_lines.min(DEFAULT_BUFFER_LINES)),
                capacity: config.buffer_lines.max(1),
                partial: String::new(),
            })),
        })
    }

    /// Snapshot of the buffered lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.lines.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().lines.iter().cloned().collect(),
        }
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        if state.written > 0 && state.written + buf.len() as u64 > state.max_bytes {
            state.roll()?;
        }
        state.file.write_all(buf)?;
        state.written += buf.len() as u64;
        state.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Local wall-clock timestamps, millisecond precision
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Handle to an installed logger
#[derive(Clone)]
pub struct LoggerHandle {
    writer: RollingWriter,
    path: PathBuf,
}

impl LoggerHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn recent_lines(&self) -> Vec<String> {
        self.writer.recent_lines()
    }
}

/// Build a subscriber without installing it (tests use `with_default`)
pub fn build_subscriber(
    config: &LoggerConfig,
) -> Result<(impl tracing::Subscriber + Send + Sync, LoggerHandle), String> {
    let writer =
        RollingWriter::open(config).map_err(|e| format!("Failed to open log file: {}", e))?;
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_max_level(config.level)
        .finish();
    let handle = LoggerHandle { writer, path: config.log_path() };
    Ok((subscriber, handle))
}

/// Install the rolling logger as the global default
pub fn init(config: LoggerConfig) -> Result<LoggerHandle, String> {
    if let Some(handle) = GLOBAL.get() {
        return Ok(handle.clone());
    }
    let writer =
        RollingWriter::open(&config).map_err(|e| format!("Failed to open log file: {}", e))?;
    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_max_level(config.level)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    let handle = LoggerHandle { writer, path: config.log_path() };
    let _ = GLOBAL.set(handle.clone());
    Ok(handle)
}

/// Install with default limits at INFO level
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<LoggerHandle, String> {
    init(LoggerConfig::new(log_dir, app_name))
}

/// Lines buffered by the global logger (empty before `init`)
pub fn recent_lines() -> Vec<String> {
    GLOBAL.get().map(LoggerHandle::recent_lines).unwrap_or_default()
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::error!("{}", msg);
    Ok(())
}

fn ensure_initialized() -> Result<(), String> {
    if GLOBAL.get().is_some() {
        Ok(())
    } else {
        Err("Logger not initialized".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_rolls_over_at_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LoggerConfig::new(dir.path(), "Rolls");
        config.max_bytes = 64;
        let mut writer = RollingWriter::open(&config).unwrap();

        writer.write_all(&[b'a'; 40]).unwrap();
        writer.write_all(b"\n").unwrap();
        writer.write_all(&[b'b'; 40]).unwrap();
        writer.write_all(b"\n").unwrap();
        writer.flush().unwrap();

        let rolled = fs::read_to_string(dir.path().join("Rolls.log.1")).unwrap();
        let current = fs::read_to_string(dir.path().join("Rolls.log")).unwrap();
        assert!(rolled.starts_with("aaaa"));
        assert!(current.starts_with("bbbb"));
    }

    #[test]
    fn test_buffer_keeps_last_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LoggerConfig::new(dir.path(), "Ring");
        config.buffer_lines = 2;
        let mut writer = RollingWriter::open(&config).unwrap();

        writer.write_all(b"one\ntwo\nthr").unwrap();
        writer.write_all(b"ee\n").unwrap();
        assert_eq!(writer.recent_lines(), vec!["two".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_subscriber_formats_events_into_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig::new(dir.path(), "Scoped").with_level(Level::DEBUG);
        let (subscriber, handle) = build_subscriber(&config).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(item = 7, "drag started");
            tracing::trace!("filtered out");
        });

        let lines = handle.recent_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("DEBUG"));
        assert!(lines[0].contains("drag started"));
        assert!(lines[0].contains("item=7"));
        assert!(handle.path().exists());
    }

    #[test]
    fn test_global_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let handle = init_logger(dir.path().to_path_buf(), "Global").unwrap();
        info("bridged through log").unwrap();
        assert!(handle.recent_lines().iter().any(|l| l.contains("bridged through log")));
        assert!(!recent_lines().is_empty());
    }
}
