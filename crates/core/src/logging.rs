//! Centralized logging configuration for the video subsystem.
//!
//! - **LogConfig**: process-wide configuration held in atomics
//! - **LogLevel**: Off < Error < Warn < Info < Debug < Trace
//! - **LogCategory**: Driver, Modes, Memory, Events, Stubs
//! - **log()**: lazily formatted, rate limited output to stderr or a file
//!
//! File output goes through a background writer thread so a slow disk never
//! stalls a mode set.
//!
//! ```rust
//! use vid_core::logging::{log, LogCategory, LogLevel};
//!
//! log(LogCategory::Modes, LogLevel::Debug, || {
//!     format!("set mode {}x{}", 640, 480)
//! });
//! ```

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse a level name or digit, case-insensitively.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Driver selection, init and shutdown
    Driver,
    /// Mode enumeration and mode sets
    Modes,
    /// Framebuffer allocation and release
    Memory,
    /// Input collaborator calls
    Events,
    /// Operations the driver declares unsupported
    Stubs,
}

const CATEGORY_COUNT: usize = 5;

impl LogCategory {
    pub const ALL: [LogCategory; CATEGORY_COUNT] = [
        LogCategory::Driver,
        LogCategory::Modes,
        LogCategory::Memory,
        LogCategory::Events,
        LogCategory::Stubs,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding a logging lock leaves nothing worth protecting.
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Per-category sliding-window limiter.
struct RateLimiter {
    max_per_second: AtomicUsize,
    window: Duration,
    state: Mutex<[WindowState; CATEGORY_COUNT]>,
}

#[derive(Default)]
struct WindowState {
    stamps: VecDeque<Instant>,
    dropped: usize,
    last_report: Option<Instant>,
}

impl RateLimiter {
    fn new(max_per_second: usize) -> Self {
        Self {
            max_per_second: AtomicUsize::new(max_per_second),
            window: Duration::from_secs(1),
            state: Mutex::new(Default::default()),
        }
    }

    /// Returns whether this message may be written, and how many messages
    /// were dropped since the last report if it is time to say so.
    fn should_allow(&self, category: LogCategory) -> (bool, Option<usize>) {
        let now = Instant::now();
        let max = self.max_per_second.load(Ordering::Relaxed);
        let mut state = lock(&self.state);
        let w = &mut state[category.index()];

        while let Some(&front) = w.stamps.front() {
            if now.duration_since(front) > self.window {
                w.stamps.pop_front();
            } else {
                break;
            }
        }

        if w.stamps.len() < max {
            w.stamps.push_back(now);
            if w.dropped > 0 {
                let dropped = std::mem::take(&mut w.dropped);
                w.last_report = Some(now);
                return (true, Some(dropped));
            }
            return (true, None);
        }

        w.dropped += 1;
        let due = w
            .last_report
            .map_or(true, |last| now.duration_since(last) >= self.window);
        if due {
            w.last_report = Some(now);
            (false, Some(std::mem::take(&mut w.dropped)))
        } else {
            (false, None)
        }
    }
}

pub struct LogConfig {
    global_level: AtomicU8,
    levels: [AtomicU8; CATEGORY_COUNT],
    sender: Mutex<Option<Sender<String>>>,
    to_file: AtomicBool,
    limiter: RateLimiter,
}

impl LogConfig {
    /// Everything off, 60 messages per second per category.
    fn new() -> Self {
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            levels: Default::default(),
            sender: Mutex::new(None),
            to_file: AtomicBool::new(false),
            limiter: RateLimiter::new(60),
        }
    }

    pub fn global() -> &'static Self {
        static INSTANCE: OnceLock<LogConfig> = OnceLock::new();
        INSTANCE.get_or_init(LogConfig::new)
    }

    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.levels[category.index()].store(level as u8, Ordering::Relaxed);
    }

    pub fn get_level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.levels[category.index()].load(Ordering::Relaxed))
    }

    /// A category level other than `Off` overrides the global level.
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        if level == LogLevel::Off {
            return false;
        }
        match self.get_level(category) {
            LogLevel::Off => level <= self.get_global_level(),
            own => level <= own,
        }
    }

    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for category in LogCategory::ALL {
            self.set_level(category, LogLevel::Off);
        }
    }

    pub fn set_rate_limit(&self, max_logs_per_second: usize) {
        self.limiter
            .max_per_second
            .store(max_logs_per_second, Ordering::Relaxed);
    }

    pub fn get_rate_limit(&self) -> usize {
        self.limiter.max_per_second.load(Ordering::Relaxed)
    }

    /// Append log output to `path` from a background writer thread.
    pub fn set_log_file(&self, path: PathBuf) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let (tx, rx) = channel::<String>();

        thread::Builder::new()
            .name("vid-log-writer".to_string())
            .spawn(move || {
                while let Ok(line) = rx.recv() {
                    let _ = writeln!(file, "{}", line);
                    let _ = file.flush();
                }
            })?;

        *lock(&self.sender) = Some(tx);
        self.to_file.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// Stop file output; the writer thread exits once its channel closes.
    pub fn clear_log_file(&self) {
        *lock(&self.sender) = None;
        self.to_file.store(false, Ordering::Relaxed);
    }

    fn write_message(&self, message: String) {
        if self.to_file.load(Ordering::Relaxed) {
            if let Some(tx) = lock(&self.sender).as_ref() {
                match tx.send(message) {
                    Ok(()) => return,
                    Err(e) => {
                        eprintln!("{}", e.0);
                        return;
                    }
                }
            }
        }
        eprintln!("{}", message);
    }
}

/// Log a lazily built message under `category` at `level`.
///
/// The closure only runs when the level is enabled and the category is
/// under its rate limit.
pub fn log<F>(category: LogCategory, level: LogLevel, message_fn: F)
where
    F: FnOnce() -> String,
{
    let config = LogConfig::global();
    if !config.should_log(category, level) {
        return;
    }

    let (allowed, dropped) = config.limiter.should_allow(category);
    if let Some(count) = dropped.filter(|&n| n > 0) {
        config.write_message(format!(
            "[{:?}] WARNING: rate limit exceeded, {} message(s) dropped in the last second",
            category, count
        ));
    }
    if allowed {
        config.write_message(message_fn());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!(LogLevel::from_str("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("ERR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("Warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("3"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str("loud"), None);
    }

    #[test]
    fn level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn category_level_overrides_global() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Error);
        config.set_level(LogCategory::Memory, LogLevel::Debug);

        assert!(config.should_log(LogCategory::Memory, LogLevel::Debug));
        assert!(!config.should_log(LogCategory::Modes, LogLevel::Warn));
        assert!(config.should_log(LogCategory::Modes, LogLevel::Error));
    }

    #[test]
    fn off_messages_never_log() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Trace);
        assert!(!config.should_log(LogCategory::Driver, LogLevel::Off));
    }

    #[test]
    fn reset_turns_everything_off() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Trace);
        config.set_level(LogCategory::Events, LogLevel::Info);
        config.reset();

        assert_eq!(config.get_global_level(), LogLevel::Off);
        for category in LogCategory::ALL {
            assert_eq!(config.get_level(category), LogLevel::Off);
        }
    }

    #[test]
    fn rate_limit_is_adjustable() {
        let config = LogConfig::new();
        assert_eq!(config.get_rate_limit(), 60);
        config.set_rate_limit(5);
        assert_eq!(config.get_rate_limit(), 5);
    }

    #[test]
    fn limiter_blocks_per_category() {
        let limiter = RateLimiter::new(3);
        for _ in 0..3 {
            assert!(limiter.should_allow(LogCategory::Modes).0);
        }
        assert!(!limiter.should_allow(LogCategory::Modes).0);
        assert!(limiter.should_allow(LogCategory::Memory).0);
    }

    #[test]
    fn limiter_reports_drops_after_window() {
        let limiter = RateLimiter::new(2);
        limiter.should_allow(LogCategory::Driver);
        limiter.should_allow(LogCategory::Driver);

        // First drop is reported immediately, the next four accumulate.
        assert_eq!(limiter.should_allow(LogCategory::Driver), (false, Some(1)));
        for _ in 0..4 {
            assert_eq!(limiter.should_allow(LogCategory::Driver), (false, None));
        }

        thread::sleep(Duration::from_millis(1100));
        assert_eq!(limiter.should_allow(LogCategory::Driver), (true, Some(4)));
    }

    #[test]
    fn log_file_receives_messages() {
        let path = std::env::temp_dir().join(format!("vid_core_log_{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = LogConfig::new();
        config.set_log_file(path.clone()).unwrap();
        config.write_message("hello framebuffer".to_string());
        config.clear_log_file();

        // The writer drains the channel before exiting.
        let mut contents = String::new();
        for _ in 0..50 {
            contents = std::fs::read_to_string(&path).unwrap_or_default();
            if !contents.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        assert!(contents.contains("hello framebuffer"));
        let _ = std::fs::remove_file(&path);
    }
}
