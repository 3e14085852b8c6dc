//! Bounded in-memory sink for the `log` facade, drained by front ends.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, OnceLock};

pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    fn from_record(record: &log::Record) -> Self {
        Self {
            level: record.level(),
            target: record.target().to_owned(),
            message: record.args().to_string(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:<5}] {}: {}", self.level, self.target, self.message)
    }
}

/// Most recent entries, oldest first. Evictions are counted.
pub struct LogRing {
    ring: VecDeque<LogEntry>,
    limit: usize,
    evicted: u64,
}

impl LogRing {
    /// A ring holding at most `limit` entries (at least one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self { ring: VecDeque::with_capacity(limit), limit, evicted: 0 }
    }

    /// Appends `entry`, returning whether the oldest one had to go.
    pub fn push(&mut self, entry: LogEntry) -> bool {
        let full = self.ring.len() == self.limit;
        if full {
            self.ring.pop_front();
            self.evicted += 1;
        }
        self.ring.push_back(entry);
        full
    }

    pub fn take(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.ring).into()
    }

    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.ring
    }

    /// Entries evicted since creation or the last [`reset`](Self::reset).
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn reset(&mut self) {
        self.ring.clear();
        self.evicted = 0;
    }
}

fn shared() -> &'static Mutex<LogRing> {
    static RING: OnceLock<Mutex<LogRing>> = OnceLock::new();
    RING.get_or_init(|| Mutex::new(LogRing::new(DEFAULT_CAPACITY)))
}

/// Runs `f` on the process-wide ring; a poisoned lock yields `None`.
fn with_shared<R>(f: impl FnOnce(&mut LogRing) -> R) -> Option<R> {
    shared().lock().ok().map(|mut ring| f(&mut ring))
}

/// `log::Log` front of the process-wide ring.
struct RingLogger;

impl log::Log for RingLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            with_shared(|ring| ring.push(LogEntry::from_record(record)));
        }
    }

    fn flush(&self) {}
}

/// Installs the ring logger. Fails if another logger is already set.
pub fn init_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    static LOGGER: RingLogger = RingLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

pub fn drain_logs() -> Vec<LogEntry> {
    with_shared(LogRing::take).unwrap_or_default()
}

pub fn dropped_logs() -> u64 {
    with_shared(|ring| ring.evicted()).unwrap_or_default()
}

pub fn clear_logs() {
    with_shared(LogRing::reset);
}
