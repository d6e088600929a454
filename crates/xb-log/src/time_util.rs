//! Clocks, timestamp formats and thread tags used in log records.
//!
//! Record preambles carry a second-precision local timestamp; file names carry
//! the ISO-8601 basic form of the time the file was named. Rotation compares
//! local calendar days, so every clock here speaks `DateTime<Local>`.

use chrono::{DateTime, Local, NaiveDate};

/// Timestamp format used inside record preambles.
const RECORD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO-8601 basic format used in log file names (`20240115T123045`).
const FILE_NAME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Source of the current local time.
///
/// Loggers read the clock under their flush lock, so the day a record is
/// filed under always matches the order in which flushes complete.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to, for driving day rotation in tests.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<DateTime<Local>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: std::sync::Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Second-precision timestamp for a record preamble.
pub fn record_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(RECORD_FORMAT).to_string()
}

/// ISO-8601 basic timestamp for a log file name.
pub fn file_name_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(FILE_NAME_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Thread tags
// ---------------------------------------------------------------------------

#[cfg(target_os = "linux")]
fn current_thread_id() -> u64 {
    // SAFETY: gettid takes no arguments and cannot fail.
    unsafe { libc::syscall(libc::SYS_gettid) as u64 }
}

#[cfg(not(target_os = "linux"))]
fn current_thread_id() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

thread_local! {
    static THREAD_TAG: String = format!("0x{:08x}", current_thread_id());
}

/// The calling thread's identifier as it appears in record preambles
/// (`0x` followed by eight or more hex digits).
pub fn thread_tag() -> String {
    THREAD_TAG.with(|tag| tag.clone())
}
