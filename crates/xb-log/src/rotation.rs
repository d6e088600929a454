//! Daily rotating log file shared by both record loggers.
//!
//! Each logger owns one [`DailyRotatingFile`]: a cached file path plus the
//! calendar day it is valid for, guarded by a mutex that serializes the whole
//! "decide path, then append" sequence. The state moves through three shapes:
//!
//! ```text
//! Empty ──first flush──▶ Named(day D) ──flush on day D' ≠ D──▶ Named(day D')
//! ```
//!
//! The file itself is opened, appended and closed inside the critical
//! section, so concurrent flushes never interleave bytes and a rotated-away
//! file is never written again.
//!
//! # Best-effort contract
//!
//! [`DailyRotatingFile::flush`] never returns an error and never panics on
//! I/O failure. A failed append is counted, reported through `tracing`, and
//! the record is lost. The next flush tries again from scratch.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::{
        Mutex, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, warn};

use crate::{error::XbError, time_util::Clock};

/// Path decision state for one logger.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RotationState {
    current_file_path: Option<PathBuf>,
    cached_day: Option<NaiveDate>,
}

impl RotationState {
    pub fn current_file_path(&self) -> Option<&Path> {
        self.current_file_path.as_deref()
    }

    pub fn cached_day(&self) -> Option<NaiveDate> {
        self.cached_day
    }

    /// Name the file for `now` if no file has been named yet.
    ///
    /// Returns `true` if a path was computed.
    fn ensure_named(&mut self, now: &DateTime<Local>, make_name: impl FnOnce(&DateTime<Local>) -> PathBuf) -> bool {
        if self.current_file_path.is_some() {
            return false;
        }
        self.current_file_path = Some(make_name(now));
        self.cached_day = Some(now.date_naive());
        true
    }

    /// Re-name the file if `now` falls on a different day than the cached one.
    ///
    /// Returns `true` if the file rotated.
    fn rotate_if_new_day(&mut self, now: &DateTime<Local>, make_name: impl FnOnce(&DateTime<Local>) -> PathBuf) -> bool {
        let today = now.date_naive();
        if self.cached_day == Some(today) && self.current_file_path.is_some() {
            return false;
        }
        self.current_file_path = Some(make_name(now));
        self.cached_day = Some(today);
        true
    }
}

/// A process-lifetime log file that rolls over to a new name once per day.
#[derive(Debug)]
pub struct DailyRotatingFile {
    label: &'static str,
    state: Mutex<RotationState>,
    /// Last named path, readable without waiting on a flush in progress.
    published: RwLock<Option<PathBuf>>,
    flushed: AtomicU64,
    failed: AtomicU64,
}

impl DailyRotatingFile {
    /// `label` names the logger in diagnostics (`"LOG"`, `"TXLOG"`).
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            state: Mutex::new(RotationState::default()),
            published: RwLock::new(None),
            flushed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Run the flush protocol for one finished record.
    ///
    /// Under the lock: name the file if this is the first flush, hand the
    /// record to `before_write` (UI notification or stdout echo), then, when
    /// `log_to_file` is set, roll to a new file if the day changed and append
    /// the record. `make_name` is only called when a new path is needed.
    pub fn flush<N, B>(&self, clock: &dyn Clock, log_to_file: bool, make_name: N, before_write: B, record: &str)
    where
        N: Fn(&DateTime<Local>) -> PathBuf,
        B: FnOnce(&str),
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let now = clock.now();
        if state.ensure_named(&now, &make_name) {
            debug!(logger = self.label, path = ?state.current_file_path, "log file named");
            self.publish(&state);
        }

        before_write(record);

        if !log_to_file {
            return;
        }

        // Re-read the clock: `before_write` may have taken a while.
        let now = clock.now();
        if state.rotate_if_new_day(&now, &make_name) {
            debug!(logger = self.label, path = ?state.current_file_path, day = %now.date_naive(), "log file rotated");
            self.publish(&state);
        }

        let result = match state.current_file_path() {
            Some(path) => append(path, record),
            None => Ok(()),
        };
        match result {
            Ok(()) => {
                self.flushed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(logger = self.label, "dropping log record: {e}");
            }
        }
    }

    /// The current file path, or `None` before the first flush.
    ///
    /// Does not wait for an in-flight flush, so the value may be one
    /// rotation behind.
    pub fn current_path(&self) -> Option<PathBuf> {
        self.published.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Snapshot of the rotation state, taken under the flush lock.
    pub fn state(&self) -> RotationState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Records successfully appended to disk.
    pub fn flushed_records(&self) -> u64 {
        self.flushed.load(Ordering::Relaxed)
    }

    /// Records lost to I/O failures.
    pub fn failed_flushes(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    fn publish(&self, state: &RotationState) {
        *self.published.write().unwrap_or_else(PoisonError::into_inner) = state.current_file_path.clone();
    }
}

/// Open `path` for append, write `record`, close.
fn append(path: &Path, record: &str) -> Result<(), XbError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| XbError::io(path, e))?;
    file.write_all(record.as_bytes()).map_err(|e| XbError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, fs};

    use chrono::TimeZone;

    use super::*;
    use crate::time_util::{ManualClock, file_name_timestamp};

    fn at(d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, d, h, mi, s).unwrap()
    }

    fn namer(dir: &Path) -> impl Fn(&DateTime<Local>) -> PathBuf + '_ {
        move |now| dir.join(format!("test_{}.log", file_name_timestamp(now)))
    }

    #[test]
    fn first_flush_names_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(at(15, 12, 30, 45));
        let file = DailyRotatingFile::new("TEST");
        assert_eq!(file.current_path(), None);

        file.flush(&clock, true, namer(tmp.path()), |_| {}, "\nhello");

        let expected = tmp.path().join("test_20240115T123045.log");
        assert_eq!(file.current_path(), Some(expected.clone()));
        assert_eq!(file.state().cached_day(), Some(clock.today()));
        assert_eq!(fs::read_to_string(expected).unwrap(), "\nhello");
        assert_eq!(file.flushed_records(), 1);
    }

    #[test]
    fn same_day_reuses_file_in_flush_order() {
        let tmp = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(at(15, 0, 0, 1));
        let file = DailyRotatingFile::new("TEST");

        file.flush(&clock, true, namer(tmp.path()), |_| {}, "\none");
        clock.set(at(15, 23, 59, 59));
        file.flush(&clock, true, namer(tmp.path()), |_| {}, "\ntwo");

        let path = file.current_path().unwrap();
        assert_eq!(path, tmp.path().join("test_20240115T000001.log"));
        assert_eq!(fs::read_to_string(path).unwrap(), "\none\ntwo");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn day_change_rotates_and_never_reopens_old_file() {
        let tmp = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(at(15, 23, 59, 59));
        let file = DailyRotatingFile::new("TEST");

        file.flush(&clock, true, namer(tmp.path()), |_| {}, "\nday one");
        let first = file.current_path().unwrap();

        clock.set(at(16, 0, 0, 5));
        file.flush(&clock, true, namer(tmp.path()), |_| {}, "\nday two");
        file.flush(&clock, true, namer(tmp.path()), |_| {}, "\nday two again");
        let second = file.current_path().unwrap();

        assert_ne!(first, second);
        assert_eq!(second, tmp.path().join("test_20240116T000005.log"));
        assert_eq!(file.state().cached_day(), Some(clock.today()));
        assert_eq!(fs::read_to_string(&first).unwrap(), "\nday one");
        assert_eq!(fs::read_to_string(&second).unwrap(), "\nday two\nday two again");
    }

    #[test]
    fn make_name_called_only_when_needed() {
        let tmp = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(at(15, 9, 0, 0));
        let file = DailyRotatingFile::new("TEST");
        let calls = Cell::new(0);
        let counting = |now: &DateTime<Local>| {
            calls.set(calls.get() + 1);
            namer(tmp.path())(now)
        };

        for _ in 0..3 {
            file.flush(&clock, true, &counting, |_| {}, "\nx");
        }
        assert_eq!(calls.get(), 1);

        clock.advance(chrono::Duration::days(1));
        file.flush(&clock, true, &counting, |_| {}, "\nx");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn before_write_sees_record_even_when_file_logging_off() {
        let tmp = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(at(15, 9, 0, 0));
        let file = DailyRotatingFile::new("TEST");
        let seen = Cell::new(false);

        file.flush(&clock, false, namer(tmp.path()), |r| seen.set(r == "\nquiet"), "\nquiet");

        assert!(seen.get());
        // Named, but nothing written.
        assert!(file.current_path().is_some());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
        assert_eq!(file.flushed_records(), 0);
    }

    #[test]
    fn failed_append_is_counted_and_next_flush_retries() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        fs::write(&blocker, b"").unwrap();
        let clock = ManualClock::new(at(15, 9, 0, 0));
        let file = DailyRotatingFile::new("TEST");

        file.flush(&clock, true, namer(&blocker), |_| {}, "\nlost");
        file.flush(&clock, true, namer(&blocker), |_| {}, "\nlost again");

        assert_eq!(file.failed_flushes(), 2);
        assert_eq!(file.flushed_records(), 0);
    }
}
