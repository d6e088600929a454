//! General-purpose annotated record logger (`LOG`).
//!
//! Every record opens with a reason tag, a timestamp and the writing thread:
//!
//! ```text
//! \n[E] 2024-01-15 12:30:45 [0x00003a2f] connection lost
//! ```
//!
//! On flush the raw record goes to the UI notifier first, then to
//! `<data_dir>/log/xbridgep2p_<YYYYMMDDTHHMMSS>.log`, which rolls over to a
//! fresh name on the first flush of each calendar day.

use std::{
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    sync::Arc,
};

use chrono::{DateTime, Local};
use tracing::warn;

use crate::{
    config::AppConfig,
    interfaces::{DataDirectory, UiNotifier},
    record::{RecordHandle, RecordSink},
    rotation::DailyRotatingFile,
    time_util::{Clock, SystemClock, file_name_timestamp, record_timestamp, thread_tag},
};

/// File name prefix of the general log.
pub const FILE_PREFIX: &str = "xbridgep2p_";

/// Subdirectory of the data directory holding the general log.
pub const LOG_SUBDIR: &str = "log";

/// A record being written to the general log.
pub type LogHandle<'a> = RecordHandle<'a, AnnotatedLogger>;

/// The `LOG` logger.
///
/// One instance normally lives for the whole process (see
/// [`crate::global::install_log`]); its rotation state and lock are shared by
/// every thread writing through it and by nothing else.
pub struct AnnotatedLogger {
    file: DailyRotatingFile,
    data_dir: Arc<dyn DataDirectory>,
    notifier: Arc<dyn UiNotifier>,
    clock: Arc<dyn Clock>,
    log_to_file: bool,
}

impl AnnotatedLogger {
    pub fn new(data_dir: Arc<dyn DataDirectory>, notifier: Arc<dyn UiNotifier>) -> Self {
        Self {
            file: DailyRotatingFile::new("LOG"),
            data_dir,
            notifier,
            clock: Arc::new(SystemClock),
            log_to_file: true,
        }
    }

    /// Build from the node settings file, honouring its `log_to_file` switch.
    pub fn from_config(config: Arc<AppConfig>, notifier: Arc<dyn UiNotifier>) -> Self {
        let log_to_file = config.effective_log_to_file();
        Self::new(config, notifier).with_log_to_file(log_to_file)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// With `false`, records still reach the UI notifier but no file is written.
    pub fn with_log_to_file(mut self, enabled: bool) -> Self {
        self.log_to_file = enabled;
        self
    }

    /// Start a record tagged with `reason` (uppercased in the output).
    pub fn begin(&self, reason: char) -> LogHandle<'_> {
        let preamble = format!(
            "\n[{}] {} [{}] ",
            reason.to_uppercase(),
            record_timestamp(&self.clock.now()),
            thread_tag()
        );
        RecordHandle::new(self, preamble)
    }

    /// Path of the current general log file, or an empty string before the
    /// first flush. Not synchronized with flushing; may lag a rotation.
    pub fn log_file_name(&self) -> String {
        self.file.current_path().map(|p| p.display().to_string()).unwrap_or_default()
    }

    /// Records lost to I/O failures so far.
    pub fn failed_flushes(&self) -> u64 {
        self.file.failed_flushes()
    }

    /// Records appended to disk so far.
    pub fn flushed_records(&self) -> u64 {
        self.file.flushed_records()
    }

    /// `<data_dir>/log/xbridgep2p_<ts>.log`, creating the `log` directory if
    /// it does not exist yet.
    pub fn make_file_name(&self, now: &DateTime<Local>) -> PathBuf {
        let dir = self.data_dir.data_directory(true).join(LOG_SUBDIR);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("cannot create log directory {}: {e}", dir.display());
        }
        dir.join(format!("{FILE_PREFIX}{}.log", file_name_timestamp(now)))
    }

    /// Runs on every flush, including those from a handle dropped while its
    /// writer unwinds; a notifier panic is caught there too.
    fn notify(&self, record: &str) {
        if panic::catch_unwind(AssertUnwindSafe(|| self.notifier.notify_log_message(record))).is_err() {
            warn!("UI log notifier panicked; record still goes to file");
        }
    }
}

impl RecordSink for AnnotatedLogger {
    /// Best-effort: notifier and file failures are swallowed here and never
    /// reach the code that wrote the record.
    fn flush_record(&self, record: &str) {
        self.file.flush(
            self.clock.as_ref(),
            self.log_to_file,
            |now| self.make_file_name(now),
            |text| self.notify(text),
            record,
        );
    }
}

impl std::fmt::Debug for AnnotatedLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotatedLogger")
            .field("file", &self.file)
            .field("log_to_file", &self.log_to_file)
            .finish_non_exhaustive()
    }
}
