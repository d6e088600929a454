//! Transaction record logger (`TXLOG`).
//!
//! Records carry a timestamp and thread tag but no reason code. Each finished
//! record is echoed to stdout and appended to
//! `<log_path or app_path>/xbridgep2p_tx_<YYYYMMDDTHHMMSS>.log`.
//!
//! Shares no state with [`crate::annotated::AnnotatedLogger`]: separate lock,
//! separate day cache, separate file.

use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use chrono::{DateTime, Local};

use crate::{
    config::AppConfig,
    interfaces::LogSettings,
    record::{RecordHandle, RecordSink},
    rotation::DailyRotatingFile,
    time_util::{Clock, SystemClock, file_name_timestamp, record_timestamp, thread_tag},
};

/// File name prefix of the transaction log.
pub const FILE_PREFIX: &str = "xbridgep2p_tx_";

/// A record being written to the transaction log.
pub type TxHandle<'a> = RecordHandle<'a, TransactionLogger>;

/// The `TXLOG` logger.
pub struct TransactionLogger {
    file: DailyRotatingFile,
    settings: Arc<dyn LogSettings>,
    clock: Arc<dyn Clock>,
}

impl TransactionLogger {
    pub fn new(settings: Arc<dyn LogSettings>) -> Self {
        Self {
            file: DailyRotatingFile::new("TXLOG"),
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(config: Arc<AppConfig>) -> Self {
        Self::new(config)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn begin(&self) -> TxHandle<'_> {
        let preamble = format!("\n{} [{}] ", record_timestamp(&self.clock.now()), thread_tag());
        RecordHandle::new(self, preamble)
    }

    /// Path of the current transaction log file, or an empty string before
    /// the first flush. May lag a rotation.
    pub fn log_file_name(&self) -> String {
        self.file.current_path().map(|p| p.display().to_string()).unwrap_or_default()
    }

    pub fn failed_flushes(&self) -> u64 {
        self.file.failed_flushes()
    }

    pub fn flushed_records(&self) -> u64 {
        self.file.flushed_records()
    }

    /// `<base>/xbridgep2p_tx_<ts>.log` where `base` is the configured log path,
    /// falling back to the application path. The directory is not created.
    pub fn make_file_name(&self, now: &DateTime<Local>) -> PathBuf {
        let mut base = self.settings.log_path();
        if base.is_empty() {
            base = self.settings.app_path();
        }
        PathBuf::from(base).join(format!("{FILE_PREFIX}{}.log", file_name_timestamp(now)))
    }
}

fn echo(record: &str) {
    let mut out = io::stdout().lock();
    let _ = out.write_all(record.as_bytes());
    let _ = out.flush();
}

impl RecordSink for TransactionLogger {
    /// Best-effort: stdout and file failures never reach the writer of the record.
    fn flush_record(&self, record: &str) {
        self.file.flush(self.clock.as_ref(), true, |now| self.make_file_name(now), echo, record);
    }
}

impl std::fmt::Debug for TransactionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionLogger").field("file", &self.file).finish_non_exhaustive()
    }
}
