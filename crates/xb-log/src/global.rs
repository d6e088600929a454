//! Process-wide `LOG` and `TXLOG` instances.
//!
//! Each logger is installed once at node start and then lives for the rest of
//! the process. Until installation, [`log`] and [`txlog`] return `None` and
//! the [`xlog!`](crate::xlog) / [`txlog!`](crate::txlog) macros do nothing.

use std::sync::OnceLock;

use crate::{
    annotated::{AnnotatedLogger, LogHandle},
    error::XbError,
    transaction::{TransactionLogger, TxHandle},
};

static LOG: OnceLock<AnnotatedLogger> = OnceLock::new();
static TXLOG: OnceLock<TransactionLogger> = OnceLock::new();

/// Install the process `LOG`. Fails if one is already installed.
pub fn install_log(logger: AnnotatedLogger) -> Result<(), XbError> {
    LOG.set(logger).map_err(|_| XbError::AlreadyInstalled("LOG"))
}

/// Install the process `TXLOG`. Fails if one is already installed.
pub fn install_txlog(logger: TransactionLogger) -> Result<(), XbError> {
    TXLOG.set(logger).map_err(|_| XbError::AlreadyInstalled("TXLOG"))
}

/// The installed `LOG`, if any.
pub fn log_instance() -> Option<&'static AnnotatedLogger> {
    LOG.get()
}

/// The installed `TXLOG`, if any.
pub fn txlog_instance() -> Option<&'static TransactionLogger> {
    TXLOG.get()
}

/// Start a general record with the given reason code.
pub fn log(reason: char) -> Option<LogHandle<'static>> {
    LOG.get().map(|l| l.begin(reason))
}

/// Start a transaction record.
pub fn txlog() -> Option<TxHandle<'static>> {
    TXLOG.get().map(TransactionLogger::begin)
}

/// Current general log file, or an empty string.
pub fn log_file_name() -> String {
    LOG.get().map(AnnotatedLogger::log_file_name).unwrap_or_default()
}

/// Current transaction log file, or an empty string.
pub fn txlog_file_name() -> String {
    TXLOG.get().map(TransactionLogger::log_file_name).unwrap_or_default()
}

/// Write one record to the process `LOG`.
///
/// ```ignore
/// xlog!('e', "connection lost to {}", peer);
/// ```
#[macro_export]
macro_rules! xlog {
    ($reason:expr, $($arg:tt)*) => {
        if let Some(mut handle) = $crate::global::log($reason) {
            let _ = ::std::fmt::Write::write_fmt(&mut handle, format_args!($($arg)*));
        }
    };
}

/// Write one record to the process `TXLOG`.
#[macro_export]
macro_rules! txlog {
    ($($arg:tt)*) => {
        if let Some(mut handle) = $crate::global::txlog() {
            let _ = ::std::fmt::Write::write_fmt(&mut handle, format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use super::*;
    use crate::{config::AppConfig, interfaces::NullNotifier};

    // The statics are shared by every test in this binary, so everything
    // touching them lives in this one test.
    #[test]
    fn install_once_then_write_through_macros() {
        assert!(log('i').is_none());
        assert!(txlog().is_none());
        assert_eq!(log_file_name(), "");
        xlog!('i', "dropped: nothing installed");

        let tmp = tempfile::tempdir().unwrap();
        let config = Arc::new(AppConfig {
            data_dir: Some(tmp.path().to_path_buf()),
            app_path: Some(tmp.path().display().to_string()),
            ..AppConfig::default()
        });
        install_log(AnnotatedLogger::from_config(config.clone(), Arc::new(NullNotifier))).unwrap();
        install_txlog(TransactionLogger::from_config(config.clone())).unwrap();

        let again = install_log(AnnotatedLogger::from_config(config.clone(), Arc::new(NullNotifier)));
        assert!(matches!(again, Err(XbError::AlreadyInstalled("LOG"))));
        let again = install_txlog(TransactionLogger::from_config(config));
        assert!(matches!(again, Err(XbError::AlreadyInstalled("TXLOG"))));

        xlog!('e', "peer {} unreachable", "10.0.0.7");
        txlog!("order {} accepted", 42);

        let general = fs::read_to_string(log_file_name()).unwrap();
        assert!(general.starts_with("\n[E] "));
        assert!(general.ends_with("peer 10.0.0.7 unreachable"));
        assert!(log_file_name().contains("/log/xbridgep2p_"));

        let tx = fs::read_to_string(txlog_file_name()).unwrap();
        assert!(tx.ends_with("order 42 accepted"));
        assert!(txlog_file_name().contains("xbridgep2p_tx_"));
        assert_eq!(log_instance().unwrap().flushed_records(), 1);
        assert_eq!(txlog_instance().unwrap().flushed_records(), 1);
    }
}
