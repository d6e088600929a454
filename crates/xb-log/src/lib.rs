//! # xb-log
//!
//! Record logging for the XBridge peer-to-peer trading node, providing:
//!
//! - **Annotated log** (`annotated`) — `LOG`: reason-tagged records, UI notification, general log file
//! - **Transaction log** (`transaction`) — `TXLOG`: transaction records, stdout echo, tx log file
//! - **Daily rotation** (`rotation`) — per-logger cached path, recomputed once per calendar day
//! - **Record handles** (`record`) — in-memory accumulation flushed on scope exit
//! - **Collaborators** (`interfaces`) — data directory, settings and UI sink seams
//! - **Process loggers** (`global`) — once-installed `LOG`/`TXLOG` instances and macros
//! - **Configuration** (`config`) — JSON settings file, wallet parameters (`wallet`)
//! - **Error types** (`error`) — domain-specific `XbError` via thiserror
//! - **Time utilities** (`time_util`) — clocks, timestamp formats, thread tags
//! - **Logging** (`logging`) — tracing-based diagnostics for the node itself

pub mod annotated;
pub mod config;
pub mod error;
pub mod global;
pub mod interfaces;
pub mod logging;
pub mod record;
pub mod rotation;
pub mod time_util;
pub mod transaction;
pub mod wallet;

pub use annotated::{AnnotatedLogger, LogHandle};
pub use error::XbError;
pub use interfaces::{ChannelNotifier, DataDirectory, LogSettings, NullNotifier, UiNotifier};
pub use transaction::{TransactionLogger, TxHandle};
