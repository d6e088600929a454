//! Stream-style record handles.
//!
//! A [`RecordHandle`] owns the text of one log record while the caller builds
//! it, with no locking. When the handle goes out of scope, on the normal path
//! or while unwinding, the finished text is handed to its [`RecordSink`]
//! exactly once.
//!
//! ```ignore
//! use std::fmt::Write;
//!
//! let mut rec = logger.begin('e');
//! write!(rec, "connection lost to {peer}")?;
//! // flushed here
//! ```

use std::fmt::{self, Display};

/// Consumer of finished records.
///
/// `flush_record` must not panic or report failure back to the handle:
/// record logging is best-effort.
pub trait RecordSink {
    fn flush_record(&self, record: &str);
}

/// An in-progress log record, flushed to its sink on drop.
pub struct RecordHandle<'a, S: RecordSink + ?Sized> {
    sink: &'a S,
    buf: String,
}

impl<'a, S: RecordSink + ?Sized> RecordHandle<'a, S> {
    pub(crate) fn new(sink: &'a S, preamble: String) -> Self {
        Self { sink, buf: preamble }
    }

    /// Append any displayable value, stream style.
    pub fn append(&mut self, value: impl Display) -> &mut Self {
        use std::fmt::Write as _;
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{value}");
        self
    }

    /// Text accumulated so far, preamble included.
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

impl<S: RecordSink + ?Sized> fmt::Write for RecordHandle<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> Drop for RecordHandle<'_, S> {
    fn drop(&mut self) {
        let record = std::mem::take(&mut self.buf);
        self.sink.flush_record(&record);
    }
}

impl<S: RecordSink + ?Sized> fmt::Debug for RecordHandle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordHandle").field("buf", &self.buf).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fmt::Write};

    use super::*;

    #[derive(Default)]
    struct Collect(RefCell<Vec<String>>);

    impl RecordSink for Collect {
        fn flush_record(&self, record: &str) {
            self.0.borrow_mut().push(record.to_owned());
        }
    }

    #[test]
    fn flushes_once_on_scope_exit() {
        let sink = Collect::default();
        {
            let mut h = RecordHandle::new(&sink, "\n[I] ".to_owned());
            h.append("peer ").append(42);
            write!(h, " fee={:.2}", 0.5).unwrap();
            assert_eq!(h.as_str(), "\n[I] peer 42 fee=0.50");
            assert!(sink.0.borrow().is_empty());
        }
        assert_eq!(*sink.0.borrow(), vec!["\n[I] peer 42 fee=0.50"]);
    }

    #[test]
    fn flushes_on_early_return() {
        fn work(sink: &Collect, fail: bool) -> Result<(), &'static str> {
            let mut h = RecordHandle::new(sink, "\n".to_owned());
            h.append("start");
            if fail {
                return Err("bail");
            }
            h.append(" done");
            Ok(())
        }

        let sink = Collect::default();
        assert!(work(&sink, true).is_err());
        work(&sink, false).unwrap();
        assert_eq!(*sink.0.borrow(), vec!["\nstart", "\nstart done"]);
    }

    #[test]
    fn flushes_while_unwinding() {
        let sink = Collect::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut h = RecordHandle::new(&sink, "\n".to_owned());
            h.append("before panic");
            panic!("caller failed");
        }));
        assert!(result.is_err());
        assert_eq!(*sink.0.borrow(), vec!["\nbefore panic"]);
    }
}
