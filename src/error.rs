//! Irda errors

use crate::{sys, util};

/// The error type for IrDA socket operations
///
/// When the underlying OS call is what failed, the platform error is captured immediately at the
/// failure point (before any cleanup call can overwrite the thread's last-error state) and is
/// available through [`os_error`][Error::os_error] and [`source`][std::error::Error::source].
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<std::io::Error>,
    message: String,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, source: Option<std::io::Error>, message: String) -> Self {
        Error { kind, source, message }
    }

    /// Returns the corresponding [ErrorKind] for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message for this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the raw platform error code captured when the failing OS call returned, if any.
    pub fn os_error(&self) -> Option<i32> {
        self.source.as_ref().and_then(|err| err.raw_os_error())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.message.is_empty(), &self.source) {
            (true, None) => write!(f, "{}", &self.kind),
            (false, None) => write!(f, "{}: {}", &self.kind, &self.message),
            (true, Some(err)) => write!(f, "{}: {}", &self.kind, err),
            (false, Some(err)) => write!(f, "{}: {} ({})", &self.kind, &self.message, err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|x| {
            let x: &(dyn std::error::Error + 'static) = x;
            x
        })
    }
}

/// A list of general categories of IrDA socket error.
#[non_exhaustive]
#[derive(Debug, displaydoc::Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// invalid argument
    InvalidArgument,
    /// out of memory
    OutOfMemory,
    /// socket operation failed
    Socket,
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind,
            source: None,
            message: String::new(),
        }
    }
}

/// Returns the platform error code left by the most recent failed socket call on this thread
/// (`errno` on POSIX, `WSAGetLastError` on Windows).
///
/// Prefer [`Error::os_error`], which captures the code at the failure point; this function only
/// reads whatever ambient state the platform currently holds.
pub fn last_os_code() -> i32 {
    sys::error::last_code()
}

/// Returns a human-readable description of the platform error left by the most recent failed
/// socket call on this thread, with trailing newline, carriage-return, and period characters
/// stripped.
///
/// Returns `None` when the platform cannot produce a message for the current code.
pub fn last_os_message() -> Option<String> {
    let message = util::trim_os_message(sys::error::last_message()?);
    (!message.is_empty()).then_some(message)
}
