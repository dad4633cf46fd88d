//! Per-process socket stack initialization

use crate::{sys, Result};

/// The per-process socket stack initialization/cleanup pair.
///
/// A `Session` must be created before the first [`IrdaSocket`][crate::IrdaSocket] is opened and
/// must outlive every socket. On Windows this performs the Winsock 2.2
/// `WSAStartup`/`WSACleanup` handshake; on POSIX systems both halves are no-ops and the type
/// exists only so portable code reads the same on every platform.
#[derive(Debug)]
pub struct Session {
    _private: (),
}

impl Session {
    /// Initializes the platform socket stack for this process.
    pub fn new() -> Result<Self> {
        sys::session::startup()?;
        Ok(Session { _private: () })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        sys::session::cleanup();
    }
}
