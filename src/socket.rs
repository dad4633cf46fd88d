//! The IrDA socket device handle

use std::time::{Duration, Instant};

use crate::error::ErrorKind;
use crate::sys::socket::SocketImpl;
use crate::{DiscoveredDevice, Error, Result};

/// Maximum number of devices one discovery round can report.
///
/// The enumeration buffer handed to the OS is sized for this many entries; peers beyond the
/// limit are silently dropped.
pub const DISCOVER_MAX_DEVICES: usize = 16;

/// Maximum number of times discovery re-polls after the OS reports "would block".
pub const DISCOVER_MAX_RETRIES: u32 = 4;

const DISCOVER_RETRY_DELAY: Duration = Duration::from_secs(1);

/// An IrDA stream socket.
///
/// An `IrdaSocket` owns one `AF_IRDA` socket descriptor and a read timeout. All operations are
/// synchronous and run on the calling thread; a socket is not internally locked, so concurrent
/// use of one socket from multiple threads must be serialized by the caller.
///
/// [`close`][IrdaSocket::close] consumes the descriptor: every operation issued after it
/// (including a second `close`) fails with [`ErrorKind::InvalidArgument`]. Dropping an open
/// socket closes the descriptor best-effort.
#[derive(Debug)]
pub struct IrdaSocket {
    inner: Option<SocketImpl>,
    timeout: Option<Duration>,
}

impl IrdaSocket {
    /// Opens a new IrDA stream socket.
    ///
    /// The socket defaults to blocking reads (no timeout). Fails with
    /// [`ErrorKind::Socket`] carrying the platform diagnostic if the OS refuses the socket,
    /// which on hosts without an IrDA stack typically surfaces as "address family not
    /// supported".
    pub fn open() -> Result<Self> {
        let inner = SocketImpl::open()?;
        Ok(IrdaSocket {
            inner: Some(inner),
            timeout: None,
        })
    }

    /// Closes the socket.
    ///
    /// Pending transfers are shut down in both directions (best-effort) before the descriptor
    /// is released. The handle is consumed even when the release itself fails; in that case the
    /// failure is reported as [`ErrorKind::Socket`] but the socket must not be used again
    /// either way.
    pub fn close(&mut self) -> Result<()> {
        let inner = self.inner.take().ok_or_else(closed)?;
        inner.shutdown();
        inner.close()
    }

    /// Sets the timeout bounding subsequent [`read`][IrdaSocket::read] calls.
    ///
    /// `None` means block indefinitely (the default). The value is stored as-is; only the read
    /// path interprets it.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        let _ = self.inner()?;
        self.timeout = timeout;
        Ok(())
    }

    /// Returns the timeout currently bounding [`read`][IrdaSocket::read] calls.
    pub fn read_timeout(&self) -> Result<Option<Duration>> {
        let _ = self.inner()?;
        Ok(self.timeout)
    }

    /// Polls the OS discovery cache for nearby IrDA devices.
    ///
    /// If the cache is not yet populated (the OS reports "would block"), the poll is retried
    /// every second up to [`DISCOVER_MAX_RETRIES`] times. Exhausting the retry budget is not an
    /// error: it means no device answered in time, and the call succeeds having reported
    /// nothing. Any other OS failure aborts with [`ErrorKind::Socket`].
    ///
    /// `callback` is invoked synchronously on the calling thread, once per discovered device,
    /// in the order the OS returned them (at most [`DISCOVER_MAX_DEVICES`]). Passing `None`
    /// still performs the query, which can be used to prime the cache without consuming the
    /// results.
    pub fn discover(&self, callback: Option<&mut dyn FnMut(DiscoveredDevice)>) -> Result<()> {
        let sock = self.inner()?;
        let devices = poll_devices(|| sock.enumerate(), std::thread::sleep)?;
        if let Some(callback) = callback {
            for device in devices {
                callback(device);
            }
        }
        Ok(())
    }

    /// Connects to the service named `service_name` on the device at `address`.
    ///
    /// The name is truncated to the native 25-byte field; `None` leaves the field zero-filled.
    /// No discovery is performed here, so `address` must come from an earlier
    /// [`discover`][IrdaSocket::discover] round.
    pub fn connect_by_name(&self, address: u32, service_name: Option<&str>) -> Result<()> {
        self.inner()?.connect_name(address, service_name)
    }

    /// Connects to the LSAP selector `lsap` on the device at `address`.
    ///
    /// # Platform specifics
    ///
    /// POSIX peer addresses carry the selector natively. Winsock has no selector field, so the
    /// conventional `LSAP-SEL<n>` service name is synthesized instead; both spellings address
    /// the same IrLMP endpoint.
    pub fn connect_by_lsap(&self, address: u32, lsap: u32) -> Result<()> {
        self.inner()?.connect_lsap(address, lsap)
    }

    /// Returns the number of bytes currently queued for reading, without consuming them.
    pub fn available(&self) -> Result<usize> {
        self.inner()?.available()
    }

    /// Reads up to `buf.len()` bytes, accumulating until the buffer is full, the read timeout
    /// elapses, or the peer closes the stream.
    ///
    /// Timeout and end-of-stream are ordinary outcomes: the call returns however many bytes
    /// were accumulated, possibly zero. An OS failure mid-read aborts the whole call with
    /// [`ErrorKind::Socket`] and discards the partial count.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let sock = self.inner()?;
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        read_loop(
            buf,
            deadline,
            |remaining| sock.wait_readable(remaining),
            |chunk| sock.recv(chunk),
        )
    }

    /// Writes the whole of `buf`, returning `buf.len()` on success.
    ///
    /// There is no write timeout: the call blocks against OS send-buffer backpressure until the
    /// buffer is fully transmitted or an OS failure aborts it with [`ErrorKind::Socket`],
    /// discarding the partial count.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let sock = self.inner()?;
        let mut nbytes = 0;
        while nbytes < buf.len() {
            nbytes += sock.send(&buf[nbytes..])?;
        }
        Ok(nbytes)
    }

    fn inner(&self) -> Result<&SocketImpl> {
        self.inner.as_ref().ok_or_else(closed)
    }
}

impl Drop for IrdaSocket {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.shutdown();
            let _ = inner.close();
        }
    }
}

#[cfg(unix)]
impl std::os::fd::AsRawFd for IrdaSocket {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.inner.as_ref().map_or(-1, SocketImpl::as_raw)
    }
}

#[cfg(unix)]
impl std::os::fd::FromRawFd for IrdaSocket {
    /// Wraps an already-open stream socket descriptor.
    ///
    /// # Safety
    ///
    /// `fd` must be an open stream-type socket descriptor owned by the caller; ownership
    /// transfers to the returned socket.
    unsafe fn from_raw_fd(fd: std::os::fd::RawFd) -> Self {
        IrdaSocket {
            inner: Some(SocketImpl::from_raw(fd)),
            timeout: None,
        }
    }
}

#[cfg(windows)]
impl std::os::windows::io::AsRawSocket for IrdaSocket {
    fn as_raw_socket(&self) -> std::os::windows::io::RawSocket {
        self.inner
            .as_ref()
            .map_or(windows_sys::Win32::Networking::WinSock::INVALID_SOCKET as _, |inner| {
                inner.as_raw() as _
            })
    }
}

#[cfg(windows)]
impl std::os::windows::io::FromRawSocket for IrdaSocket {
    /// Wraps an already-open stream socket.
    ///
    /// # Safety
    ///
    /// `sock` must be an open stream-type Winsock socket owned by the caller; ownership
    /// transfers to the returned socket.
    unsafe fn from_raw_socket(sock: std::os::windows::io::RawSocket) -> Self {
        IrdaSocket {
            inner: Some(SocketImpl::from_raw(sock as _)),
            timeout: None,
        }
    }
}

fn closed() -> Error {
    Error::new(ErrorKind::InvalidArgument, None, "socket is closed".to_string())
}

/// Bounded-retry polling loop shared by both platforms.
///
/// `poll` returns `Ok(None)` while the OS enumeration cache is still empty ("would block").
/// Exhausting the retry budget yields an empty device list, not an error. Parameterized over
/// `sleep` so the retry policy is testable without real time passing.
fn poll_devices<P, S>(mut poll: P, mut sleep: S) -> Result<Vec<DiscoveredDevice>>
where
    P: FnMut() -> Result<Option<Vec<DiscoveredDevice>>>,
    S: FnMut(Duration),
{
    let mut retries = 0;
    loop {
        match poll()? {
            Some(devices) => return Ok(devices),
            None => {
                if retries >= DISCOVER_MAX_RETRIES {
                    return Ok(Vec::new());
                }
                retries += 1;
                sleep(DISCOVER_RETRY_DELAY);
            }
        }
    }
}

/// Deadline-bounded receive loop shared by both platforms.
///
/// `wait` blocks until the socket is readable or the remaining budget elapses, returning
/// whether there is activity. A `false` wait (timeout) or a zero-byte receive (end of stream)
/// stops the loop and the accumulated count is returned; any OS failure aborts the whole call.
fn read_loop<W, R>(buf: &mut [u8], deadline: Option<Instant>, mut wait: W, mut recv: R) -> Result<usize>
where
    W: FnMut(Option<Duration>) -> Result<bool>,
    R: FnMut(&mut [u8]) -> Result<usize>,
{
    let mut nbytes = 0;
    while nbytes < buf.len() {
        let remaining = deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));
        if !wait(remaining)? {
            break; // Timeout.
        }

        let n = recv(&mut buf[nbytes..])?;
        if n == 0 {
            break; // EOF reached.
        }

        nbytes += n;
    }

    Ok(nbytes)
}
