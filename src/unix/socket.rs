use std::os::fd::RawFd;
use std::time::Duration;
use std::{io, mem, ptr};

use tracing::warn;

use super::types;
use crate::error::ErrorKind;
use crate::socket::DISCOVER_MAX_DEVICES;
use crate::{DiscoveredDevice, Error, Result};

/// A raw `AF_IRDA` descriptor plus the Berkeley-socket primitives the contract layer is built
/// from. The retry/deadline loops themselves live in [`crate::socket`].
#[derive(Debug)]
pub struct SocketImpl {
    fd: RawFd,
}

impl SocketImpl {
    pub fn open() -> Result<Self> {
        let fd = unsafe { libc::socket(types::AF_IRDA, libc::SOCK_STREAM, 0) };
        if fd < 0 {
            return Err(socket_error("socket"));
        }
        Ok(SocketImpl { fd })
    }

    pub fn from_raw(fd: RawFd) -> Self {
        SocketImpl { fd }
    }

    pub fn as_raw(&self) -> RawFd {
        self.fd
    }

    /// Best-effort termination of pending transfers in both directions.
    pub fn shutdown(&self) {
        unsafe { libc::shutdown(self.fd, libc::SHUT_RDWR) };
    }

    /// Releases the descriptor. The descriptor is gone even when the OS reports a failure.
    pub fn close(self) -> Result<()> {
        let fd = self.fd;
        mem::forget(self);
        if unsafe { libc::close(fd) } != 0 {
            return Err(socket_error("close"));
        }
        Ok(())
    }

    /// One poll of the kernel discovery cache.
    ///
    /// Returns `Ok(None)` when the cache is not yet populated (`EAGAIN`), so the caller's
    /// retry policy can decide whether to wait.
    pub fn enumerate(&self) -> Result<Option<Vec<DiscoveredDevice>>> {
        let mut list: types::irda_device_list = unsafe { mem::zeroed() };
        let mut size = mem::size_of::<types::irda_device_list>() as libc::socklen_t;
        let rc = unsafe {
            libc::getsockopt(
                self.fd,
                types::SOL_IRLMP,
                types::IRLMP_ENUMDEVICES,
                &mut list as *mut _ as *mut libc::c_void,
                &mut size,
            )
        };
        if rc != 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EAGAIN) {
                return Ok(None);
            }
            return Err(socket_error_from("getsockopt", err));
        }

        let count = (list.len as usize).min(DISCOVER_MAX_DEVICES);
        Ok(Some(list.dev[..count].iter().map(types::device_record).collect()))
    }

    pub fn connect_name(&self, address: u32, name: Option<&str>) -> Result<()> {
        self.connect(&types::peer_addr_name(address, name))
    }

    pub fn connect_lsap(&self, address: u32, lsap: u32) -> Result<()> {
        self.connect(&types::peer_addr_lsap(address, lsap))
    }

    fn connect(&self, peer: &types::sockaddr_irda) -> Result<()> {
        let rc = unsafe {
            libc::connect(
                self.fd,
                peer as *const _ as *const libc::sockaddr,
                mem::size_of::<types::sockaddr_irda>() as libc::socklen_t,
            )
        };
        if rc != 0 {
            return Err(socket_error("connect"));
        }
        Ok(())
    }

    pub fn available(&self) -> Result<usize> {
        let mut bytes: libc::c_int = 0;
        if unsafe { libc::ioctl(self.fd, libc::FIONREAD as _, &mut bytes) } != 0 {
            return Err(socket_error("ioctl"));
        }
        Ok(bytes.max(0) as usize)
    }

    /// Waits for the descriptor to become readable, for at most `timeout` (`None` waits
    /// indefinitely). Returns whether there is activity.
    pub fn wait_readable(&self, timeout: Option<Duration>) -> Result<bool> {
        let mut fds: libc::fd_set = unsafe { mem::zeroed() };
        unsafe {
            libc::FD_ZERO(&mut fds);
            libc::FD_SET(self.fd, &mut fds);
        }

        let mut tv = timeout.map(|timeout| libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        });
        let tv_ptr = tv.as_mut().map_or(ptr::null_mut(), |tv| tv as *mut libc::timeval);

        let rc = unsafe { libc::select(self.fd + 1, &mut fds, ptr::null_mut(), ptr::null_mut(), tv_ptr) };
        if rc < 0 {
            return Err(socket_error("select"));
        }
        Ok(rc > 0)
    }

    pub fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        let n = unsafe { libc::recv(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len(), 0) };
        if n < 0 {
            return Err(socket_error("recv"));
        }
        Ok(n as usize)
    }

    pub fn send(&self, buf: &[u8]) -> Result<usize> {
        let n = unsafe { libc::send(self.fd, buf.as_ptr() as *const libc::c_void, buf.len(), 0) };
        if n < 0 {
            return Err(socket_error("send"));
        }
        Ok(n as usize)
    }
}

impl Drop for SocketImpl {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}

// The platform diagnostic must be captured (and logged) at the failure site, before any cleanup
// call can overwrite errno.
fn socket_error(op: &str) -> Error {
    socket_error_from(op, io::Error::last_os_error())
}

fn socket_error_from(op: &str, err: io::Error) -> Error {
    warn!("{op} failed: {err}");
    Error::new(ErrorKind::Socket, Some(err), format!("{op} failed"))
}
