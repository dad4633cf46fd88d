use std::time::Duration;
use std::{io, mem, ptr};

use tracing::warn;
use windows_sys::Win32::Networking::WinSock::{
    closesocket, connect, getsockopt, ioctlsocket, recv, select, send, shutdown, socket, WSAGetLastError, FD_SET,
    FIONREAD, INVALID_SOCKET, SD_BOTH, SOCKADDR, SOCKET, SOCK_STREAM, TIMEVAL, WSAEWOULDBLOCK,
};

use super::types;
use crate::error::ErrorKind;
use crate::socket::DISCOVER_MAX_DEVICES;
use crate::{DiscoveredDevice, Error, Result};

/// A raw `AF_IRDA` socket plus the Winsock primitives the contract layer is built from. The
/// retry/deadline loops themselves live in [`crate::socket`].
#[derive(Debug)]
pub struct SocketImpl {
    sock: SOCKET,
}

impl SocketImpl {
    pub fn open() -> Result<Self> {
        let sock = unsafe { socket(i32::from(types::AF_IRDA), SOCK_STREAM, 0) };
        if sock == INVALID_SOCKET {
            return Err(socket_error("socket"));
        }
        Ok(SocketImpl { sock })
    }

    pub fn from_raw(sock: SOCKET) -> Self {
        SocketImpl { sock }
    }

    pub fn as_raw(&self) -> SOCKET {
        self.sock
    }

    /// Best-effort termination of pending transfers in both directions.
    pub fn shutdown(&self) {
        unsafe { shutdown(self.sock, SD_BOTH) };
    }

    /// Releases the socket. The socket is gone even when the OS reports a failure.
    pub fn close(self) -> Result<()> {
        let sock = self.sock;
        mem::forget(self);
        if unsafe { closesocket(sock) } != 0 {
            return Err(socket_error("closesocket"));
        }
        Ok(())
    }

    /// One poll of the discovery cache.
    ///
    /// Returns `Ok(None)` when the cache is not yet populated (`WSAEWOULDBLOCK`), so the
    /// caller's retry policy can decide whether to wait.
    pub fn enumerate(&self) -> Result<Option<Vec<DiscoveredDevice>>> {
        let mut list: types::DEVICELIST = unsafe { mem::zeroed() };
        let mut size = mem::size_of::<types::DEVICELIST>() as i32;
        let rc = unsafe {
            getsockopt(
                self.sock,
                types::SOL_IRLMP,
                types::IRLMP_ENUMDEVICES,
                &mut list as *mut _ as *mut u8,
                &mut size,
            )
        };
        if rc != 0 {
            let code = unsafe { WSAGetLastError() };
            if code == WSAEWOULDBLOCK {
                return Ok(None);
            }
            return Err(socket_error_from("getsockopt", io::Error::from_raw_os_error(code)));
        }

        let count = (list.numDevice as usize).min(DISCOVER_MAX_DEVICES);
        Ok(Some(list.Device[..count].iter().map(types::device_record).collect()))
    }

    pub fn connect_name(&self, address: u32, name: Option<&str>) -> Result<()> {
        self.connect(&types::peer_addr_name(address, name))
    }

    pub fn connect_lsap(&self, address: u32, lsap: u32) -> Result<()> {
        self.connect(&types::peer_addr_lsap(address, lsap))
    }

    fn connect(&self, peer: &types::SOCKADDR_IRDA) -> Result<()> {
        let rc = unsafe {
            connect(
                self.sock,
                peer as *const _ as *const SOCKADDR,
                mem::size_of::<types::SOCKADDR_IRDA>() as i32,
            )
        };
        if rc != 0 {
            return Err(socket_error("connect"));
        }
        Ok(())
    }

    pub fn available(&self) -> Result<usize> {
        let mut bytes: u32 = 0;
        if unsafe { ioctlsocket(self.sock, FIONREAD, &mut bytes) } != 0 {
            return Err(socket_error("ioctlsocket"));
        }
        Ok(bytes as usize)
    }

    /// Waits for the socket to become readable, for at most `timeout` (`None` waits
    /// indefinitely). Returns whether there is activity.
    pub fn wait_readable(&self, timeout: Option<Duration>) -> Result<bool> {
        let mut fds: FD_SET = unsafe { mem::zeroed() };
        fds.fd_count = 1;
        fds.fd_array[0] = self.sock;

        let tv = timeout.map(|timeout| TIMEVAL {
            tv_sec: timeout.as_secs() as i32,
            tv_usec: timeout.subsec_micros() as i32,
        });
        let tv_ptr = tv.as_ref().map_or(ptr::null(), |tv| tv as *const TIMEVAL);

        // The first select argument is ignored by Winsock.
        let rc = unsafe { select(0, &mut fds, ptr::null_mut(), ptr::null_mut(), tv_ptr) };
        if rc < 0 {
            return Err(socket_error("select"));
        }
        Ok(rc > 0)
    }

    pub fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        let len = buf.len().min(i32::MAX as usize) as i32;
        let n = unsafe { recv(self.sock, buf.as_mut_ptr(), len, 0) };
        if n < 0 {
            return Err(socket_error("recv"));
        }
        Ok(n as usize)
    }

    pub fn send(&self, buf: &[u8]) -> Result<usize> {
        let len = buf.len().min(i32::MAX as usize) as i32;
        let n = unsafe { send(self.sock, buf.as_ptr(), len, 0) };
        if n < 0 {
            return Err(socket_error("send"));
        }
        Ok(n as usize)
    }
}

impl Drop for SocketImpl {
    fn drop(&mut self) {
        unsafe { closesocket(self.sock) };
    }
}

// The platform diagnostic must be captured (and logged) at the failure site, before any cleanup
// call can overwrite the thread's last-error state.
fn socket_error(op: &str) -> Error {
    socket_error_from(op, io::Error::from_raw_os_error(unsafe { WSAGetLastError() }))
}

fn socket_error_from(op: &str, err: io::Error) -> Error {
    warn!("{op} failed: {err}");
    Error::new(ErrorKind::Socket, Some(err), format!("{op} failed"))
}
