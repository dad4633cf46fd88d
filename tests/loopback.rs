//! Behavior tests for the I/O contract, driven over an `AF_UNIX` socket pair.
//!
//! The IrDA address family needs kernel and hardware support that test hosts do not have, but
//! every read/write/timeout/close rule of the contract is address-family independent, so the
//! sockets here are built from a `socketpair` descriptor via `FromRawFd`.

#![cfg(unix)]

use std::os::fd::FromRawFd;
use std::sync::Once;
use std::time::{Duration, Instant};

use irda::error::ErrorKind;
use irda::IrdaSocket;
use tracing::metadata::LevelFilter;

/// Makes the failure-site `tracing::warn!` diagnostics visible under `--nocapture`.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{fmt, EnvFilter};

        tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer())
            .with(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::WARN.into())
                    .from_env_lossy(),
            )
            .init();
    });
}

/// The remote end of the pair, driven with raw libc calls.
struct Peer {
    fd: libc::c_int,
}

impl Peer {
    fn send(&self, data: &[u8]) {
        let n = unsafe { libc::write(self.fd, data.as_ptr() as *const libc::c_void, data.len()) };
        assert_eq!(n, data.len() as isize);
    }

    fn recv_exact(&self, len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        let mut nbytes = 0;
        while nbytes < len {
            let n = unsafe {
                libc::read(
                    self.fd,
                    data[nbytes..].as_mut_ptr() as *mut libc::c_void,
                    len - nbytes,
                )
            };
            assert!(n > 0);
            nbytes += n as usize;
        }
        data
    }

    fn close(self) {
        unsafe { libc::close(self.fd) };
        std::mem::forget(self);
    }
}

impl Drop for Peer {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}

fn pair() -> (IrdaSocket, Peer) {
    init_tracing();

    let mut fds = [0 as libc::c_int; 2];
    let rc = unsafe { libc::socketpair(libc::AF_UNIX, libc::SOCK_STREAM, 0, fds.as_mut_ptr()) };
    assert_eq!(rc, 0);
    let socket = unsafe { IrdaSocket::from_raw_fd(fds[0]) };
    (socket, Peer { fd: fds[1] })
}

#[test]
fn close_consumes_the_handle() {
    let (mut socket, _peer) = pair();
    socket.close().unwrap();

    let mut buf = [0u8; 4];
    assert_eq!(socket.read(&mut buf).unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(socket.write(&buf).unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(socket.available().unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(socket.discover(None).unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(
        socket.connect_by_lsap(1, 1).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        socket.set_read_timeout(None).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(socket.read_timeout().unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(socket.close().unwrap_err().kind(), ErrorKind::InvalidArgument);
}

#[test]
fn timed_read_on_silent_peer_returns_zero_without_error() {
    let (mut socket, _peer) = pair();
    socket.set_read_timeout(Some(Duration::from_millis(150))).unwrap();
    assert_eq!(socket.read_timeout().unwrap(), Some(Duration::from_millis(150)));

    let start = Instant::now();
    let mut buf = [0u8; 16];
    assert_eq!(socket.read(&mut buf).unwrap(), 0);

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "returned late: {elapsed:?}");
}

#[test]
fn timed_read_returns_partial_data_without_error() {
    let (mut socket, peer) = pair();
    socket.set_read_timeout(Some(Duration::from_millis(150))).unwrap();
    peer.send(b"abc");

    let mut buf = [0u8; 16];
    assert_eq!(socket.read(&mut buf).unwrap(), 3);
    assert_eq!(&buf[..3], b"abc");
}

#[test]
fn blocking_read_returns_exact_bytes_on_peer_close() {
    let (socket, peer) = pair();
    peer.send(b"hello");
    peer.close();

    let mut buf = [0u8; 32];
    assert_eq!(socket.read(&mut buf).unwrap(), 5);
    assert_eq!(&buf[..5], b"hello");

    // A second read observes end-of-stream immediately, still without error.
    assert_eq!(socket.read(&mut buf).unwrap(), 0);
}

#[test]
fn read_stops_at_buffer_capacity() {
    let (socket, peer) = pair();
    peer.send(b"abcdefgh");

    let mut buf = [0u8; 4];
    assert_eq!(socket.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"abcd");
    assert_eq!(socket.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"efgh");
}

#[test]
fn available_reports_at_most_what_read_retrieves() {
    let (socket, peer) = pair();
    peer.send(b"datagram");

    // Delivery into the receive queue is asynchronous; poll until something is visible.
    let start = Instant::now();
    let mut queued = 0;
    while queued == 0 {
        assert!(start.elapsed() < Duration::from_secs(5));
        queued = socket.available().unwrap();
    }

    let mut buf = vec![0u8; queued];
    assert_eq!(socket.read(&mut buf).unwrap(), queued);
}

#[test]
fn write_transmits_the_full_buffer() {
    let (socket, peer) = pair();
    let data: Vec<u8> = (0..10_000u32).map(|i| i as u8).collect();

    let writer = std::thread::spawn(move || socket.write(&data).unwrap());
    let received = peer.recv_exact(10_000);
    assert_eq!(writer.join().unwrap(), 10_000);
    assert_eq!(received, (0..10_000u32).map(|i| i as u8).collect::<Vec<u8>>());
}

#[test]
fn write_after_peer_reset_is_a_socket_error() {
    let (socket, peer) = pair();
    peer.close();

    let err = socket.write(b"doomed").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Socket);
    assert!(err.os_error().is_some());
}

#[test]
fn discovery_on_a_non_irda_socket_fails_fast() {
    let (socket, _peer) = pair();

    // AF_UNIX rejects the IrLMP option level outright, which must abort discovery immediately
    // rather than burn the 4-second retry budget.
    let start = Instant::now();
    let err = socket.discover(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Socket);
    assert!(start.elapsed() < Duration::from_millis(500));
}
