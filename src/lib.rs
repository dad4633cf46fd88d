#![warn(missing_docs)]

//! Irda is a cross-platform [IrDA] (infrared) socket library for [Rust]. It currently supports
//! Windows and POSIX systems with a kernel IrDA stack (Linux).
//!
//! The goal of this crate is to provide a *thin* abstraction on top of the platform-specific
//! `AF_IRDA` socket APIs (Berkeley sockets on POSIX, Winsock on Windows) in order to give safe,
//! uniform access to IrDA peers. The protocol layers themselves (IrLAP, IrLMP, TinyTP) are
//! implemented by the operating system; this crate only normalizes the two incompatible native
//! representations of discovery results and peer addresses behind one contract.
//!
//! [Rust]: https://www.rust-lang.org/
//! [IrDA]: https://en.wikipedia.org/wiki/Infrared_Data_Association
//!
//! # Usage
//!
//! ```rust,no_run
//!# fn main() -> Result<(), Box<dyn std::error::Error>> {
//!let session = irda::Session::new()?;
//!let socket = irda::IrdaSocket::open()?;
//!
//!let mut peer = None;
//!socket.discover(Some(&mut |device: irda::DiscoveredDevice| {
//!    println!("{:08x} {} {:?}", device.address, device.name, device.hints);
//!    peer.get_or_insert(device.address);
//!}))?;
//!
//!if let Some(address) = peer {
//!    socket.connect_by_name(address, Some("IrDA:IrCOMM"))?;
//!    socket.write(b"AT\r")?;
//!}
//!#
//!#    drop(session);
//!#    Ok(())
//!# }
//! ```
//!
//! # Overview
//!
//! The primary functions provided by this crate are:
//!
//! - Process setup: the [`Session`] initialization/cleanup pair (a Winsock handshake on Windows,
//!   a no-op elsewhere)
//! - Device discovery: [polling][IrdaSocket::discover] the OS enumeration cache for nearby peers
//! - Connection establishment: by [service name][IrdaSocket::connect_by_name] or by
//!   [LSAP selector][IrdaSocket::connect_by_lsap]
//! - Byte-oriented I/O: [queued-byte query][IrdaSocket::available],
//!   [timeout-bounded read][IrdaSocket::read], and [full-buffer write][IrdaSocket::write]
//!
//! # Platform specifics
//!
//! The available API is the common denominator of the POSIX and Winsock IrDA surfaces. The one
//! visible difference is connection by LSAP selector: POSIX exposes a native selector field in
//! `sockaddr_irda`, while Winsock does not, so on Windows the conventional `LSAP-SEL<n>` service
//! name is synthesized instead. Both spellings address the same IrLMP endpoint.
//!
//! Every operation is synchronous and runs entirely on the calling thread, including the
//! discovery callback. A socket is not internally locked; concurrent use of one socket from
//! multiple threads must be serialized by the caller.

pub mod error;
pub mod session;
pub mod socket;
mod util;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use error::Error;
pub use session::Session;
pub use socket::IrdaSocket;

#[cfg(unix)]
use crate::unix as sys;
#[cfg(windows)]
use crate::windows as sys;

/// Convenience alias for a result with [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A peer reported by one round of [`IrdaSocket::discover`]
///
/// Records are transient: they are produced as callback arguments and never stored by the
/// crate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoveredDevice {
    /// The 32-bit device address, unique within a discovery session
    pub address: u32,
    /// The device name as reported by the OS (at most 22 bytes on the wire)
    pub name: String,
    /// CHAR_SET code identifying the text encoding of `name` (IrLMP §3.3.2; `0` is ASCII)
    pub charset: u8,
    /// The IrLMP service hint bits advertised by the device
    pub hints: ServiceHints,
}

/// IrLMP service hint bits as defined in the IrLMP specification §3.3.2 and mirrored by the
/// platform headers.
///
/// The first hint byte occupies the upper 8 bits of the 16-bit raw value and the second hint
/// byte the lower 8, matching how discovery assembles them from the wire.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceHints {
    pub plug_and_play: bool,
    pub pda: bool,
    pub computer: bool,
    pub printer: bool,
    pub modem: bool,
    pub fax: bool,
    pub lan_access: bool,
    pub telephony: bool,
    pub file_server: bool,
    pub ircomm: bool,
    pub message: bool,
    pub http: bool,
    pub obex: bool,
}

impl ServiceHints {
    /// Raw transmutation from [`u16`].
    ///
    /// The first hint byte is in the upper bits.
    pub fn from_bits(bits: u16) -> Self {
        ServiceHints {
            plug_and_play: (bits & (1 << 8)) != 0,
            pda: (bits & (1 << 9)) != 0,
            computer: (bits & (1 << 10)) != 0,
            printer: (bits & (1 << 11)) != 0,
            modem: (bits & (1 << 12)) != 0,
            fax: (bits & (1 << 13)) != 0,
            lan_access: (bits & (1 << 14)) != 0,
            telephony: (bits & (1 << 0)) != 0,
            file_server: (bits & (1 << 1)) != 0,
            ircomm: (bits & (1 << 2)) != 0,
            message: (bits & (1 << 3)) != 0,
            http: (bits & (1 << 4)) != 0,
            obex: (bits & (1 << 5)) != 0,
        }
    }

    /// Raw transmutation to [`u16`].
    ///
    /// The first hint byte is in the upper bits.
    pub fn to_bits(self) -> u16 {
        (u16::from(self.plug_and_play) << 8)
            | (u16::from(self.pda) << 9)
            | (u16::from(self.computer) << 10)
            | (u16::from(self.printer) << 11)
            | (u16::from(self.modem) << 12)
            | (u16::from(self.fax) << 13)
            | (u16::from(self.lan_access) << 14)
            | u16::from(self.telephony)
            | (u16::from(self.file_server) << 1)
            | (u16::from(self.ircomm) << 2)
            | (u16::from(self.message) << 3)
            | (u16::from(self.http) << 4)
            | (u16::from(self.obex) << 5)
    }

    /// Assembles hints from the two raw hint bytes of a discovery record.
    pub(crate) fn from_bytes(hint1: u8, hint2: u8) -> Self {
        Self::from_bits(u16::from(hint1) << 8 | u16::from(hint2))
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceHints;

    #[test]
    fn hint_bits_round_trip() {
        let hints = ServiceHints::from_bytes(0x04, 0x20);
        assert!(hints.computer);
        assert!(hints.obex);
        assert!(!hints.printer);
        assert!(!hints.ircomm);
        assert_eq!(hints.to_bits(), 0x0420);
    }

    #[test]
    fn hint_bytes_keep_wire_order() {
        // First hint byte is the high byte of the assembled value.
        assert_eq!(ServiceHints::from_bytes(0x01, 0x00).to_bits(), 0x0100);
        assert_eq!(ServiceHints::from_bytes(0x00, 0x01).to_bits(), 0x0001);
    }
}
