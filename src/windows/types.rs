//! Native IrDA structure layouts from `af_irda.h`.
//!
//! The IrDA address family is not covered by the Win32 metadata the `windows-sys` bindings are
//! generated from, so the `af_irda.h` structures and option constants are declared here. Field
//! order and sizes must match the Winsock ABI exactly.

#![allow(non_camel_case_types, non_snake_case)]

use crate::socket::DISCOVER_MAX_DEVICES;
use crate::util;
use crate::{DiscoveredDevice, ServiceHints};

pub const AF_IRDA: u16 = 26;
pub const SOL_IRLMP: i32 = 0x00FF;
pub const IRLMP_ENUMDEVICES: i32 = 0x0010;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct IRDA_DEVICE_INFO {
    pub irdaDeviceID: [u8; 4],
    pub irdaDeviceName: [u8; 22],
    pub irdaDeviceHints1: u8,
    pub irdaDeviceHints2: u8,
    pub irdaCharSet: u8,
}

#[repr(C)]
pub struct DEVICELIST {
    pub numDevice: u32,
    pub Device: [IRDA_DEVICE_INFO; DISCOVER_MAX_DEVICES],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct SOCKADDR_IRDA {
    pub irdaAddressFamily: u16,
    pub irdaDeviceID: [u8; 4],
    pub irdaServiceName: [u8; util::SERVICE_NAME_LEN],
}

/// Builds the peer address for a connection by service name. The device ID is the big-endian
/// split of the 32-bit address, matching the wire representation.
pub fn peer_addr_name(address: u32, name: Option<&str>) -> SOCKADDR_IRDA {
    SOCKADDR_IRDA {
        irdaAddressFamily: AF_IRDA,
        irdaDeviceID: address.to_be_bytes(),
        irdaServiceName: util::service_name_bytes(name),
    }
}

/// Builds the peer address for a connection by LSAP selector.
///
/// Winsock has no native selector field, so the conventional `LSAP-SEL<n>` service name is
/// synthesized instead.
pub fn peer_addr_lsap(address: u32, lsap: u32) -> SOCKADDR_IRDA {
    SOCKADDR_IRDA {
        irdaAddressFamily: AF_IRDA,
        irdaDeviceID: address.to_be_bytes(),
        irdaServiceName: util::lsap_sel_name(lsap),
    }
}

/// Normalizes one native enumeration entry into the platform-independent record.
pub fn device_record(info: &IRDA_DEVICE_INFO) -> DiscoveredDevice {
    DiscoveredDevice {
        address: u32::from_be_bytes(info.irdaDeviceID),
        name: util::name_from_bytes(&info.irdaDeviceName),
        charset: info.irdaCharSet,
        hints: ServiceHints::from_bytes(info.irdaDeviceHints1, info.irdaDeviceHints2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_addr_splits_address_big_endian() {
        let peer = peer_addr_name(0xDEADBEEF, Some("IrDA:IrCOMM"));
        assert_eq!(peer.irdaAddressFamily, AF_IRDA);
        assert_eq!(peer.irdaDeviceID, [0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&peer.irdaServiceName[..11], b"IrDA:IrCOMM");
        assert!(peer.irdaServiceName[11..].iter().all(|&b| b == 0));
    }

    #[test]
    fn peer_addr_by_lsap_synthesizes_service_name() {
        let peer = peer_addr_lsap(0x01020304, 3);
        assert_eq!(peer.irdaDeviceID, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&peer.irdaServiceName[..9], b"LSAP-SEL3");
        assert_eq!(peer.irdaServiceName[9], 0);
    }

    #[test]
    fn device_record_assembles_address_and_hints() {
        let mut info = IRDA_DEVICE_INFO {
            irdaDeviceID: [0x11, 0x22, 0x33, 0x44],
            irdaDeviceName: [0; 22],
            irdaDeviceHints1: 0x04,
            irdaDeviceHints2: 0x20,
            irdaCharSet: 0,
        };
        info.irdaDeviceName[..4].copy_from_slice(b"Palm");

        let record = device_record(&info);
        assert_eq!(record.address, 0x11223344);
        assert_eq!(record.name, "Palm");
        assert_eq!(record.hints.to_bits(), 0x0420);
    }

    #[test]
    fn native_struct_sizes_match_winsock_abi() {
        assert_eq!(std::mem::size_of::<IRDA_DEVICE_INFO>(), 29);
        // 31 payload bytes, padded to 32: irdaAddressFamily aligns the struct to 2, same as
        // the C sizeof.
        assert_eq!(std::mem::align_of::<SOCKADDR_IRDA>(), 2);
        assert_eq!(std::mem::size_of::<SOCKADDR_IRDA>(), 32);
        assert_eq!(
            std::mem::size_of::<DEVICELIST>(),
            4 + DISCOVER_MAX_DEVICES * std::mem::size_of::<IRDA_DEVICE_INFO>()
        );
    }
}
