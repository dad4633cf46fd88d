//! Native IrDA structure layouts from `linux/irda.h`.
//!
//! The kernel headers for these were dropped along with the in-tree IrDA stack, and `libc` has
//! never carried them, so the layouts are declared here. Field order and sizes must match the
//! kernel ABI exactly.

#![allow(non_camel_case_types)]

use crate::socket::DISCOVER_MAX_DEVICES;
use crate::util;
use crate::{DiscoveredDevice, ServiceHints};

pub const AF_IRDA: libc::c_int = 23;
pub const SOL_IRLMP: libc::c_int = 266;
pub const IRLMP_ENUMDEVICES: libc::c_int = 1;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct sockaddr_irda {
    pub sir_family: libc::sa_family_t,
    pub sir_lsap_sel: u8,
    pub sir_addr: u32,
    pub sir_name: [u8; util::SERVICE_NAME_LEN],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct irda_device_info {
    pub saddr: u32,
    pub daddr: u32,
    pub info: [u8; 22],
    pub charset: u8,
    pub hints: [u8; 2],
}

#[repr(C)]
pub struct irda_device_list {
    pub len: u32,
    pub dev: [irda_device_info; DISCOVER_MAX_DEVICES],
}

/// Builds the peer address for a connection by service name.
pub fn peer_addr_name(address: u32, name: Option<&str>) -> sockaddr_irda {
    sockaddr_irda {
        sir_family: AF_IRDA as libc::sa_family_t,
        sir_lsap_sel: 0,
        sir_addr: address,
        sir_name: util::service_name_bytes(name),
    }
}

/// Builds the peer address for a connection by LSAP selector, using the native selector field.
pub fn peer_addr_lsap(address: u32, lsap: u32) -> sockaddr_irda {
    sockaddr_irda {
        sir_family: AF_IRDA as libc::sa_family_t,
        sir_lsap_sel: lsap as u8,
        sir_addr: address,
        sir_name: [0; util::SERVICE_NAME_LEN],
    }
}

/// Normalizes one native enumeration entry into the platform-independent record.
pub fn device_record(info: &irda_device_info) -> DiscoveredDevice {
    DiscoveredDevice {
        address: info.daddr,
        name: util::name_from_bytes(&info.info),
        charset: info.charset,
        hints: ServiceHints::from_bytes(info.hints[0], info.hints[1]),
    }
}
