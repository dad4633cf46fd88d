use std::{io, mem};

use tracing::warn;
use windows_sys::Win32::Networking::WinSock::{WSACleanup, WSAGetLastError, WSAStartup, WSADATA};

use crate::error::ErrorKind;
use crate::{Error, Result};

const WINSOCK_VERSION: u16 = 0x0202; // MAKEWORD(2, 2)

pub fn startup() -> Result<()> {
    let mut data: WSADATA = unsafe { mem::zeroed() };
    let rc = unsafe { WSAStartup(WINSOCK_VERSION, &mut data) };
    if rc != 0 {
        // WSAStartup reports its failure through the return value, not WSAGetLastError.
        let err = io::Error::from_raw_os_error(rc);
        warn!("WSAStartup failed: {err}");
        return Err(Error::new(ErrorKind::Socket, Some(err), "WSAStartup failed".to_string()));
    }

    // The DLL reports the version we requested even when it supports later ones; anything else
    // means 2.2 is unavailable and the stack must be torn back down.
    if data.wVersion != WINSOCK_VERSION {
        warn!("Winsock 2.2 unavailable (got {:#06x})", data.wVersion);
        unsafe { WSACleanup() };
        return Err(Error::new(
            ErrorKind::Socket,
            None,
            "Winsock 2.2 unavailable".to_string(),
        ));
    }

    Ok(())
}

pub fn cleanup() {
    if unsafe { WSACleanup() } != 0 {
        let err = io::Error::from_raw_os_error(unsafe { WSAGetLastError() });
        warn!("WSACleanup failed: {err}");
    }
}
