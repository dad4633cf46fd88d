use std::ptr;

use windows_sys::Win32::Networking::WinSock::WSAGetLastError;
use windows_sys::Win32::System::Diagnostics::Debug::{
    FormatMessageW, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
};

pub fn last_code() -> i32 {
    unsafe { WSAGetLastError() }
}

pub fn last_message() -> Option<String> {
    let mut buffer = [0u16; 256];
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            ptr::null(),
            last_code() as u32,
            0,
            buffer.as_mut_ptr(),
            buffer.len() as u32,
            ptr::null(),
        )
    };
    (len > 0).then(|| String::from_utf16_lossy(&buffer[..len as usize]))
}
