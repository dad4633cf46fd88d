#![allow(unused)] // used depending on the target.

/// Size of the native service-name field, terminator included, on both platforms.
pub const SERVICE_NAME_LEN: usize = 25;

/// Strips the trailing `'\r'`, `'\n'`, and `'.'` characters some platforms append to their
/// error messages.
pub fn trim_os_message(mut message: String) -> String {
    while matches!(message.as_bytes().last(), Some(b'\n' | b'\r' | b'.')) {
        message.pop();
    }
    message
}

/// Converts a fixed-size native name field to a `String`, stopping at the first NUL.
///
/// The OS does not guarantee a terminator when the name fills the whole field.
pub fn name_from_bytes(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len]).into_owned()
}

/// Fills a native service-name field: up to [`SERVICE_NAME_LEN`] bytes of `name` (`strncpy`
/// semantics, so a name that fills the field is not terminated), zero-filled when absent.
pub fn service_name_bytes(name: Option<&str>) -> [u8; SERVICE_NAME_LEN] {
    let mut field = [0u8; SERVICE_NAME_LEN];
    if let Some(name) = name {
        let bytes = name.as_bytes();
        let len = bytes.len().min(SERVICE_NAME_LEN);
        field[..len].copy_from_slice(&bytes[..len]);
    }
    field
}

/// Synthesizes the conventional `LSAP-SEL<n>` service name used to address an LSAP selector on
/// platforms whose peer address has no native selector field. Always NUL-terminated
/// (`snprintf` semantics).
pub fn lsap_sel_name(lsap: u32) -> [u8; SERVICE_NAME_LEN] {
    let mut field = [0u8; SERVICE_NAME_LEN];
    let name = format!("LSAP-SEL{lsap}");
    let len = name.len().min(SERVICE_NAME_LEN - 1);
    field[..len].copy_from_slice(&name.as_bytes()[..len]);
    field
}
