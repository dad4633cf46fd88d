use std::ffi::CStr;

pub fn last_code() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

pub fn last_message() -> Option<String> {
    let ptr = unsafe { libc::strerror(last_code()) };
    if ptr.is_null() {
        return None;
    }
    // SAFETY: strerror returns a NUL-terminated string (statically allocated or thread-local).
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}
