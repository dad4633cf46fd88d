use crate::Result;

// Berkeley sockets need no per-process handshake; both halves exist so portable code reads the
// same on every platform.

pub fn startup() -> Result<()> {
    Ok(())
}

pub fn cleanup() {}
