use std::time::Duration;

use irda::*;

fn assert_send<T: Send>(t: T) -> T {
    t
}

#[allow(unused)]
fn check_apis() -> Result<()> {
    let session: Session = assert_send(Session::new())?;
    let mut socket: IrdaSocket = assert_send(IrdaSocket::open())?;

    socket.set_read_timeout(Some(Duration::from_millis(500)))?;
    let _timeout: Option<Duration> = socket.read_timeout()?;

    let mut seen: Vec<DiscoveredDevice> = Vec::new();
    socket.discover(Some(&mut |device: DiscoveredDevice| seen.push(device)))?;
    socket.discover(None)?;

    socket.connect_by_name(0x11223344, Some("IrDA:IrCOMM"))?;
    socket.connect_by_name(0x11223344, None)?;
    socket.connect_by_lsap(0x11223344, 2)?;

    let _queued: usize = socket.available()?;
    let mut buf = [0u8; 64];
    let _n: usize = socket.read(&mut buf)?;
    let _n: usize = socket.write(&buf)?;

    let hints: ServiceHints = ServiceHints::from_bits(0x0420);
    let _bits: u16 = hints.to_bits();

    let _code: i32 = error::last_os_code();
    let _message: Option<String> = error::last_os_message();
    let _kind: error::ErrorKind = Error::from(error::ErrorKind::InvalidArgument).kind();

    socket.close()?;
    drop(session);
    Ok(())
}

fn main() {}
