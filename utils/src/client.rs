use anyhow::Context;

use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::protocol::payload;

/// Deliver `word` to the instance listening on `addr`.
///
/// Fire-and-forget: success means the bytes were written, nothing more.
pub fn send_word(addr: SocketAddr, word: &str, timeout: Duration) -> anyhow::Result<()> {
    log::debug!("send_word: target={} bytes={}", addr, word.len());
    let mut stream = TcpStream::connect_timeout(&addr, timeout).context("connect")?;
    stream.set_write_timeout(Some(timeout)).context("set write timeout")?;
    stream.write_all(payload(word)).context("write word")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{claim, Claim, CHANNEL_CAPACITY};
    use std::net::{Ipv4Addr, TcpListener};
    use std::sync::mpsc;

    #[test]
    fn delivers_to_running_server() {
        let Claim::Owner(server) = claim(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).unwrap() else {
            panic!("expected owner");
        };
        let addr = server.local_addr().unwrap();
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
        server.spawn(tx).unwrap();

        send_word(addr, " naïve ", Duration::from_secs(1)).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "naïve");
    }

    #[test]
    fn fails_when_nobody_listens() {
        let addr = {
            let l = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
            l.local_addr().unwrap()
        };
        assert!(send_word(addr, "hello", Duration::from_millis(300)).is_err());
    }
}
