//! Single-instance coordination server.
//!
//! Owning the bound listener is what makes a process "the" instance; there
//! is no other lock. Words arrive one per connection and are handed to the
//! UI through a bounded channel, because the accept thread must never touch
//! UI state itself.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::SyncSender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::protocol::{decode_chunk, MAX_WORD_BYTES};

/// Bound on a single client's read so a stalled peer can't wedge the loop.
pub const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Capacity of the word hand-off channel used by the UI.
pub const CHANNEL_CAPACITY: usize = 16;

pub enum Claim {
    Owner(CoordinationServer),
    /// Another process already listens on the endpoint.
    Taken,
}

pub struct CoordinationServer {
    listener: TcpListener,
}

/// Try to become the instance that owns `addr`.
pub fn claim(addr: SocketAddr) -> io::Result<Claim> {
    match TcpListener::bind(addr) {
        Ok(listener) => {
            log::info!("coordination: listening on {}", addr);
            Ok(Claim::Owner(CoordinationServer { listener }))
        }
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            log::info!("coordination: {} already owned, not serving", addr);
            Ok(Claim::Taken)
        }
        Err(e) => Err(e),
    }
}

impl CoordinationServer {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop on a dedicated thread.
    pub fn spawn(self, tx: SyncSender<String>) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("coordination".into())
            .spawn(move || self.serve(tx))
    }

    /// Accept connections until the receiving side of `tx` goes away.
    pub fn serve(self, tx: SyncSender<String>) {
        for incoming in self.listener.incoming() {
            let stream = match incoming {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("coordination: accept failed: {e}");
                    continue;
                }
            };
            let peer = stream.peer_addr().ok();
            let word = match read_word(stream) {
                Ok(Some(w)) => w,
                Ok(None) => {
                    log::debug!("coordination: empty or undecodable delivery from {:?}", peer);
                    continue;
                }
                Err(e) => {
                    log::warn!("coordination: read from {:?} failed: {e}", peer);
                    continue;
                }
            };
            log::debug!("coordination: received {:?}", word);
            if tx.send(word).is_err() {
                log::info!("coordination: receiver gone, stopping");
                return;
            }
        }
    }
}

// The stream is dropped (closed) on return, whatever the outcome.
fn read_word(mut stream: TcpStream) -> io::Result<Option<String>> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let mut buf = [0u8; MAX_WORD_BYTES];
    let n = stream.read(&mut buf)?;
    Ok(decode_chunk(&buf[..n]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::Ipv4Addr;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::{Arc, Barrier};

    fn loopback_any() -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
    }

    fn start() -> (SocketAddr, Receiver<String>) {
        let Claim::Owner(server) = claim(loopback_any()).unwrap() else {
            panic!("fresh port must be claimable");
        };
        let addr = server.local_addr().unwrap();
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
        server.spawn(tx).unwrap();
        (addr, rx)
    }

    fn send_raw(addr: SocketAddr, bytes: &[u8]) {
        let mut s = TcpStream::connect(addr).unwrap();
        s.write_all(bytes).unwrap();
    }

    fn recv(rx: &Receiver<String>) -> String {
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn second_claim_is_taken() {
        let Claim::Owner(first) = claim(loopback_any()).unwrap() else {
            panic!("expected owner");
        };
        let addr = first.local_addr().unwrap();
        assert!(matches!(claim(addr).unwrap(), Claim::Taken));
    }

    #[test]
    fn concurrent_claims_have_one_owner() {
        // Find a free port, release it, then race for it.
        let addr = {
            let l = TcpListener::bind(loopback_any()).unwrap();
            l.local_addr().unwrap()
        };
        let n = 8;
        let barrier = Arc::new(Barrier::new(n));
        let handles: Vec<_> = (0..n)
            .map(|_| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    let claimed = claim(addr).unwrap();
                    let owner = matches!(claimed, Claim::Owner(_));
                    // Hold the listener until everyone has tried.
                    barrier.wait();
                    drop(claimed);
                    owner
                })
            })
            .collect();
        let owners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|owner| *owner)
            .count();
        assert_eq!(owners, 1);
    }

    #[test]
    fn words_arrive_in_order_and_trimmed() {
        let (addr, rx) = start();
        send_raw(addr, b"  hello\n");
        assert_eq!(recv(&rx), "hello");
        send_raw(addr, "data race".as_bytes());
        assert_eq!(recv(&rx), "data race");
    }

    #[test]
    fn bad_connections_do_not_stop_the_loop() {
        let (addr, rx) = start();
        // Zero bytes, whitespace only, malformed UTF-8.
        drop(TcpStream::connect(addr).unwrap());
        send_raw(addr, b"   ");
        send_raw(addr, &[0xff, 0xfe, 0x41]);
        send_raw(addr, b"after");
        assert_eq!(recv(&rx), "after");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn oversized_payload_is_truncated() {
        let (addr, rx) = start();
        let long = "x".repeat(MAX_WORD_BYTES * 3);
        send_raw(addr, long.as_bytes());
        let got = recv(&rx);
        assert!(!got.is_empty());
        assert!(got.len() <= MAX_WORD_BYTES);
        assert!(got.chars().all(|c| c == 'x'));
    }

    #[test]
    fn loop_ends_when_receiver_dropped() {
        let Claim::Owner(server) = claim(loopback_any()).unwrap() else {
            panic!("expected owner");
        };
        let addr = server.local_addr().unwrap();
        let (tx, rx) = mpsc::sync_channel(1);
        let handle = server.spawn(tx).unwrap();
        drop(rx);
        send_raw(addr, b"orphan");
        handle.join().unwrap();
    }
}
