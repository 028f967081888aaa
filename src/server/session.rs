//! One accepted TCP connection and its drain-to-EOF read

use std::io::{ErrorKind, Read};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mio::net::TcpStream;
use mio::{Events, Interest, Poll, Token};
use tracing::debug;

use crate::utils::ServerError;

/// Per-read buffer size for session drains.
pub const READ_BUFFER_SIZE: usize = 65535;

const SESSION_TOKEN: Token = Token(0);

/// One live accepted connection.
///
/// A session has a single reader: `drain` is not re-entrant and a session
/// must never be shared between two concurrent callers. The accumulated byte
/// count lives behind an `Arc` so it stays observable after the session has
/// been consumed by a workload task.
pub struct Session {
    stream: TcpStream,
    poll: Poll,
    events: Events,
    peer: SocketAddr,
    bytes_read: Arc<AtomicU64>,
    open: bool,
}

impl Session {
    /// Wrap an accepted non-blocking stream and register it for readiness.
    pub(crate) fn new(mut stream: TcpStream) -> std::io::Result<Self> {
        let peer = stream.peer_addr()?;
        let poll = Poll::new()?;
        poll.registry()
            .register(&mut stream, SESSION_TOKEN, Interest::READABLE)?;

        Ok(Self {
            stream,
            poll,
            events: Events::with_capacity(8),
            peer,
            bytes_read: Arc::new(AtomicU64::new(0)),
            open: true,
        })
    }

    /// Read until the peer cleanly closes the connection.
    ///
    /// Waits for readability, pulls up to `READ_BUFFER_SIZE` bytes per
    /// syscall into an accumulating buffer, and loops until EOF or an I/O
    /// error. On EOF the connection is closed and the total byte count
    /// returned. On error the bytes drained so far remain visible through
    /// `bytes_read`; the caller decides whether to continue the run.
    pub fn drain(&mut self) -> Result<u64, ServerError> {
        let mut chunk = vec![0u8; READ_BUFFER_SIZE];
        let mut output: Vec<u8> = Vec::new();

        loop {
            self.poll
                .poll(&mut self.events, None)
                .map_err(ServerError::Poll)?;

            // mio is edge-triggered: read until WouldBlock on every wakeup.
            loop {
                match self.stream.read(&mut chunk) {
                    Ok(0) => {
                        debug!("peer {} closed the connection", self.peer);
                        self.close();
                        return Ok(self.bytes_read.load(Ordering::Relaxed));
                    }
                    Ok(n) => {
                        output.extend_from_slice(&chunk[..n]);
                        self.bytes_read.fetch_add(n as u64, Ordering::Relaxed);
                    }
                    Err(ref e) if e.kind() == ErrorKind::WouldBlock => break,
                    Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.close();
                        return Err(ServerError::Read {
                            bytes: self.bytes_read.load(Ordering::Relaxed),
                            source: e,
                        });
                    }
                }
            }
        }
    }

    /// Total bytes drained so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Relaxed)
    }

    /// Shared handle to the byte counter, usable after the session has been
    /// moved into a workload.
    pub fn bytes_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.bytes_read)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    fn close(&mut self) {
        let _ = self.poll.registry().deregister(&mut self.stream);
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener as StdTcpListener;
    use std::thread;

    fn accept_one(listener: &StdTcpListener) -> Session {
        let (stream, _) = listener.accept().expect("accept");
        stream.set_nonblocking(true).expect("nonblocking");
        Session::new(TcpStream::from_std(stream)).expect("session")
    }

    #[test]
    fn test_drain_to_eof() {
        let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");

        let payload: Vec<u8> = (0..100_000).map(|_| fastrand::u8(..)).collect();
        let expected = payload.len() as u64;
        let sender = thread::spawn(move || {
            let mut stream = std::net::TcpStream::connect(addr).expect("connect");
            stream.write_all(&payload).expect("send");
        });

        let mut session = accept_one(&listener);
        assert!(session.is_open());

        let bytes = session.drain().expect("drain");
        assert_eq!(bytes, expected);
        assert_eq!(session.bytes_read(), expected);
        assert!(!session.is_open());
        sender.join().expect("sender");
    }

    #[test]
    fn test_drain_multiple_writes() {
        let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");

        let sender = thread::spawn(move || {
            let mut stream = std::net::TcpStream::connect(addr).expect("connect");
            for _ in 0..10 {
                stream.write_all(&[b'x'; 1000]).expect("send");
                thread::sleep(std::time::Duration::from_millis(2));
            }
        });

        let mut session = accept_one(&listener);
        let bytes = session.drain().expect("drain");
        assert_eq!(bytes, 10_000);
        sender.join().expect("sender");
    }

    #[test]
    fn test_bytes_handle_survives_move() {
        let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");

        let sender = thread::spawn(move || {
            let mut stream = std::net::TcpStream::connect(addr).expect("connect");
            stream.write_all(&[b'1'; 4096]).expect("send");
        });

        let session = accept_one(&listener);
        let handle = session.bytes_handle();

        let drainer = thread::spawn(move || {
            let mut session = session;
            session.drain().expect("drain")
        });
        assert_eq!(drainer.join().expect("drainer"), 4096);
        assert_eq!(handle.load(Ordering::Relaxed), 4096);
        sender.join().expect("sender");
    }
}
