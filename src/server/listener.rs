//! Listening socket and the concurrent accept round
//!
//! `accept_n` runs the accept loop on its own thread while the client
//! launcher is triggered on the calling thread. The loop polls the listener
//! with a short timeout so a failed launch can raise a stop flag and the
//! thread is always joined, never orphaned.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token};
use tracing::{info, warn};

use super::session::Session;
use crate::client::ClientLauncher;
use crate::utils::ServerError;

const LISTENER_TOKEN: Token = Token(0);

/// How often the accept loop wakes up to check the stop flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Ordered accept slots for one round. Length is exactly N on a successful
/// round; a failed accept leaves a `None` slot ("no data, skip"); the set is
/// cleared wholesale when the client launch fails.
#[derive(Default)]
pub struct SessionSet {
    slots: Vec<Option<Session>>,
}

impl SessionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            slots: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, session: Session) {
        self.slots.push(Some(session));
    }

    fn push_failed(&mut self) {
        self.slots.push(None);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding a live session.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Consume the set, dropping failed slots.
    pub fn into_sessions(self) -> Vec<Session> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Owner of the listening socket.
///
/// States: Unbound -> Listening -> Closed. `listen` may be called again
/// after `close` to rebind for a fresh scenario; mio sets SO_REUSEADDR on
/// bind, so the port can be reclaimed immediately.
pub struct SessionServer {
    port: u16,
    listener: Option<TcpListener>,
}

impl SessionServer {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            listener: None,
        }
    }

    /// Bind and start listening. Fails if the port is held by an unrelated
    /// process; that is fatal to the scenario, before any timing starts.
    pub fn listen(&mut self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("127.0.0.1:{}", self.port)
            .parse()
            .expect("loopback address is always valid");
        let listener = TcpListener::bind(addr).map_err(|e| ServerError::Bind {
            port: self.port,
            source: e,
        })?;
        self.listener = Some(listener);
        Ok(())
    }

    /// The actual bound port (differs from the requested one when binding
    /// port 0).
    pub fn port(&self) -> Result<u16, ServerError> {
        let listener = self.listener.as_ref().ok_or(ServerError::NotListening)?;
        Ok(listener
            .local_addr()
            .map_err(ServerError::Accept)?
            .port())
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Release the bound port. A later `listen` call rebinds.
    pub fn close(&mut self) {
        self.listener = None;
    }

    /// Accept exactly `n` sessions concurrently with launching the clients.
    ///
    /// Returns exactly `n` slots, or an empty set when the launcher fails to
    /// start the client process or the round exits abnormally; there is no
    /// partial-success contract. The accept thread is joined on every path.
    pub fn accept_n(
        &mut self,
        n: usize,
        launcher: &dyn ClientLauncher,
    ) -> Result<SessionSet, ServerError> {
        let port = self.port()?;
        let listener = self.listener.as_mut().ok_or(ServerError::NotListening)?;

        let stop = AtomicBool::new(false);
        let stop_ref = &stop;

        let set = thread::scope(|s| {
            let accept_thread = s.spawn(move || Self::accept_loop(listener, n, stop_ref));

            let launched = launcher.launch(port, n);
            if !launched {
                warn!("failed to launch clients; abandoning accept round");
                stop.store(true, Ordering::SeqCst);
            }

            let mut set = match accept_thread.join() {
                Ok(set) => set,
                Err(_) => {
                    warn!("accept thread panicked");
                    SessionSet::empty()
                }
            };

            // All-or-nothing: a failed launch discards accepted sessions.
            if !launched {
                set.clear();
            }
            set
        });

        Ok(set)
    }

    fn accept_loop(listener: &mut TcpListener, n: usize, stop: &AtomicBool) -> SessionSet {
        let mut set = SessionSet::with_capacity(n);

        let mut poll = match Poll::new() {
            Ok(poll) => poll,
            Err(e) => {
                warn!("failed to create accept poll: {}", e);
                return SessionSet::empty();
            }
        };
        let mut events = Events::with_capacity(8);

        if let Err(e) = poll
            .registry()
            .register(listener, LISTENER_TOKEN, Interest::READABLE)
        {
            warn!("failed to register listener: {}", e);
            return SessionSet::empty();
        }

        'accepting: while set.len() < n {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            match poll.poll(&mut events, Some(ACCEPT_POLL_INTERVAL)) {
                Ok(()) => {}
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("accept poll failed: {}", e);
                    break 'accepting;
                }
            }

            // Edge-triggered wakeup: accept until WouldBlock.
            loop {
                if set.len() >= n {
                    break 'accepting;
                }
                match listener.accept() {
                    Ok((stream, peer)) => {
                        info!("accepted client {} from {}", set.len(), peer);
                        match Session::new(stream) {
                            Ok(session) => set.push(session),
                            Err(e) => {
                                warn!("failed to set up session: {}", e);
                                set.push_failed();
                            }
                        }
                    }
                    Err(ref e) if e.kind() == ErrorKind::WouldBlock => break,
                    Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        warn!("failed to accept client: {}", e);
                        set.push_failed();
                    }
                }
            }
        }

        let _ = poll.registry().deregister(listener);

        // All-or-nothing: an abnormal exit (stop flag, poll failure) must
        // not hand back a short round.
        if set.len() < n {
            set.clear();
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpStream as StdTcpStream;

    /// Test launcher that connects in-process sender threads instead of
    /// spawning an external client binary.
    struct ThreadLauncher {
        payload: Vec<u8>,
    }

    impl ThreadLauncher {
        fn new(payload: Vec<u8>) -> Self {
            Self { payload }
        }
    }

    impl ClientLauncher for ThreadLauncher {
        fn launch(&self, port: u16, clients: usize) -> bool {
            for _ in 0..clients {
                let payload = self.payload.clone();
                thread::spawn(move || {
                    if let Ok(mut stream) = StdTcpStream::connect(("127.0.0.1", port)) {
                        let _ = stream.write_all(&payload);
                    }
                });
            }
            true
        }
    }

    struct FailingLauncher;

    impl ClientLauncher for FailingLauncher {
        fn launch(&self, _port: u16, _clients: usize) -> bool {
            false
        }
    }

    fn listening_server() -> SessionServer {
        let mut server = SessionServer::new(0);
        server.listen().expect("listen");
        server
    }

    #[test]
    fn test_accept_exactness() {
        let mut server = listening_server();
        let launcher = ThreadLauncher::new(vec![b'a'; 64]);

        let set = server.accept_n(3, &launcher).expect("accept round");
        assert_eq!(set.len(), 3);
        assert_eq!(set.live_count(), 3);

        let peers: Vec<_> = set
            .into_sessions()
            .iter()
            .map(|s| s.peer_addr())
            .collect();
        assert_eq!(peers.len(), 3);
        // Each session is bound to a distinct accepted socket.
        assert!(peers.iter().all(|p| peers.iter().filter(|q| *q == p).count() == 1));
    }

    #[test]
    fn test_single_client_echo() {
        let mut server = listening_server();
        let launcher = ThreadLauncher::new(vec![b'1'; 131072]);

        let set = server.accept_n(1, &launcher).expect("accept round");
        server.close();
        assert_eq!(set.len(), 1);

        let mut sessions = set.into_sessions();
        let bytes = sessions[0].drain().expect("drain");
        assert_eq!(bytes, 131072);
    }

    #[test]
    fn test_failed_launch_returns_empty_set() {
        let mut server = listening_server();

        let set = server.accept_n(3, &FailingLauncher).expect("accept round");
        assert!(set.is_empty());
        // The server is still usable for the next round.
        assert!(server.is_listening());
    }

    #[test]
    fn test_rebind_after_close() {
        let mut server = listening_server();
        let port = server.port().expect("port");
        server.close();
        assert!(!server.is_listening());

        let mut server = SessionServer::new(port);
        server.listen().expect("rebind");
        assert_eq!(server.port().expect("port"), port);
    }

    #[test]
    fn test_port_in_use_is_fatal() {
        let server = listening_server();
        let port = server.port().expect("port");

        let mut second = SessionServer::new(port);
        match second.listen() {
            Err(ServerError::Bind { port: p, .. }) => assert_eq!(p, port),
            other => panic!("expected bind failure, got {:?}", other.err()),
        }
    }

    /// An accept round that stops mid-way never hands back a short set:
    /// the result is exactly n slots or empty.
    #[test]
    fn test_interrupted_round_discards_partial_accepts() {
        use std::sync::Arc;

        let mut listener = TcpListener::bind("127.0.0.1:0".parse().expect("addr")).expect("bind");
        let port = listener.local_addr().expect("addr").port();

        // Only two of the three requested clients ever connect.
        let dummies: Vec<_> = (0..2)
            .map(|_| {
                thread::spawn(move || {
                    if let Ok(stream) = StdTcpStream::connect(("127.0.0.1", port)) {
                        thread::sleep(Duration::from_millis(600));
                        drop(stream);
                    }
                })
            })
            .collect();

        let stop = Arc::new(AtomicBool::new(false));
        let stopper = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(300));
                stop.store(true, Ordering::SeqCst);
            })
        };

        let set = SessionServer::accept_loop(&mut listener, 3, &stop);
        assert!(set.is_empty());

        stopper.join().expect("stopper");
        for dummy in dummies {
            dummy.join().expect("dummy client");
        }
    }

    #[test]
    fn test_accept_then_drain_all() {
        let mut server = listening_server();
        let launcher = ThreadLauncher::new(vec![b'z'; 1000]);

        let set = server.accept_n(5, &launcher).expect("accept round");
        server.close();
        assert_eq!(set.live_count(), 5);

        for mut session in set.into_sessions() {
            assert_eq!(session.drain().expect("drain"), 1000);
        }
    }
}
