//! Launching the companion client process
//!
//! The launcher is fire-and-forget: it reports only whether the spawn itself
//! succeeded. The child's per-connection behavior is invisible to the
//! harness, which is why the session server cannot distinguish a crashed
//! client from a slow one.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{error, info};

/// Starts whatever connects `clients` TCP sockets to `port` and streams a
/// file to each. Implemented by `ProcessLauncher` in production and by
/// in-process thread launchers in tests.
pub trait ClientLauncher {
    fn launch(&self, port: u16, clients: usize) -> bool;
}

/// Spawns the `stream-client` executable.
pub struct ProcessLauncher {
    exe: PathBuf,
    stream_file: PathBuf,
}

impl ProcessLauncher {
    pub fn new(exe: PathBuf, stream_file: PathBuf) -> Self {
        Self { exe, stream_file }
    }

    /// Default client executable location: `stream-client` next to the
    /// current binary, falling back to a bare name resolved via PATH.
    pub fn default_exe() -> PathBuf {
        env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .map(|dir| dir.join("stream-client"))
            .unwrap_or_else(|| PathBuf::from("stream-client"))
    }
}

impl ClientLauncher for ProcessLauncher {
    fn launch(&self, port: u16, clients: usize) -> bool {
        match Command::new(&self.exe)
            .arg(port.to_string())
            .arg(clients.to_string())
            .arg("--file")
            .arg(&self.stream_file)
            .spawn()
        {
            Ok(child) => {
                info!(
                    "launched client process (pid {}) with {} connections to port {}",
                    child.id(),
                    clients,
                    port
                );
                true
            }
            Err(e) => {
                error!(
                    "failed to spawn client process {}: {}",
                    self.exe.display(),
                    e
                );
                false
            }
        }
    }
}
