//! stream-client - Companion client for io-backend-bench
//!
//! Connects the requested number of TCP clients to the benchmark server and
//! streams a file over each connection, then closes it so the server sees EOF.

use std::fs::File;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use std::thread;

use clap::Parser;

use io_backend_bench::workload::IO_CHUNK_SIZE;

/// Streams a file to the benchmark server over N TCP connections
#[derive(Parser, Debug)]
#[command(name = "stream-client")]
#[command(version, about, long_about = None)]
struct Args {
    /// Server port to connect to
    port: u16,

    /// Number of concurrent client connections
    #[arg(default_value_t = 1)]
    clients: usize,

    /// File streamed over each connection
    #[arg(long = "file", default_value = "data/1G.dummy")]
    file: PathBuf,
}

fn run_client(id: usize, port: u16, path: &PathBuf) {
    println!("Waiting for connecting the server... ({})", id);

    let mut stream = match TcpStream::connect(("127.0.0.1", port)) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Failed to connect to the server: {}", e);
            return;
        }
    };

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open dummy file {:?}: {}", path, e);
            return;
        }
    };

    let mut buffer = vec![0u8; IO_CHUNK_SIZE];
    loop {
        let bytes = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                eprintln!("Failed to read dummy file: {}", e);
                return;
            }
        };

        if let Err(e) = stream.write_all(&buffer[..bytes]) {
            eprintln!("Server lost the connection: {}", e);
            return;
        }
    }

    println!("Success to send dummy file to the server ({})", id);
}

fn main() {
    let args = Args::parse();

    let mut clients = Vec::with_capacity(args.clients);
    for id in 0..args.clients {
        let file = args.file.clone();
        let handle = thread::Builder::new()
            .name(format!("client-{}", id))
            .spawn(move || run_client(id, args.port, &file))
            .expect("Failed to spawn client thread");
        clients.push(handle);
    }

    for handle in clients {
        let _ = handle.join();
    }
}
