//! Blocking task operations: the delay and the sequential file read
//!
//! These are the only blocking primitives the workload is built from, besides
//! the session drain. None of them are cancellable mid-flight; a run can only
//! be awaited to completion.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::info;

/// Chunk size for sequential file reads, matching the session read buffer.
pub const IO_CHUNK_SIZE: usize = 65535;

/// Blocking delay task: sleep for the configured duration, then return
/// the trivially transformed input so the work cannot be optimized away.
pub fn delayed_sum(value: u64, delay: Duration) -> u64 {
    thread::sleep(delay);
    value.wrapping_add(9999)
}

/// Best-effort file size probe. Returns 0 on failure; used only to pre-size
/// the read buffer, never for correctness.
pub fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Whether the file can be opened for reading. The synchronous file
/// scenario abandons its run when this fails.
pub fn file_readable(path: &Path) -> bool {
    File::open(path).is_ok()
}

/// Read a file to completion in fixed-size chunks, accumulating the content.
/// Returns the total byte count.
pub fn read_entire_file(path: &Path) -> io::Result<u64> {
    let mut file = File::open(path)?;

    info!("reading file {}...", path.display());

    let mut output: Vec<u8> = Vec::with_capacity(file_size(path) as usize);
    let mut chunk = vec![0u8; IO_CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                output.extend_from_slice(&chunk[..n]);
                total += n as u64;
            }
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    info!("read {} bytes from file {}", total, path.display());
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Instant;

    #[test]
    fn test_delayed_sum_adds_constant() {
        let start = Instant::now();
        let result = delayed_sum(1, Duration::from_millis(20));
        assert_eq!(result, 10000);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_read_entire_file_counts_bytes() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let payload: Vec<u8> = (0..100_000).map(|_| fastrand::u8(..)).collect();
        file.write_all(&payload).expect("write payload");

        let bytes = read_entire_file(file.path()).expect("read file");
        assert_eq!(bytes, payload.len() as u64);
    }

    #[test]
    fn test_read_entire_file_missing() {
        assert!(read_entire_file(Path::new("does/not/exist.dummy")).is_err());
    }

    #[test]
    fn test_file_size_missing_is_zero() {
        assert_eq!(file_size(Path::new("does/not/exist.dummy")), 0);
    }

    #[test]
    fn test_file_readable() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        assert!(file_readable(file.path()));
        assert!(!file_readable(Path::new("does/not/exist.dummy")));
    }
}
