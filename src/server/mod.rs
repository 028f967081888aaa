//! TCP session server
//!
//! The server accepts exactly N client connections concurrently with the
//! client process being launched, then hands the accepted sessions to a
//! workload for draining.

pub mod listener;
pub mod session;

pub use listener::{SessionServer, SessionSet};
pub use session::{Session, READ_BUFFER_SIZE};
