//! Client process launching

pub mod launcher;

pub use launcher::{ClientLauncher, ProcessLauncher};
