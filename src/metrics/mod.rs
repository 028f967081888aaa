//! Timing collection and reporting

pub mod timing;

pub use timing::TimingCollector;
