//! 排队看板 - per-day queue derived from appointments and billing totals

pub mod aggregator;

pub use aggregator::{QueueAggregator, queue_status};
