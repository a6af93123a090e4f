pub mod config;
pub mod schedule;
pub mod stats;
pub mod task;
