//! # Studyplan Core Library
//!
//! This library provides the scheduling and analytics logic behind the
//! Studyplan study assistant. Every operation is a pure function over
//! records the caller supplies; the CLI binary is a thin layer that reads
//! JSON inputs and prints JSON results.
//!
//! ## Architecture
//!
//! - **Scheduler**: greedy daily packer, Pomodoro segmenter and single-task
//!   time suggester
//! - **Analytics**: study pattern analysis, hourly and weekly breakdowns,
//!   dashboard overview and streak bookkeeping
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SmartScheduler`]: Daily schedule generation
//! - [`PatternAnalyzer`]: Study pattern report
//! - [`Dashboard`]: Overview with productivity score
//! - [`Config`]: Application configuration management

pub mod analytics;
pub mod error;
pub mod preferences;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod time;

pub use analytics::{
    analyze_patterns, Dashboard, PatternAnalysis, PatternAnalyzer, StreakRecord, StudySession,
};
pub use error::{ConfigError, CoreError, ValidationError};
pub use preferences::{PreferenceOverrides, UserPreferences, WorkingWindow};
pub use scheduler::{
    generate_schedule, segment_duration, suggest_task_time, ScheduleResult, SmartScheduler,
    TimeSuggestion,
};
pub use storage::Config;
pub use task::{pending_tasks, Priority, Task, TaskStatus};
pub use time::ClockTime;
