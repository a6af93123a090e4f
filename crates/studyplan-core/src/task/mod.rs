//! Study task records as read by the scheduler and analytics.
//!
//! Tasks are created and persisted by the surrounding application. The
//! scheduler only reads them: it never changes a task's status, it proposes
//! where the task should go.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::time::deserialize_optional_timestamp;

/// Task priority.
///
/// Stored as free text. Anything other than `low`/`medium`/`high`, or a
/// missing value, reads as [`Priority::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Ordering weight: high 3, medium 2, low 1.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// Lenient parse used for stored values.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Priority::from_label).unwrap_or_default())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(label)
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Missed,
}

fn default_difficulty() -> u8 {
    3
}

/// A study task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text subject label
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    /// Planned minutes; always positive for a valid task
    pub estimated_duration: u32,
    /// Minutes actually logged against this task
    #[serde(default)]
    pub actual_duration: u32,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    /// 1 (easy) to 5 (hard)
    #[serde(default = "default_difficulty")]
    pub difficulty_level: u8,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    /// Create a pending, medium-priority task with default difficulty.
    pub fn new(id: impl Into<String>, title: impl Into<String>, estimated_duration: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            subject: String::new(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            estimated_duration,
            actual_duration: 0,
            due_date: None,
            difficulty_level: default_difficulty(),
            tags: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_difficulty(mut self, difficulty_level: u8) -> Self {
        self.difficulty_level = difficulty_level;
        self
    }

    pub fn with_actual_duration(mut self, minutes: u32) -> Self {
        self.actual_duration = minutes;
        self
    }

    /// Check the invariants the scheduler relies on.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty title, a zero estimate or a difficulty
    /// outside 1..=5.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        if self.estimated_duration == 0 {
            return Err(ValidationError::invalid(
                "estimated_duration",
                format!("task '{}' must have a positive estimate", self.id),
            ));
        }
        if !(1..=5).contains(&self.difficulty_level) {
            return Err(ValidationError::invalid(
                "difficulty_level",
                format!("{} is outside 1..=5", self.difficulty_level),
            ));
        }
        Ok(())
    }
}

/// Tasks still waiting to be studied, in input order.
pub fn pending_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .cloned()
        .collect()
}
