//! Smart daily scheduler for study tasks.
//!
//! This module packs a prioritized task list into one day:
//! - Orders tasks by priority, then by due date (undated last)
//! - Caps the day at the user's daily study goal, truncating the task that
//!   crosses it
//! - Splits each task into Pomodoro sessions and lays them out from the start
//!   of the working window, with short breaks and a long break after every
//!   fourth session of a task
//! - Never lets a block or break run past the end of the working window
//!
//! Packing is greedy and single-pass. Anything that does not fit is reported
//! through free-text recommendations, never as an error.

pub mod segment;
pub mod suggest;

pub use segment::segment_duration;
pub use suggest::{suggest_task_time, suggest_task_time_at, TimeSuggestion, Urgency};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::ValidationError;
use crate::preferences::{PreferenceOverrides, UserPreferences};
use crate::task::{Priority, Task};
use crate::time::{at_minute, round1};

/// Sessions per cycle; the break after the last one in a cycle is long.
pub const SESSIONS_BEFORE_LONG_BREAK: usize = 4;

/// Share of the daily budget that counts as a well-filled day.
const GOOD_DAY_RATIO: f64 = 0.8;

/// Kind of a scheduled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Study,
}

/// Kind of break between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

impl BreakKind {
    /// Break kind following the session at 1-based position `session_number`.
    pub fn after_session(session_number: usize) -> Self {
        if session_number % SESSIONS_BEFORE_LONG_BREAK == 0 {
            BreakKind::Long
        } else {
            BreakKind::Short
        }
    }
}

/// One study session placed on the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledBlock {
    pub task_id: String,
    pub title: String,
    pub subject: String,
    pub priority: Priority,
    pub difficulty: u8,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Minutes
    pub duration: u32,
    /// 1-based position among the task's sessions
    pub session_number: usize,
    pub total_sessions: usize,
    #[serde(rename = "type")]
    pub block_type: BlockType,
}

/// A break placed after a study session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Minutes
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: BreakKind,
}

/// First start and last end of a task's sessions on the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpan {
    pub task_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A full schedule proposal for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub date: NaiveDate,
    pub scheduled_tasks: Vec<ScheduledBlock>,
    pub breaks: Vec<BreakBlock>,
    /// Total study minutes placed
    pub total_study_time: u32,
    pub recommendations: Vec<String>,
}

impl ScheduleResult {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            scheduled_tasks: Vec::new(),
            breaks: Vec::new(),
            total_study_time: 0,
            recommendations: Vec::new(),
        }
    }

    /// One span per scheduled task, in schedule order.
    ///
    /// This is what gets written back onto task records as their scheduled
    /// start and end.
    pub fn task_spans(&self) -> Vec<TaskSpan> {
        let mut spans: Vec<TaskSpan> = Vec::new();
        for block in &self.scheduled_tasks {
            match spans.iter_mut().find(|s| s.task_id == block.task_id) {
                Some(span) => span.end = block.end,
                None => spans.push(TaskSpan {
                    task_id: block.task_id.clone(),
                    start: block.start,
                    end: block.end,
                }),
            }
        }
        spans
    }
}

/// Why the packing loop stopped before the end of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DailyGoalReached,
}

/// How much of a task's allotted time made it onto the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Complete,
    /// The working window ended before all sessions were placed
    Partial,
}

/// Position of the packing loop: wall-clock minute and minutes placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    clock: u32,
    scheduled: u32,
}

/// Order tasks for packing: priority weight descending, then due date
/// ascending with undated tasks last. The sort is stable.
pub fn order_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|a, b| compare_for_packing(a, b));
    ordered
}

fn compare_for_packing(a: &Task, b: &Task) -> Ordering {
    b.priority
        .weight()
        .cmp(&a.priority.weight())
        .then_with(|| due_key(a.due_date).cmp(&due_key(b.due_date)))
}

fn due_key(due: Option<DateTime<Utc>>) -> (bool, Option<DateTime<Utc>>) {
    (due.is_none(), due)
}

/// Greedy single-day scheduler.
#[derive(Debug, Clone, Default)]
pub struct SmartScheduler {
    prefs: UserPreferences,
}

impl SmartScheduler {
    pub fn new(prefs: UserPreferences) -> Self {
        Self { prefs }
    }

    /// Scheduler for `prefs` with per-request overrides applied.
    pub fn with_overrides(prefs: &UserPreferences, overrides: &PreferenceOverrides) -> Self {
        Self::new(prefs.with_overrides(overrides))
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.prefs
    }

    /// Validate inputs, then generate.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure among the preferences and tasks.
    pub fn plan(&self, tasks: &[Task], date: NaiveDate) -> Result<ScheduleResult, ValidationError> {
        self.prefs.validate()?;
        for task in tasks {
            task.validate()?;
        }
        Ok(self.generate_schedule(tasks, date))
    }

    /// Generate a schedule for `date`.
    ///
    /// Inputs are assumed valid (see [`SmartScheduler::plan`]).
    pub fn generate_schedule(&self, tasks: &[Task], date: NaiveDate) -> ScheduleResult {
        let mut result = ScheduleResult::empty(date);
        if tasks.is_empty() {
            return result;
        }

        let budget = self.prefs.daily_budget_minutes();
        let mut cursor = Cursor {
            clock: self.prefs.window.start_time.minutes(),
            scheduled: 0,
        };
        let mut stop = None;

        for task in order_tasks(tasks) {
            if cursor.scheduled >= budget {
                stop = Some(StopReason::DailyGoalReached);
                break;
            }

            let allotted = task.estimated_duration.min(budget - cursor.scheduled);
            if allotted < task.estimated_duration {
                tracing::debug!(
                    task_id = %task.id,
                    estimated = task.estimated_duration,
                    allotted,
                    "task truncated to remaining daily budget"
                );
            }

            let sessions = segment_duration(allotted, self.prefs.pomodoro_length);
            let (next, outcome) = self.place_sessions(task, &sessions, cursor, budget, &mut result);
            cursor = next;

            if outcome == TaskOutcome::Partial {
                tracing::debug!(task_id = %task.id, "working window exhausted mid-task");
                result.recommendations.push(format!(
                    "Task \"{}\" partially scheduled. Remaining time moved to next day.",
                    task.title
                ));
            }
        }

        if stop == Some(StopReason::DailyGoalReached) {
            result.recommendations.push(format!(
                "Daily goal of {} hours reached. Remaining tasks moved to next day.",
                self.prefs.daily_goal_hours
            ));
        }

        result.total_study_time = cursor.scheduled;
        result.recommendations.push(closing_recommendation(cursor.scheduled, budget));

        tracing::info!(
            date = %date,
            blocks = result.scheduled_tasks.len(),
            breaks = result.breaks.len(),
            minutes = result.total_study_time,
            budget,
            "schedule generated"
        );
        result
    }

    /// Lay out one task's sessions from `cursor`, returning the advanced
    /// cursor and whether every session fit.
    fn place_sessions(
        &self,
        task: &Task,
        sessions: &[u32],
        mut cursor: Cursor,
        budget: u32,
        result: &mut ScheduleResult,
    ) -> (Cursor, TaskOutcome) {
        let window_end = self.prefs.window.end_time.minutes();
        let date = result.date;

        for (i, &duration) in sessions.iter().enumerate() {
            if window_end.saturating_sub(cursor.clock) < duration {
                return (cursor, TaskOutcome::Partial);
            }

            let session_number = i + 1;
            result.scheduled_tasks.push(ScheduledBlock {
                task_id: task.id.clone(),
                title: task.title.clone(),
                subject: task.subject.clone(),
                priority: task.priority,
                difficulty: task.difficulty_level,
                start: at_minute(date, cursor.clock),
                end: at_minute(date, cursor.clock + duration),
                duration,
                session_number,
                total_sessions: sessions.len(),
                block_type: BlockType::Study,
            });
            cursor.clock += duration;
            cursor.scheduled += duration;

            // No break once the day's budget is spent on the task's last session.
            let more_sessions = session_number < sessions.len();
            if !more_sessions && cursor.scheduled >= budget {
                continue;
            }

            let kind = BreakKind::after_session(session_number);
            let length = match kind {
                BreakKind::Long => self.prefs.long_break,
                BreakKind::Short => self.prefs.short_break,
            };
            if window_end.saturating_sub(cursor.clock) < length {
                tracing::debug!(task_id = %task.id, session_number, "break skipped at window end");
                continue;
            }

            result.breaks.push(BreakBlock {
                start: at_minute(date, cursor.clock),
                end: at_minute(date, cursor.clock + length),
                duration: length,
                kind,
            });
            cursor.clock += length;
        }

        (cursor, TaskOutcome::Complete)
    }
}

fn closing_recommendation(scheduled: u32, budget: u32) -> String {
    if scheduled >= budget {
        "Excellent! You've planned a full productive day. Remember to take breaks!".to_string()
    } else if f64::from(scheduled) >= f64::from(budget) * GOOD_DAY_RATIO {
        "Great schedule! You're on track to meet your daily goals.".to_string()
    } else {
        let free_hours = round1(f64::from(budget - scheduled) / 60.0);
        format!("You have {free_hours} more hours available for additional tasks.")
    }
}

/// Generate a schedule for `date` from `prefs` with optional overrides.
pub fn generate_schedule(
    tasks: &[Task],
    prefs: &UserPreferences,
    date: NaiveDate,
    overrides: Option<&PreferenceOverrides>,
) -> ScheduleResult {
    let scheduler = match overrides {
        Some(overrides) => SmartScheduler::with_overrides(prefs, overrides),
        None => SmartScheduler::new(prefs.clone()),
    };
    scheduler.generate_schedule(tasks, date)
}
