//! Start-time suggestion for a single newly created task.
//!
//! Unlike the daily packer this looks at one task in isolation: it does not
//! know what else is planned, only how close the deadline is.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

use crate::preferences::UserPreferences;
use crate::time::at_minute;

/// Earliest hour of day a suggestion may start at.
const EARLIEST_HOUR: u32 = 8;
/// Latest hour of day a suggestion may start at.
const LATEST_HOUR: u32 = 20;
/// Where too-early and too-late suggestions are moved to.
const MORNING_START_MINUTE: u32 = 9 * 60;

/// Tasks longer than this get a note about being split into sessions.
const SPLIT_NOTE_THRESHOLD_MIN: u32 = 60;

/// How pressing a task's deadline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Due within 24 hours (or overdue)
    Urgent,
    /// Due within 72 hours
    Upcoming,
    /// Due later, or no due date
    Relaxed,
}

impl Urgency {
    pub fn classify(due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match due_date {
            Some(due) if due - now < Duration::hours(24) => Urgency::Urgent,
            Some(due) if due - now < Duration::hours(72) => Urgency::Upcoming,
            _ => Urgency::Relaxed,
        }
    }

    fn reason(self) -> Option<&'static str> {
        match self {
            Urgency::Urgent => Some("Scheduled urgently due to approaching deadline"),
            Urgency::Upcoming => Some("Prioritized due to upcoming deadline"),
            Urgency::Relaxed => None,
        }
    }
}

/// Proposed slot for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSuggestion {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub urgency: Urgency,
    pub rationale: String,
}

/// Suggest a slot relative to the current time.
pub fn suggest_task_time(
    estimated_minutes: u32,
    due_date: Option<DateTime<Utc>>,
    prefs: Option<&UserPreferences>,
) -> TimeSuggestion {
    suggest_task_time_at(estimated_minutes, due_date, prefs, Utc::now())
}

/// Suggest a slot relative to `now`.
///
/// The baseline is the top of the hour one hour from now. A deadline within
/// 24 hours pulls the start to `now + 30min`, within 72 hours to
/// `now + 2h`. Starts before 08:00 move to 09:00 the same day; starts after
/// 20:59 move to 09:00 the next day. `prefs` is `None` when the user has no
/// stored preferences.
pub fn suggest_task_time_at(
    estimated_minutes: u32,
    due_date: Option<DateTime<Utc>>,
    prefs: Option<&UserPreferences>,
    now: DateTime<Utc>,
) -> TimeSuggestion {
    let urgency = Urgency::classify(due_date, now);

    let start = match urgency {
        Urgency::Urgent => now + Duration::minutes(30),
        Urgency::Upcoming => now + Duration::hours(2),
        Urgency::Relaxed => {
            let base = now + Duration::hours(1);
            base.duration_trunc(Duration::hours(1)).unwrap_or(base)
        }
    };
    let start = clamp_to_study_hours(start);
    let end = start + Duration::minutes(i64::from(estimated_minutes));

    let mut reasons: Vec<&str> = Vec::new();
    if let Some(reason) = urgency.reason() {
        reasons.push(reason);
    }
    if estimated_minutes > SPLIT_NOTE_THRESHOLD_MIN {
        reasons.push("Broken into focused sessions for better retention");
    }
    if prefs.is_some_and(|p| p.preferred_difficulty > 0) {
        reasons.push("Scheduled considering your preferred difficulty level");
    }
    let rationale = if reasons.is_empty() {
        "Optimally scheduled based on your preferences".to_string()
    } else {
        reasons.join(". ")
    };

    tracing::debug!(%start, %end, ?urgency, "suggested task time");
    TimeSuggestion {
        start,
        end,
        urgency,
        rationale,
    }
}

fn clamp_to_study_hours(start: DateTime<Utc>) -> DateTime<Utc> {
    use chrono::Timelike;

    let date = start.date_naive();
    if start.hour() < EARLIEST_HOUR {
        at_minute(date, MORNING_START_MINUTE).and_utc()
    } else if start.hour() > LATEST_HOUR {
        at_minute(date, MORNING_START_MINUTE).and_utc() + Duration::days(1)
    } else {
        start
    }
}
