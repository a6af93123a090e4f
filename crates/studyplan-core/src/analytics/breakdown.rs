//! Hour-of-day and weekday breakdowns of study sessions.

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Mean, StudySession};
use crate::time::round1;

/// Sessions started within one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyProductivity {
    /// Hour of day (0-23)
    pub hour: u32,
    /// Mean focus of rated sessions, 0 when none are rated
    pub avg_focus: f64,
    /// Mean logged minutes, rounded
    pub avg_duration: u32,
    pub session_count: u32,
}

/// Sessions started on one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPattern {
    pub day_of_week: Weekday,
    pub avg_focus: f64,
    pub total_hours: f64,
    pub session_count: u32,
}

#[derive(Default)]
struct Bucket {
    focus: Mean,
    duration: Mean,
    total_minutes: u64,
    count: u32,
}

impl Bucket {
    fn record(&mut self, session: &StudySession) {
        self.count += 1;
        self.focus.add_opt(session.rated_focus().map(f64::from));
        self.duration.add_opt(session.duration.map(f64::from));
        self.total_minutes += u64::from(session.minutes());
    }
}

/// Breakdown by hour of day, ascending; hours without sessions are omitted.
pub fn hourly_productivity(sessions: &[StudySession]) -> Vec<HourlyProductivity> {
    let mut buckets: BTreeMap<u32, Bucket> = BTreeMap::new();
    for session in sessions {
        buckets
            .entry(session.start_time.hour())
            .or_default()
            .record(session);
    }

    buckets
        .into_iter()
        .map(|(hour, b)| HourlyProductivity {
            hour,
            avg_focus: round1(b.focus.get().unwrap_or(0.0)),
            avg_duration: b.duration.get().unwrap_or(0.0).round() as u32,
            session_count: b.count,
        })
        .collect()
}

/// Breakdown by weekday, Sunday first; days without sessions are omitted.
pub fn weekly_patterns(sessions: &[StudySession]) -> Vec<WeeklyPattern> {
    let mut buckets: BTreeMap<u32, (Weekday, Bucket)> = BTreeMap::new();
    for session in sessions {
        let weekday = session.start_time.weekday();
        buckets
            .entry(weekday.num_days_from_sunday())
            .or_insert_with(|| (weekday, Bucket::default()))
            .1
            .record(session);
    }

    buckets
        .into_values()
        .map(|(day_of_week, b)| WeeklyPattern {
            day_of_week,
            avg_focus: round1(b.focus.get().unwrap_or(0.0)),
            total_hours: round1(b.total_minutes as f64 / 60.0),
            session_count: b.count,
        })
        .collect()
}
