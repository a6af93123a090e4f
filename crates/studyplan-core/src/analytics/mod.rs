//! Study analytics for Studyplan
//!
//! This module aggregates logged study sessions and task records into
//! pattern reports (average session length, most productive hours),
//! hour-of-day and weekday breakdowns, the dashboard overview with its
//! productivity score, and study-streak bookkeeping.
//!
//! Everything here is a pure pass over records the caller already fetched.

mod breakdown;
mod dashboard;
mod patterns;
mod streak;

pub use breakdown::{hourly_productivity, weekly_patterns, HourlyProductivity, WeeklyPattern};
pub use dashboard::{productivity_score, DailyProgress, Dashboard, Overview, StreakSummary};
pub use patterns::{
    analyze_patterns, subject_performance, PatternAnalysis, PatternAnalyzer, SubjectPerformance,
};
pub use streak::StreakRecord;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{deserialize_optional_timestamp, deserialize_timestamp};

/// A logged study session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub end_time: Option<DateTime<Utc>>,
    /// Minutes; absent while a session is still running
    #[serde(default)]
    pub duration: Option<u32>,
    /// 1 (distracted) to 5 (deep focus)
    #[serde(default)]
    pub focus_rating: Option<u8>,
    #[serde(default)]
    pub mood_before: Option<u8>,
    #[serde(default)]
    pub mood_after: Option<u8>,
}

impl StudySession {
    pub fn new(start_time: DateTime<Utc>, duration: u32) -> Self {
        Self {
            id: None,
            task_id: None,
            start_time,
            end_time: None,
            duration: Some(duration),
            focus_rating: None,
            mood_before: None,
            mood_after: None,
        }
    }

    pub fn with_focus(mut self, rating: u8) -> Self {
        self.focus_rating = Some(rating);
        self
    }

    pub fn with_moods(mut self, before: u8, after: u8) -> Self {
        self.mood_before = Some(before);
        self.mood_after = Some(after);
        self
    }

    /// Focus rating, ignoring unset and zero ratings.
    pub fn rated_focus(&self) -> Option<u8> {
        self.focus_rating.filter(|r| *r > 0)
    }

    /// Logged minutes, zero when absent.
    pub fn minutes(&self) -> u32 {
        self.duration.unwrap_or(0)
    }

    /// Mood after minus mood before, when both were recorded.
    pub fn mood_change(&self) -> Option<i32> {
        match (self.mood_before, self.mood_after) {
            (Some(before), Some(after)) => Some(i32::from(after) - i32::from(before)),
            _ => None,
        }
    }
}

/// Sessions that started within the `days` calendar days ending on `until`.
pub fn sessions_in_period(
    sessions: &[StudySession],
    until: NaiveDate,
    days: u32,
) -> Vec<StudySession> {
    let from = until - Duration::days(i64::from(days));
    sessions
        .iter()
        .filter(|s| {
            let day = s.start_time.date_naive();
            day > from && day <= until
        })
        .cloned()
        .collect()
}

/// Running mean that ignores missing samples.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Mean {
    total: f64,
    count: u32,
}

impl Mean {
    pub(crate) fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    pub(crate) fn add_opt(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.add(v);
        }
    }

    /// Mean of the samples, `None` when there are none.
    pub(crate) fn get(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / f64::from(self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn session_deserializes_sqlite_timestamps() {
        let session: StudySession = serde_json::from_str(
            r#"{"start_time":"2024-05-01 14:05:00","duration":30,"focus_rating":4}"#,
        )
        .unwrap();
        assert_eq!(
            session.start_time,
            Utc.with_ymd_and_hms(2024, 5, 1, 14, 5, 0).unwrap()
        );
        assert_eq!(session.rated_focus(), Some(4));
        assert!(session.end_time.is_none());
    }

    #[test]
    fn zero_focus_counts_as_unrated() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(StudySession::new(start, 25).with_focus(0).rated_focus(), None);
    }

    #[test]
    fn mood_change_needs_both_values() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut session = StudySession::new(start, 25).with_moods(2, 4);
        assert_eq!(session.mood_change(), Some(2));
        session.mood_before = None;
        assert_eq!(session.mood_change(), None);
    }

    #[test]
    fn period_covers_trailing_days() {
        let at = |day| StudySession::new(Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(), 25);
        let sessions = vec![at(1), at(3), at(4), at(7), at(8)];
        let until = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        let kept: Vec<u32> = sessions_in_period(&sessions, until, 4)
            .iter()
            .map(|s| chrono::Datelike::day(&s.start_time))
            .collect();
        assert_eq!(kept, vec![4, 7]);
        assert!(sessions_in_period(&sessions, until, 0).is_empty());
    }

    #[test]
    fn mean_ignores_missing() {
        let mut mean = Mean::default();
        assert_eq!(mean.get(), None);
        mean.add_opt(None);
        mean.add(2.0);
        mean.add_opt(Some(4.0));
        assert_eq!(mean.get(), Some(3.0));
    }
}
