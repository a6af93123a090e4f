//! Dashboard overview: task counts, daily progress and productivity score.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::patterns::{percent, subject_performance, SubjectPerformance};
use super::{Mean, StreakRecord, StudySession};
use crate::task::{Task, TaskStatus};
use crate::time::round1;

/// Task counts and headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub pending_tasks: u32,
    pub in_progress_tasks: u32,
    pub missed_tasks: u32,
    /// Percent, rounded
    pub completion_rate: u32,
    /// Hours logged on completed tasks
    pub total_study_hours: f64,
    /// Mean minutes logged per completed task, rounded
    pub avg_session_length: u32,
    /// 0-100
    pub productivity_score: u32,
}

/// Study activity on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub study_hours: f64,
    pub focus_rating: f64,
    pub mood_improvement: f64,
    pub session_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    pub total_days: u32,
}

impl From<Option<&StreakRecord>> for StreakSummary {
    fn from(record: Option<&StreakRecord>) -> Self {
        record
            .map(|r| Self {
                current: r.current_streak,
                longest: r.longest_streak,
                total_days: r.total_study_days,
            })
            .unwrap_or_default()
    }
}

/// Everything the dashboard shows for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub overview: Overview,
    pub streaks: StreakSummary,
    /// Most recent day first
    pub daily_progress: Vec<DailyProgress>,
    pub subject_performance: Vec<SubjectPerformance>,
}

#[derive(Default)]
struct Day {
    minutes: u64,
    focus: Mean,
    mood: Mean,
    count: u32,
}

impl Dashboard {
    /// Build from the period's tasks and sessions.
    pub fn build(tasks: &[Task], sessions: &[StudySession], streak: Option<&StreakRecord>) -> Self {
        let mut overview = Overview {
            total_tasks: tasks.len() as u32,
            ..Overview::default()
        };
        let mut completed_time = Mean::default();
        let mut completed_minutes: u64 = 0;

        for task in tasks {
            match task.status {
                TaskStatus::Completed => {
                    overview.completed_tasks += 1;
                    completed_minutes += u64::from(task.actual_duration);
                    if task.actual_duration > 0 {
                        completed_time.add(f64::from(task.actual_duration));
                    }
                }
                TaskStatus::Pending => overview.pending_tasks += 1,
                TaskStatus::InProgress => overview.in_progress_tasks += 1,
                TaskStatus::Missed => overview.missed_tasks += 1,
            }
        }
        overview.completion_rate = percent(overview.completed_tasks, overview.total_tasks);
        overview.total_study_hours = round1(completed_minutes as f64 / 60.0);
        overview.avg_session_length = completed_time.get().unwrap_or(0.0).round() as u32;

        let mut days: BTreeMap<NaiveDate, Day> = BTreeMap::new();
        for session in sessions {
            let day = days.entry(session.start_time.date_naive()).or_default();
            day.minutes += u64::from(session.minutes());
            day.focus.add_opt(session.rated_focus().map(f64::from));
            day.mood.add_opt(session.mood_change().map(f64::from));
            day.count += 1;
        }

        let daily_focus: Vec<f64> = days.values().map(|d| d.focus.get().unwrap_or(0.0)).collect();
        let streaks = StreakSummary::from(streak);
        overview.productivity_score = productivity_score(
            overview.completed_tasks,
            overview.total_tasks,
            &daily_focus,
            streaks.current,
        );

        let daily_progress = days
            .into_iter()
            .rev()
            .map(|(date, d)| DailyProgress {
                date,
                study_hours: round1(d.minutes as f64 / 60.0),
                focus_rating: round1(d.focus.get().unwrap_or(0.0)),
                mood_improvement: round1(d.mood.get().unwrap_or(0.0)),
                session_count: d.count,
            })
            .collect();

        Self {
            overview,
            streaks,
            daily_progress,
            subject_performance: subject_performance(tasks),
        }
    }
}

/// Productivity score (0-100).
///
/// Weighted sum of completion ratio (40), current streak at 5 points a day
/// (max 30), mean daily focus on the 1-5 scale (20) and days studied at 2
/// points a day (max 10). `daily_focus` holds one mean focus per studied
/// day, 0 for days without ratings.
pub fn productivity_score(
    completed: u32,
    total: u32,
    daily_focus: &[f64],
    current_streak: u32,
) -> u32 {
    let mut score = 0.0;

    if total > 0 {
        score += f64::from(completed) / f64::from(total) * 40.0;
    }

    score += f64::from(current_streak.saturating_mul(5).min(30));

    if !daily_focus.is_empty() {
        let mean_focus = daily_focus.iter().sum::<f64>() / daily_focus.len() as f64;
        score += mean_focus / 5.0 * 20.0;
    }

    let study_days = u32::try_from(daily_focus.len()).unwrap_or(u32::MAX);
    score += f64::from(study_days.saturating_mul(2).min(10));

    score.min(100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(day: u32, hour: u32, minutes: u32) -> StudySession {
        StudySession::new(Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap(), minutes)
    }

    #[test]
    fn empty_inputs_score_zero() {
        let dashboard = Dashboard::build(&[], &[], None);
        assert_eq!(dashboard.overview, Overview::default());
        assert!(dashboard.daily_progress.is_empty());
        assert_eq!(dashboard.streaks, StreakSummary::default());
    }

    #[test]
    fn builds_overview_and_daily_progress() {
        let tasks = vec![
            Task::new("1", "a", 30)
                .with_status(TaskStatus::Completed)
                .with_actual_duration(30),
            Task::new("2", "b", 60)
                .with_status(TaskStatus::Completed)
                .with_actual_duration(50),
            Task::new("3", "c", 30),
            Task::new("4", "d", 30).with_status(TaskStatus::Missed),
        ];
        let sessions = vec![
            session(1, 9, 30).with_focus(4).with_moods(2, 4),
            session(1, 14, 45).with_focus(5).with_moods(3, 4),
            session(2, 10, 60),
        ];
        let streak = StreakRecord {
            current_streak: 3,
            longest_streak: 5,
            last_study_date: None,
            total_study_days: 12,
        };

        let dashboard = Dashboard::build(&tasks, &sessions, Some(&streak));
        let o = &dashboard.overview;
        assert_eq!(o.total_tasks, 4);
        assert_eq!(o.completed_tasks, 2);
        assert_eq!(o.pending_tasks, 1);
        assert_eq!(o.missed_tasks, 1);
        assert_eq!(o.completion_rate, 50);
        assert_eq!(o.total_study_hours, 1.3);
        assert_eq!(o.avg_session_length, 40);
        // 20 (completion) + 15 (streak) + 9 (focus 2.25/5) + 4 (two days)
        assert_eq!(o.productivity_score, 48);

        assert_eq!(dashboard.daily_progress.len(), 2);
        let latest = &dashboard.daily_progress[0];
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(latest.study_hours, 1.0);
        assert_eq!(latest.focus_rating, 0.0);
        let first = &dashboard.daily_progress[1];
        assert_eq!(first.focus_rating, 4.5);
        assert_eq!(first.mood_improvement, 1.5);
        assert_eq!(first.session_count, 2);

        assert_eq!(dashboard.streaks.longest, 5);
        assert_eq!(dashboard.streaks.total_days, 12);
    }

    #[test]
    fn score_is_capped() {
        let focus = vec![5.0; 10];
        assert_eq!(productivity_score(10, 10, &focus, 20), 100);
    }

    #[test]
    fn score_components_are_bounded() {
        assert_eq!(productivity_score(0, 0, &[], 100), 30);
        assert_eq!(productivity_score(0, 4, &[0.0; 8], 0), 10);
    }
}
