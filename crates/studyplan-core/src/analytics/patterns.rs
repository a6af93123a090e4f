//! Study pattern analysis.
//!
//! Reports the average session length, the hours of day with the best mean
//! focus rating, per-subject task performance, and a few threshold-driven
//! recommendations.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Mean, StudySession};
use crate::task::{Task, TaskStatus};
use crate::time::round1;

/// Per-subject task performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPerformance {
    pub subject: String,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    /// Percent, rounded
    pub completion_rate: u32,
    /// Mean actual minutes of completed tasks with logged time, rounded
    pub avg_time: u32,
    pub avg_difficulty: f64,
}

/// Result of a pattern analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    /// Minutes, rounded; 0 without sessions
    pub average_session_length: u32,
    /// Best hours of day by mean focus, best first
    pub most_productive_hours: Vec<u32>,
    pub subject_performance: Vec<SubjectPerformance>,
    pub recommendations: Vec<String>,
}

/// Thresholds for pattern recommendations.
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    /// Average below this suggests longer sessions (minutes)
    pub short_session_min: u32,
    /// Average above this suggests splitting sessions (minutes)
    pub long_session_min: u32,
    /// How many productive hours to report
    pub top_hours: usize,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self {
            short_session_min: 20,
            long_session_min: 60,
            top_hours: 3,
        }
    }
}

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze sessions and tasks.
    ///
    /// No sessions is not an error: the result carries zeroed statistics and
    /// a single prompt to start tracking.
    pub fn analyze(&self, sessions: &[StudySession], tasks: &[Task]) -> PatternAnalysis {
        let mut analysis = PatternAnalysis {
            subject_performance: subject_performance(tasks),
            ..PatternAnalysis::default()
        };

        if sessions.is_empty() {
            analysis
                .recommendations
                .push("Start tracking your study sessions to get personalized insights!".to_string());
            return analysis;
        }

        let total: u64 = sessions.iter().map(|s| u64::from(s.minutes())).sum();
        analysis.average_session_length = (total as f64 / sessions.len() as f64).round() as u32;
        analysis.most_productive_hours = self.productive_hours(sessions);

        if analysis.average_session_length < self.short_session_min {
            analysis.recommendations.push(
                "Try longer study sessions (25-30 minutes) for better focus and retention."
                    .to_string(),
            );
        } else if analysis.average_session_length > self.long_session_min {
            analysis.recommendations.push(
                "Consider breaking long sessions into smaller chunks with breaks.".to_string(),
            );
        }

        if let Some(&top) = analysis.most_productive_hours.first() {
            analysis.recommendations.push(format!(
                "Your most productive time is around {}. Schedule important tasks then!",
                twelve_hour(top)
            ));
        }

        tracing::info!(
            sessions = sessions.len(),
            average = analysis.average_session_length,
            hours = ?analysis.most_productive_hours,
            "study patterns analyzed"
        );
        analysis
    }

    /// Hours ranked by mean focus; ties keep the earlier hour first.
    fn productive_hours(&self, sessions: &[StudySession]) -> Vec<u32> {
        let mut by_hour: BTreeMap<u32, Mean> = BTreeMap::new();
        for session in sessions {
            if let Some(rating) = session.rated_focus() {
                by_hour
                    .entry(session.start_time.hour())
                    .or_default()
                    .add(f64::from(rating));
            }
        }

        let mut ranked: Vec<(u32, f64)> = by_hour
            .into_iter()
            .filter_map(|(hour, mean)| mean.get().map(|avg| (hour, avg)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.into_iter().take(self.top_hours).map(|(hour, _)| hour).collect()
    }
}

/// Analyze with default thresholds.
pub fn analyze_patterns(sessions: &[StudySession], tasks: &[Task]) -> PatternAnalysis {
    PatternAnalyzer::default().analyze(sessions, tasks)
}

/// Per-subject performance, most completed tasks first, then by subject.
pub fn subject_performance(tasks: &[Task]) -> Vec<SubjectPerformance> {
    #[derive(Default)]
    struct Acc {
        total: u32,
        completed: u32,
        time: Mean,
        difficulty: Mean,
    }

    let mut by_subject: BTreeMap<&str, Acc> = BTreeMap::new();
    for task in tasks {
        let acc = by_subject.entry(task.subject.as_str()).or_default();
        acc.total += 1;
        acc.difficulty.add(f64::from(task.difficulty_level));
        if task.status == TaskStatus::Completed {
            acc.completed += 1;
            if task.actual_duration > 0 {
                acc.time.add(f64::from(task.actual_duration));
            }
        }
    }

    let mut out: Vec<SubjectPerformance> = by_subject
        .into_iter()
        .map(|(subject, acc)| SubjectPerformance {
            subject: subject.to_string(),
            total_tasks: acc.total,
            completed_tasks: acc.completed,
            completion_rate: percent(acc.completed, acc.total),
            avg_time: acc.time.get().unwrap_or(0.0).round() as u32,
            avg_difficulty: round1(acc.difficulty.get().unwrap_or(0.0)),
        })
        .collect();
    out.sort_by(|a, b| b.completed_tasks.cmp(&a.completed_tasks));
    out
}

pub(crate) fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        (f64::from(part) / f64::from(whole) * 100.0).round() as u32
    }
}

fn twelve_hour(hour: u32) -> String {
    match hour {
        0 => "12:00 AM".to_string(),
        1..=11 => format!("{hour}:00 AM"),
        12 => "12:00 PM".to_string(),
        _ => format!("{}:00 PM", hour - 12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(hour: u32, minutes: u32, focus: Option<u8>) -> StudySession {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, hour, 15, 0).unwrap();
        let s = StudySession::new(start, minutes);
        match focus {
            Some(f) => s.with_focus(f),
            None => s,
        }
    }

    #[test]
    fn no_sessions_asks_to_start_tracking() {
        let analysis = analyze_patterns(&[], &[]);
        assert_eq!(analysis.average_session_length, 0);
        assert!(analysis.most_productive_hours.is_empty());
        assert_eq!(
            analysis.recommendations,
            vec!["Start tracking your study sessions to get personalized insights!"]
        );
    }

    #[test]
    fn ranks_hours_by_mean_focus() {
        let sessions = vec![
            session(9, 30, Some(5)),
            session(9, 30, Some(3)),
            session(14, 30, Some(5)),
            session(20, 30, Some(2)),
            session(7, 30, Some(3)),
            session(11, 30, None),
        ];
        let analysis = analyze_patterns(&sessions, &[]);
        // 14h: 5.0, 9h: 4.0, then 7h and 20h; 11h has no ratings.
        assert_eq!(analysis.most_productive_hours, vec![14, 9, 7]);
        assert_eq!(analysis.average_session_length, 30);
        assert_eq!(
            analysis.recommendations,
            vec!["Your most productive time is around 2:00 PM. Schedule important tasks then!"]
        );
    }

    #[test]
    fn ties_keep_earlier_hour_first() {
        let sessions = vec![session(16, 30, Some(4)), session(8, 30, Some(4))];
        let analysis = analyze_patterns(&sessions, &[]);
        assert_eq!(analysis.most_productive_hours, vec![8, 16]);
    }

    #[test]
    fn short_sessions_get_longer_session_advice() {
        let sessions = vec![session(10, 10, None), session(10, 15, None)];
        let analysis = analyze_patterns(&sessions, &[]);
        assert_eq!(analysis.average_session_length, 13);
        assert!(analysis.most_productive_hours.is_empty());
        assert_eq!(analysis.recommendations.len(), 1);
        assert!(analysis.recommendations[0].starts_with("Try longer study sessions"));
    }

    #[test]
    fn long_sessions_get_split_advice() {
        let sessions = vec![session(10, 90, Some(4))];
        let analysis = analyze_patterns(&sessions, &[]);
        assert!(analysis.recommendations[0].starts_with("Consider breaking long sessions"));
        assert!(analysis.recommendations[1].contains("10:00 AM"));
    }

    #[test]
    fn missing_duration_counts_as_zero() {
        let mut running = session(10, 0, None);
        running.duration = None;
        let sessions = vec![running, session(10, 50, None)];
        assert_eq!(analyze_patterns(&sessions, &[]).average_session_length, 25);
    }

    #[test]
    fn twelve_hour_clock_labels() {
        assert_eq!(twelve_hour(0), "12:00 AM");
        assert_eq!(twelve_hour(9), "9:00 AM");
        assert_eq!(twelve_hour(12), "12:00 PM");
        assert_eq!(twelve_hour(23), "11:00 PM");
    }

    #[test]
    fn subject_performance_groups_tasks() {
        let tasks = vec![
            Task::new("1", "a", 30)
                .with_subject("Math")
                .with_status(TaskStatus::Completed)
                .with_actual_duration(40)
                .with_difficulty(4),
            Task::new("2", "b", 30).with_subject("Math").with_difficulty(2),
            Task::new("3", "c", 30)
                .with_subject("Art")
                .with_status(TaskStatus::Completed)
                .with_actual_duration(0),
            Task::new("4", "d", 30)
                .with_subject("Art")
                .with_status(TaskStatus::Completed)
                .with_actual_duration(20),
            Task::new("5", "e", 30).with_subject("Bio"),
        ];
        let perf = subject_performance(&tasks);
        let subjects: Vec<&str> = perf.iter().map(|p| p.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Art", "Math", "Bio"]);

        let art = &perf[0];
        assert_eq!(art.completion_rate, 100);
        assert_eq!(art.avg_time, 20);
        let math = &perf[1];
        assert_eq!(math.completion_rate, 50);
        assert_eq!(math.avg_time, 40);
        assert_eq!(math.avg_difficulty, 3.0);
        assert_eq!(perf[2].completion_rate, 0);
    }
}
