//! Integration tests for study analytics.
//!
//! Feeds a week of stored records (as JSON, the way the application hands
//! them over) through pattern analysis, the breakdowns and the dashboard.

use chrono::{NaiveDate, Weekday};
use studyplan_core::analytics::{hourly_productivity, weekly_patterns};
use studyplan_core::{analyze_patterns, Dashboard, StreakRecord, StudySession, Task};

const SESSIONS: &str = r#"[
    {"id": "s1", "start_time": "2024-05-06T08:30:00Z", "duration": 20, "focus_rating": 3},
    {"id": "s2", "task_id": "1", "start_time": "2024-05-06 10:00:00", "end_time": "2024-05-06 10:50:00",
     "duration": 50, "focus_rating": 5, "mood_before": 2, "mood_after": 3},
    {"id": "s3", "task_id": "2", "start_time": "2024-05-07T10:15:00Z", "duration": 40,
     "focus_rating": 4, "mood_before": 3, "mood_after": 5},
    {"id": "s4", "start_time": "2024-05-08T19:00:00Z", "duration": 30, "focus_rating": 2,
     "end_time": ""}
]"#;

const TASKS: &str = r#"[
    {"id": "1", "title": "Derivatives", "subject": "Math", "status": "completed",
     "estimated_duration": 50, "actual_duration": 60, "difficulty_level": 4},
    {"id": "2", "title": "Kinematics", "subject": "Physics", "status": "completed",
     "estimated_duration": 45, "actual_duration": 30, "priority": null},
    {"id": "3", "title": "Integrals", "subject": "Math", "status": "in_progress",
     "estimated_duration": 60, "due_date": "2024-05-10", "difficulty_level": 5}
]"#;

fn load() -> (Vec<StudySession>, Vec<Task>) {
    (
        serde_json::from_str(SESSIONS).unwrap(),
        serde_json::from_str(TASKS).unwrap(),
    )
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

#[test]
fn test_pattern_analysis_of_a_week() {
    let (sessions, tasks) = load();
    let analysis = analyze_patterns(&sessions, &tasks);

    assert_eq!(analysis.average_session_length, 35);
    assert_eq!(analysis.most_productive_hours, vec![10, 8, 19]);
    assert_eq!(
        analysis.recommendations,
        vec!["Your most productive time is around 10:00 AM. Schedule important tasks then!"]
    );

    let math = analysis
        .subject_performance
        .iter()
        .find(|s| s.subject == "Math")
        .unwrap();
    assert_eq!(math.total_tasks, 2);
    assert_eq!(math.completion_rate, 50);
    assert_eq!(math.avg_time, 60);
    assert_eq!(math.avg_difficulty, 4.5);
}

#[test]
fn test_breakdowns_of_a_week() {
    let (sessions, _) = load();

    let hourly = hourly_productivity(&sessions);
    let hours: Vec<u32> = hourly.iter().map(|h| h.hour).collect();
    assert_eq!(hours, vec![8, 10, 19]);
    assert_eq!(hourly[1].avg_focus, 4.5);
    assert_eq!(hourly[1].avg_duration, 45);

    let weekly = weekly_patterns(&sessions);
    let days: Vec<Weekday> = weekly.iter().map(|w| w.day_of_week).collect();
    assert_eq!(days, vec![Weekday::Mon, Weekday::Tue, Weekday::Wed]);
    assert_eq!(weekly[0].total_hours, 1.2);
    assert_eq!(weekly[0].avg_focus, 4.0);
}

#[test]
fn test_dashboard_with_streak_history() {
    let (sessions, tasks) = load();
    let streak = StreakRecord::default()
        .record_study_day(d(6))
        .record_study_day(d(7))
        .record_study_day(d(7))
        .record_study_day(d(8));
    assert_eq!(streak.current_streak, 3);
    assert_eq!(streak.total_study_days, 3);

    let dashboard = Dashboard::build(&tasks, &sessions, Some(&streak));
    let overview = &dashboard.overview;
    assert_eq!(overview.total_tasks, 3);
    assert_eq!(overview.completed_tasks, 2);
    assert_eq!(overview.in_progress_tasks, 1);
    assert_eq!(overview.completion_rate, 67);
    assert_eq!(overview.total_study_hours, 1.5);
    assert_eq!(overview.avg_session_length, 45);
    // 26.7 (completion) + 15 (streak) + 13.3 (focus) + 6 (three days)
    assert_eq!(overview.productivity_score, 61);

    let dates: Vec<NaiveDate> = dashboard.daily_progress.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![d(8), d(7), d(6)]);
    let monday = &dashboard.daily_progress[2];
    assert_eq!(monday.study_hours, 1.2);
    assert_eq!(monday.focus_rating, 4.0);
    assert_eq!(monday.mood_improvement, 1.0);
    assert_eq!(monday.session_count, 2);
    assert_eq!(dashboard.daily_progress[1].mood_improvement, 2.0);

    assert_eq!(dashboard.streaks.current, 3);
    assert_eq!(dashboard.subject_performance.len(), 2);
}

#[test]
fn test_dashboard_round_trips_as_json() {
    let (sessions, tasks) = load();
    let dashboard = Dashboard::build(&tasks, &sessions, None);
    let json = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(json["streaks"]["current"], 0);
    assert_eq!(json["daily_progress"][0]["date"], "2024-05-08");
    let back: Dashboard = serde_json::from_value(json).unwrap();
    assert_eq!(back, dashboard);
}
