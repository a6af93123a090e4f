use chrono::{Local, NaiveDate};
use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;
use studyplan_core::analytics::{
    hourly_productivity, sessions_in_period, weekly_patterns, HourlyProductivity, WeeklyPattern,
};
use studyplan_core::{
    analyze_patterns, Config, Dashboard, PatternAnalysis, StreakRecord, StudySession, Task,
};

use crate::input::{print_json, read_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Study pattern report
    Patterns {
        /// JSON file with an array of study sessions
        #[arg(long)]
        sessions: PathBuf,
        /// JSON file with an array of tasks, for subject performance
        #[arg(long)]
        tasks: Option<PathBuf>,
        /// Days to include (default: analytics.pattern_period_days)
        #[arg(long)]
        days: Option<u32>,
        /// Last day of the period (YYYY-MM-DD, default: today)
        #[arg(long)]
        until: Option<NaiveDate>,
    },
    /// Dashboard overview
    Dashboard {
        /// JSON file with an array of tasks
        #[arg(long)]
        tasks: PathBuf,
        /// JSON file with an array of study sessions
        #[arg(long)]
        sessions: PathBuf,
        /// JSON file with the stored streak record
        #[arg(long)]
        streak: Option<PathBuf>,
        /// Days to include (default: analytics.dashboard_period_days)
        #[arg(long)]
        days: Option<u32>,
        /// Last day of the period (YYYY-MM-DD, default: today)
        #[arg(long)]
        until: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct PatternReport {
    #[serde(flatten)]
    analysis: PatternAnalysis,
    hourly_productivity: Vec<HourlyProductivity>,
    weekly_patterns: Vec<WeeklyPattern>,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        StatsAction::Patterns {
            sessions,
            tasks,
            days,
            until,
        } => {
            let sessions: Vec<StudySession> = read_json(&sessions)?;
            let tasks: Vec<Task> = match tasks {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let sessions = sessions_in_period(
                &sessions,
                until.unwrap_or_else(|| Local::now().date_naive()),
                days.unwrap_or(config.analytics.pattern_period_days),
            );
            tracing::debug!(sessions = sessions.len(), tasks = tasks.len(), "analyzing patterns");

            let report = PatternReport {
                analysis: analyze_patterns(&sessions, &tasks),
                hourly_productivity: hourly_productivity(&sessions),
                weekly_patterns: weekly_patterns(&sessions),
            };
            print_json(&report)?;
        }
        StatsAction::Dashboard {
            tasks,
            sessions,
            streak,
            days,
            until,
        } => {
            let tasks: Vec<Task> = read_json(&tasks)?;
            let sessions: Vec<StudySession> = read_json(&sessions)?;
            let streak: Option<StreakRecord> = match streak {
                Some(path) => Some(read_json(&path)?),
                None => None,
            };
            let sessions = sessions_in_period(
                &sessions,
                until.unwrap_or_else(|| Local::now().date_naive()),
                days.unwrap_or(config.analytics.dashboard_period_days),
            );

            let dashboard = Dashboard::build(&tasks, &sessions, streak.as_ref());
            print_json(&dashboard)?;
        }
    }
    Ok(())
}
