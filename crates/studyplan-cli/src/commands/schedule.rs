use chrono::{Local, NaiveDate};
use clap::Subcommand;
use std::path::PathBuf;
use studyplan_core::{
    pending_tasks, segment_duration, ClockTime, Config, PreferenceOverrides, SmartScheduler, Task,
};

use crate::input::{print_json, read_json};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Pack tasks into a study day
    Generate {
        /// JSON file with an array of tasks ("-" for stdin)
        #[arg(long)]
        tasks: PathBuf,
        /// Day to schedule (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Window start override (HH:MM)
        #[arg(long)]
        start: Option<ClockTime>,
        /// Window end override (HH:MM)
        #[arg(long)]
        end: Option<ClockTime>,
        /// Session length override (minutes)
        #[arg(long)]
        pomodoro: Option<u32>,
        /// Daily goal override (hours)
        #[arg(long)]
        daily_goal: Option<f64>,
        /// Include tasks that are not pending
        #[arg(long)]
        all: bool,
    },
    /// Split a duration into session chunks
    Segment {
        /// Total minutes
        total: u32,
        /// Maximum chunk length (default: configured pomodoro length)
        #[arg(long)]
        chunk: Option<u32>,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Generate {
            tasks,
            date,
            start,
            end,
            pomodoro,
            daily_goal,
            all,
        } => {
            let tasks: Vec<Task> = read_json(&tasks)?;
            let total = tasks.len();
            let tasks = if all { tasks } else { pending_tasks(&tasks) };
            tracing::debug!(total, selected = tasks.len(), all, "loaded tasks");

            let overrides = PreferenceOverrides {
                pomodoro_length: pomodoro,
                daily_goal_hours: daily_goal,
                start_time: start,
                end_time: end,
                ..PreferenceOverrides::default()
            };
            if !overrides.is_empty() {
                tracing::debug!(?overrides, "applying preference overrides");
            }
            let config = Config::load()?;
            let scheduler = SmartScheduler::with_overrides(&config.user_preferences(), &overrides);

            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let result = scheduler.plan(&tasks, date)?;
            print_json(&result)?;
        }
        ScheduleAction::Segment { total, chunk } => {
            let chunk = match chunk {
                Some(c) => c,
                None => Config::load()?.preferences.pomodoro_length,
            };
            print_json(&segment_duration(total, chunk))?;
        }
    }
    Ok(())
}
