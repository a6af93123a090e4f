use chrono::{DateTime, Utc};
use clap::Subcommand;
use studyplan_core::time::parse_timestamp;
use studyplan_core::{suggest_task_time, Config};

use crate::input::print_json;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Suggest when to work on a task
    Suggest {
        /// Estimated duration (minutes)
        #[arg(long)]
        duration: u32,
        /// Due date (RFC 3339 or YYYY-MM-DD[ HH:MM[:SS]], UTC)
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
        /// Suggest as for a user without stored preferences
        #[arg(long)]
        no_preferences: bool,
    },
}

fn parse_due(s: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(s).ok_or_else(|| format!("unrecognized timestamp: {s}"))
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TaskAction::Suggest {
            duration,
            due,
            no_preferences,
        } => {
            let prefs = if no_preferences {
                None
            } else {
                Some(Config::load()?.user_preferences())
            };
            tracing::debug!(
                duration,
                ?due,
                with_preferences = prefs.is_some(),
                "suggesting task time"
            );
            let suggestion = suggest_task_time(duration, due, prefs.as_ref());
            print_json(&suggestion)?;
        }
    }
    Ok(())
}
