//! Per-user scheduling preferences.
//!
//! A [`UserPreferences`] value is a fully populated snapshot: every field the
//! scheduler reads has a documented default, filled in when the record is
//! deserialized or built. Per-request tweaks arrive as
//! [`PreferenceOverrides`] and are merged over the snapshot once, before
//! scheduling starts.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{ClockTime, MINUTES_PER_DAY};

/// Longest daily goal that can be accepted.
const MAX_DAILY_GOAL_HOURS: f64 = 24.0;

pub(crate) fn default_pomodoro_length() -> u32 {
    25
}
pub(crate) fn default_short_break() -> u32 {
    5
}
pub(crate) fn default_long_break() -> u32 {
    15
}
pub(crate) fn default_daily_goal_hours() -> f64 {
    2.0
}
pub(crate) fn default_preferred_difficulty() -> u8 {
    3
}
fn default_start_time() -> ClockTime {
    ClockTime::hm(9, 0)
}
fn default_end_time() -> ClockTime {
    ClockTime::hm(18, 0)
}

/// Hours of the day the scheduler may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    #[serde(default = "default_start_time")]
    pub start_time: ClockTime,
    #[serde(default = "default_end_time")]
    pub end_time: ClockTime,
}

impl WorkingWindow {
    /// Build a window, rejecting one that does not end after it starts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeRange`] when `end <= start`.
    pub fn new(start_time: ClockTime, end_time: ClockTime) -> Result<Self, ValidationError> {
        let window = Self {
            start_time,
            end_time,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time.to_string(),
                end: self.end_time.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for WorkingWindow {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            end_time: default_end_time(),
        }
    }
}

/// Immutable preference snapshot for one scheduling call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Focus session length (minutes)
    #[serde(default = "default_pomodoro_length")]
    pub pomodoro_length: u32,
    /// Short break duration (minutes)
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    /// Long break duration (minutes), taken after every fourth session
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    /// Daily study budget (hours)
    #[serde(default = "default_daily_goal_hours")]
    pub daily_goal_hours: f64,
    #[serde(default = "default_preferred_difficulty")]
    pub preferred_difficulty: u8,
    #[serde(default)]
    pub window: WorkingWindow,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            pomodoro_length: default_pomodoro_length(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            daily_goal_hours: default_daily_goal_hours(),
            preferred_difficulty: default_preferred_difficulty(),
            window: WorkingWindow::default(),
        }
    }
}

impl UserPreferences {
    /// Daily budget in whole minutes.
    pub fn daily_budget_minutes(&self) -> u32 {
        (self.daily_goal_hours * 60.0).round().max(0.0) as u32
    }

    /// Merge per-request overrides over this snapshot.
    pub fn with_overrides(&self, overrides: &PreferenceOverrides) -> Self {
        Self {
            pomodoro_length: overrides.pomodoro_length.unwrap_or(self.pomodoro_length),
            short_break: overrides.short_break.unwrap_or(self.short_break),
            long_break: overrides.long_break.unwrap_or(self.long_break),
            daily_goal_hours: overrides.daily_goal_hours.unwrap_or(self.daily_goal_hours),
            preferred_difficulty: overrides
                .preferred_difficulty
                .unwrap_or(self.preferred_difficulty),
            window: WorkingWindow {
                start_time: overrides.start_time.unwrap_or(self.window.start_time),
                end_time: overrides.end_time.unwrap_or(self.window.end_time),
            },
        }
    }

    /// Check the invariants the scheduler relies on.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero session length, a session or break longer
    /// than a day, a daily goal outside 0..=24 hours, a difficulty outside
    /// 1..=5 or an empty working window.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pomodoro_length == 0 {
            return Err(ValidationError::invalid("pomodoro_length", "must be positive"));
        }
        for (field, minutes) in [
            ("pomodoro_length", self.pomodoro_length),
            ("short_break", self.short_break),
            ("long_break", self.long_break),
        ] {
            if minutes > MINUTES_PER_DAY {
                return Err(ValidationError::invalid(
                    field,
                    format!("{minutes} minutes is longer than a day"),
                ));
            }
        }
        if !self.daily_goal_hours.is_finite()
            || !(0.0..=MAX_DAILY_GOAL_HOURS).contains(&self.daily_goal_hours)
        {
            return Err(ValidationError::invalid(
                "daily_goal_hours",
                format!("{} is not between 0 and 24 hours", self.daily_goal_hours),
            ));
        }
        if !(1..=5).contains(&self.preferred_difficulty) {
            return Err(ValidationError::invalid(
                "preferred_difficulty",
                format!("{} is outside 1..=5", self.preferred_difficulty),
            ));
        }
        self.window.validate()
    }
}

/// Optional per-request preference changes.
///
/// Accepts both snake_case and the camelCase keys sent by the web client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceOverrides {
    #[serde(default, alias = "pomodoroLength")]
    pub pomodoro_length: Option<u32>,
    #[serde(default, alias = "shortBreak")]
    pub short_break: Option<u32>,
    #[serde(default, alias = "longBreak")]
    pub long_break: Option<u32>,
    #[serde(default, alias = "dailyGoalHours")]
    pub daily_goal_hours: Option<f64>,
    #[serde(default, alias = "preferredDifficulty")]
    pub preferred_difficulty: Option<u8>,
    #[serde(default, alias = "startTime")]
    pub start_time: Option<ClockTime>,
    #[serde(default, alias = "endTime")]
    pub end_time: Option<ClockTime>,
}

impl PreferenceOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
