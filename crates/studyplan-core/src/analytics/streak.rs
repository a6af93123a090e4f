//! Daily study streaks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored streak state for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub last_study_date: Option<NaiveDate>,
    /// Distinct days with completed study
    #[serde(default)]
    pub total_study_days: u32,
}

impl StreakRecord {
    /// Record that the user studied on `today`.
    ///
    /// The day after the last study date extends the streak, a longer gap
    /// restarts it at 1, and a second completion on the same day changes
    /// nothing. Dates before the last study date are ignored.
    pub fn record_study_day(&self, today: NaiveDate) -> Self {
        let current = match self.last_study_date {
            None => 1,
            Some(last) => match (today - last).num_days() {
                d if d <= 0 => return self.clone(),
                1 => self.current_streak + 1,
                _ => 1,
            },
        };

        Self {
            current_streak: current,
            longest_streak: self.longest_streak.max(current),
            last_study_date: Some(today),
            total_study_days: self.total_study_days + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn first_day_starts_streak() {
        let streak = StreakRecord::default().record_study_day(d(1));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 1);
        assert_eq!(streak.total_study_days, 1);
        assert_eq!(streak.last_study_date, Some(d(1)));
    }

    #[test]
    fn consecutive_days_extend_streak() {
        let streak = StreakRecord::default()
            .record_study_day(d(1))
            .record_study_day(d(2))
            .record_study_day(d(3));
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.longest_streak, 3);
    }

    #[test]
    fn gap_resets_but_keeps_longest() {
        let streak = StreakRecord::default()
            .record_study_day(d(1))
            .record_study_day(d(2))
            .record_study_day(d(5));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.total_study_days, 3);
    }

    #[test]
    fn same_day_is_counted_once() {
        let once = StreakRecord::default().record_study_day(d(1));
        assert_eq!(once.record_study_day(d(1)), once);
    }

    #[test]
    fn earlier_date_is_ignored() {
        let streak = StreakRecord::default().record_study_day(d(4));
        assert_eq!(streak.record_study_day(d(2)), streak);
    }
}
