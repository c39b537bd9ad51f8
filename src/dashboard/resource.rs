//! Remote record kinds and the cache keys they own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Cache key of the derived income/expense summary.
pub const FINANCIAL_SUMMARY_KEY: &str = "financial-summary";

/// Cache key root of habit check-ins, which go stale with their habits.
pub const HABIT_CHECKINS_KEY: &str = "habit-checkins";

// == Resource ==
/// One remote table the dashboard reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Habits,
    HabitCheckins,
    Workouts,
    WorkoutLogs,
    Runs,
    Transactions,
    Appointments,
    VisionItems,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Habits,
        Resource::HabitCheckins,
        Resource::Workouts,
        Resource::WorkoutLogs,
        Resource::Runs,
        Resource::Transactions,
        Resource::Appointments,
        Resource::VisionItems,
    ];

    /// Name used in routes and as the cache key prefix.
    pub fn name(self) -> &'static str {
        match self {
            Resource::Habits => "habits",
            Resource::HabitCheckins => HABIT_CHECKINS_KEY,
            Resource::Workouts => "workouts",
            Resource::WorkoutLogs => "workout-logs",
            Resource::Runs => "runs",
            Resource::Transactions => "transactions",
            Resource::Appointments => "appointments",
            Resource::VisionItems => "vision-items",
        }
    }

    /// Derived cache keys that go stale when this resource changes.
    pub fn dependent_keys(self) -> &'static [&'static str] {
        match self {
            Resource::Transactions => &[FINANCIAL_SUMMARY_KEY],
            // Deleting a habit drops its check-ins
            Resource::Habits => &[HABIT_CHECKINS_KEY],
            _ => &[],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| Error::NotFound(format!("Unknown resource: {}", s)))
    }
}
