//! Vote cooldown policy.

use chrono::{DateTime, Duration, Utc};

/// Default per-voter cooldown between casts: one hour.
pub const DEFAULT_COOLDOWN_SECS: i64 = 3600;

/// Rules applied to every cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingPolicy {
    /// Minimum time between the voter's last vote and a new cast.
    pub cooldown: Duration,
}

impl Default for RatingPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::seconds(DEFAULT_COOLDOWN_SECS),
        }
    }
}

impl RatingPolicy {
    pub fn with_cooldown_secs(secs: i64) -> Self {
        Self {
            cooldown: Duration::seconds(secs),
        }
    }

    /// True while `now - last_voted_at < cooldown`.
    pub fn is_cooling_down(&self, last_voted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now < last_voted_at + self.cooldown
    }

    /// A voter whose last vote is strictly after this instant is cooling down.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.cooldown
    }

    /// Earliest instant the voter may cast again.
    pub fn retry_at(&self, last_voted_at: DateTime<Utc>) -> DateTime<Utc> {
        last_voted_at + self.cooldown
    }
}
