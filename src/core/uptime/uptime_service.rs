use chrono::{DateTime, Duration, Utc};

/// Remembers when the bot started so `uptime` can report it.
pub struct UptimeTracker {
    started_at: DateTime<Utc>,
}

impl UptimeTracker {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self { started_at }
    }

    pub fn elapsed(&self) -> Duration {
        Utc::now().signed_duration_since(self.started_at)
    }

    pub fn describe(&self) -> String {
        format_uptime(self.elapsed())
    }
}

impl Default for UptimeTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// `1d 2h 3m 4s`. Negative durations (clock skew) render as zero.
pub fn format_uptime(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let (hours, remainder) = (total / 3600, total % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    let (days, hours) = (hours / 24, hours % 24);
    format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_unit() {
        let elapsed = Duration::days(2) + Duration::hours(5) + Duration::minutes(7) + Duration::seconds(9);
        assert_eq!(format_uptime(elapsed), "2d 5h 7m 9s");
    }

    #[test]
    fn fresh_start_is_zero() {
        assert_eq!(format_uptime(Duration::zero()), "0d 0h 0m 0s");
        assert_eq!(format_uptime(Duration::seconds(-30)), "0d 0h 0m 0s");
    }

    #[test]
    fn tracker_counts_from_start() {
        let tracker = UptimeTracker::started_at(Utc::now() - Duration::hours(1));
        assert!(tracker.elapsed() >= Duration::hours(1));
        assert!(tracker.describe().starts_with("0d 1h"));
    }
}
