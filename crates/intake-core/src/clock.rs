//! Injectable time source used to stamp processed objects.

use chrono::{SecondsFormat, Utc};

/// Produces the timestamp prepended to processed filenames.
///
/// Implementations must render `YYYY-MM-DDTHH:MM:SS.mmmZ`; any other shape breaks the
/// recursion guard and the engine refuses to rename with it.
pub trait Clock: Send + Sync {
    /// Current timestamp string.
    fn timestamp(&self) -> String;
}

/// Wall-clock time in UTC with millisecond precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Clock that always returns the same timestamp.
#[derive(Debug, Clone)]
pub struct FixedClock(String);

impl FixedClock {
    /// Freeze time at `timestamp`.
    #[must_use]
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }
}

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::is_marked;

    #[test]
    fn system_clock_renders_marker_shape() {
        let stamp = SystemClock.timestamp();
        assert_eq!(stamp.len(), "2026-02-22T10:30:00.000Z".len());
        assert!(stamp.ends_with('Z'));
        assert!(is_marked(&format!("{stamp}-file.txt")));
    }

    #[test]
    fn fixed_clock_is_stable() {
        let clock = FixedClock::new("2026-02-22T10:30:00.000Z");
        assert_eq!(clock.timestamp(), clock.timestamp());
    }
}
