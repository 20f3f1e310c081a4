//! Daily verification window.
//!
//! The window is a fixed local-time interval evaluated against a fixed UTC
//! offset. Instants may arrive in UTC or any other offset; they are
//! normalized into the window's offset before comparison. Both boundaries
//! are inclusive.

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeZone};

/// The daily accepted window: `[start, end]` local time at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationWindow {
    start: NaiveTime,
    end: NaiveTime,
    tz: FixedOffset,
}

impl VerificationWindow {
    /// Create a window. `end` must not precede `start`; the config layer
    /// validates user-supplied values before calling this.
    pub fn new(start: NaiveTime, end: NaiveTime, tz: FixedOffset) -> Self {
        Self { start, end, tz }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn tz(&self) -> FixedOffset {
        self.tz
    }

    /// Whether the instant falls inside the window, boundaries included.
    ///
    /// Total over all instants; never fails.
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let local = instant.with_timezone(&self.tz).time();
        self.start <= local && local <= self.end
    }

    /// Interpret a naive local timestamp (e.g. a parsed capture time) as a
    /// wall-clock reading in the window's offset.
    pub fn interpret_local(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        self.tz
            .from_local_datetime(&naive)
            .single()
            .expect("fixed offsets map local datetimes unambiguously")
    }
}

impl Default for VerificationWindow {
    /// 07:30:00 to 08:30:00 at UTC+9.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(7, 30, 0).expect("valid time"),
            end: NaiveTime::from_hms_opt(8, 30, 0).expect("valid time"),
            tz: FixedOffset::east_opt(9 * 3600).expect("valid offset"),
        }
    }
}
