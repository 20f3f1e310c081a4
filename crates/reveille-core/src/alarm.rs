//! Boundary-reminder scheduling.
//!
//! The scheduler is a wall-clock state machine in the same mold as a
//! polled timer engine: no internal thread, the caller invokes `tick()`
//! on a fixed cadence. Two per-day flags are the idempotency mechanism --
//! each boundary fires at most once per local calendar day no matter how
//! coarse or jittery the polling is. [`AlarmScheduler::run`] wraps the
//! machine in a tokio loop that owns sleeping and delivery.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use tracing::{info, warn};

use crate::gateway::{ChannelId, FeedbackSink};
use crate::window::VerificationWindow;

/// Default polling cadence. Coarser than a second, fine enough to never
/// skip a boundary minute.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// A boundary reminder due for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEvent {
    WindowOpen,
    WindowClose,
}

impl AlarmEvent {
    /// Fixed reminder text delivered to the channel.
    pub fn message(&self) -> &'static str {
        match self {
            AlarmEvent::WindowOpen => {
                "Reveille, reveille. The wake-up window is OPEN. Post your proof. Get after it."
            }
            AlarmEvent::WindowClose => {
                "The wake-up window is CLOSED. If you didn't post, you own that. Tomorrow is another chance to get after it."
            }
        }
    }
}

/// Per-day fired flags, keyed by the local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DayFlags {
    date: NaiveDate,
    open_fired: bool,
    close_fired: bool,
}

impl DayFlags {
    /// A fresh day: both boundaries armed.
    fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            open_fired: false,
            close_fired: false,
        }
    }

    /// Flags for a scheduler constructed mid-day: boundaries more than
    /// `grace` behind the clock count as already handled, so a restart at
    /// noon does not deliver the morning reminder hours late.
    fn armed_at(
        window: &VerificationWindow,
        now_local: DateTime<FixedOffset>,
        grace: TimeDelta,
    ) -> Self {
        let date = now_local.date_naive();
        let open_at = window.interpret_local(date.and_time(window.start()));
        let close_at = window.interpret_local(date.and_time(window.end()));
        Self {
            date,
            open_fired: now_local - open_at > grace,
            close_fired: now_local - close_at > grace,
        }
    }
}

/// Fires each boundary reminder exactly once per local calendar day.
pub struct AlarmScheduler {
    window: VerificationWindow,
    poll_interval: Duration,
    flags: DayFlags,
}

impl AlarmScheduler {
    pub fn new(window: VerificationWindow, poll_interval: Duration) -> Self {
        Self::starting_at(window, poll_interval, Utc::now())
    }

    /// Construct with an explicit start instant.
    pub fn starting_at(
        window: VerificationWindow,
        poll_interval: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let grace = TimeDelta::seconds(poll_interval.as_secs().max(1) as i64);
        let flags = DayFlags::armed_at(&window, now.with_timezone(&window.tz()), grace);
        Self {
            window,
            poll_interval,
            flags,
        }
    }

    /// Advance the state machine to `now`, returning any reminders that
    /// became due. Day rollover re-arms both flags.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<AlarmEvent> {
        let local = now.with_timezone(&self.window.tz());
        let today = local.date_naive();
        if today != self.flags.date {
            self.flags = DayFlags::fresh(today);
        }

        let mut due = Vec::new();
        if !self.flags.open_fired && local.time() >= self.window.start() {
            self.flags.open_fired = true;
            due.push(AlarmEvent::WindowOpen);
        }
        if !self.flags.close_fired && local.time() >= self.window.end() {
            self.flags.close_fired = true;
            due.push(AlarmEvent::WindowClose);
        }
        due
    }

    /// Long-lived polling loop. Delivery failures are logged and never
    /// retried; the fired flag stays set so a broken sink cannot cause a
    /// reminder storm.
    pub async fn run(mut self, channel: ChannelId, sink: Arc<dyn FeedbackSink>) {
        info!(?channel, "alarm scheduler running");
        loop {
            for event in self.tick(Utc::now()) {
                match sink.send(channel, event.message()) {
                    Ok(()) => info!(?event, "reminder delivered"),
                    Err(e) => warn!(?event, error = %e, "reminder delivery failed; will not retry"),
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
