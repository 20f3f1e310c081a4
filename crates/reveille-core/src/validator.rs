//! Submission classification.
//!
//! One validator instance serves a whole deployment. It holds no per-call
//! state: every `validate` resolves a submission into exactly one
//! [`Outcome`], and appends a ledger record whenever the attempt resolves
//! to a concrete day.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::LedgerError;
use crate::ledger::{StatusLedger, WakeupRecord};
use crate::metadata::{self, EXIF_DATETIME_FORMAT};
use crate::submission::{Outcome, Submission};
use crate::window::VerificationWindow;

/// Which instant a deployment verifies. A deployment selects one; the two
/// are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationStrategy {
    /// Classify by when the message reached the channel.
    ArrivalTime,
    /// Classify by the capture timestamp embedded in the photo.
    CaptureTime,
}

impl std::fmt::Display for ValidationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStrategy::ArrivalTime => write!(f, "arrival-time"),
            ValidationStrategy::CaptureTime => write!(f, "capture-time"),
        }
    }
}

/// Result of validating one submission.
#[derive(Debug)]
pub struct Verdict {
    pub outcome: Outcome,
    /// The instant the outcome was judged against, in the window's
    /// offset. Absent when no verifiable instant exists.
    pub verified_at: Option<DateTime<FixedOffset>>,
    /// Set when the outcome was recordable but the ledger append failed.
    /// The feedback is still sent; the gap is the operator's to reconcile.
    pub ledger_error: Option<LedgerError>,
}

/// Classifies inbound submissions and records verified attempts.
pub struct SubmissionValidator {
    window: VerificationWindow,
    strategy: ValidationStrategy,
    /// Absent in deployments that only give feedback without tracking.
    ledger: Option<Arc<StatusLedger>>,
}

impl SubmissionValidator {
    pub fn new(
        window: VerificationWindow,
        strategy: ValidationStrategy,
        ledger: Option<Arc<StatusLedger>>,
    ) -> Self {
        Self {
            window,
            strategy,
            ledger,
        }
    }

    pub fn window(&self) -> &VerificationWindow {
        &self.window
    }

    pub fn strategy(&self) -> ValidationStrategy {
        self.strategy
    }

    /// Produce exactly one outcome for the submission.
    pub fn validate(&self, submission: &Submission) -> Verdict {
        let instant = match self.resolve_instant(submission) {
            Ok(instant) => instant,
            Err(outcome) => {
                return Verdict {
                    outcome,
                    verified_at: None,
                    ledger_error: None,
                }
            }
        };

        let outcome = if self.window.contains(&instant) {
            Outcome::Confirmed
        } else {
            Outcome::Failed
        };
        let ledger_error = self.record(&submission.user_id, instant, outcome);

        Verdict {
            outcome,
            verified_at: Some(instant),
            ledger_error,
        }
    }

    /// Resolve the instant to verify, or the terminal outcome that stops
    /// the pipeline. Only the first attachment is evaluated; the rest of
    /// a multi-photo message is ignored.
    fn resolve_instant(&self, submission: &Submission) -> Result<DateTime<FixedOffset>, Outcome> {
        let attachment = submission.attachments.first().ok_or(Outcome::NoAttachment)?;
        if !attachment.has_allowed_extension() {
            return Err(Outcome::UnsupportedFile);
        }

        match self.strategy {
            ValidationStrategy::ArrivalTime => {
                Ok(submission.arrival.with_timezone(&self.window.tz()))
            }
            ValidationStrategy::CaptureTime => {
                let raw = metadata::capture_timestamp(&attachment.content)
                    .ok_or(Outcome::InvalidMetadata)?;
                let naive = NaiveDateTime::parse_from_str(&raw, EXIF_DATETIME_FORMAT)
                    .map_err(|_| Outcome::InvalidDateFormat)?;
                // Capture timestamps are naive wall-clock readings; they
                // are interpreted in the configured offset.
                Ok(self.window.interpret_local(naive))
            }
        }
    }

    fn record(
        &self,
        user_id: &str,
        instant: DateTime<FixedOffset>,
        outcome: Outcome,
    ) -> Option<LedgerError> {
        let ledger = self.ledger.as_ref()?;
        debug_assert!(outcome.is_recordable());

        let record = WakeupRecord {
            date: instant.date_naive(),
            outcome,
            recorded_at: Utc::now(),
        };
        match ledger.append(user_id, record) {
            Ok(()) => None,
            Err(e) => {
                error!(user = %user_id, error = %e, "ledger append failed; outcome not recorded");
                Some(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::Attachment;
    use chrono::TimeZone;

    fn submission(arrival: DateTime<Utc>, attachments: Vec<Attachment>) -> Submission {
        Submission {
            user_id: "101".into(),
            arrival,
            attachments,
        }
    }

    fn arrival_validator() -> SubmissionValidator {
        SubmissionValidator::new(
            VerificationWindow::default(),
            ValidationStrategy::ArrivalTime,
            None,
        )
    }

    // 08:00 at +09:00 on March 1.
    fn in_window_arrival() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).single().unwrap()
    }

    #[test]
    fn no_attachment_is_terminal() {
        let verdict = arrival_validator().validate(&submission(in_window_arrival(), vec![]));
        assert_eq!(verdict.outcome, Outcome::NoAttachment);
        assert!(verdict.verified_at.is_none());
    }

    #[test]
    fn gif_is_unsupported_regardless_of_timing() {
        let verdict = arrival_validator().validate(&submission(
            in_window_arrival(),
            vec![Attachment::new("proof.gif", vec![])],
        ));
        assert_eq!(verdict.outcome, Outcome::UnsupportedFile);
    }

    #[test]
    fn arrival_inside_window_confirms() {
        let verdict = arrival_validator().validate(&submission(
            in_window_arrival(),
            vec![Attachment::new("proof.jpg", vec![])],
        ));
        assert_eq!(verdict.outcome, Outcome::Confirmed);
        let verified = verdict.verified_at.unwrap();
        assert_eq!(verified.time(), chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn arrival_outside_window_fails() {
        // 12:00 at +09:00.
        let arrival = Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).single().unwrap();
        let verdict = arrival_validator().validate(&submission(
            arrival,
            vec![Attachment::new("proof.jpg", vec![])],
        ));
        assert_eq!(verdict.outcome, Outcome::Failed);
    }

    #[test]
    fn only_first_attachment_is_evaluated() {
        let verdict = arrival_validator().validate(&submission(
            in_window_arrival(),
            vec![
                Attachment::new("notes.txt", vec![]),
                Attachment::new("proof.jpg", vec![]),
            ],
        ));
        assert_eq!(verdict.outcome, Outcome::UnsupportedFile);
    }

    #[test]
    fn capture_strategy_without_metadata_is_invalid() {
        let validator = SubmissionValidator::new(
            VerificationWindow::default(),
            ValidationStrategy::CaptureTime,
            None,
        );
        let verdict = validator.validate(&submission(
            in_window_arrival(),
            vec![Attachment::new("proof.jpg", b"no exif here".to_vec())],
        ));
        assert_eq!(verdict.outcome, Outcome::InvalidMetadata);
    }
}
