//! Inbound submissions, classification outcomes, and outbound feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::VerificationWindow;

/// Filename extensions accepted as proof photos.
const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// One photo attached to a submission. The gateway collaborator fetches
/// the bytes before handing the submission to the core; the core itself
/// performs no network I/O.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// Whether the filename carries an allow-listed image extension
    /// (case-insensitive).
    pub fn has_allowed_extension(&self) -> bool {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ALLOWED_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }
}

/// One inbound wake-up proof. Immutable; discarded after processing.
#[derive(Debug, Clone)]
pub struct Submission {
    pub user_id: String,
    pub arrival: DateTime<Utc>,
    pub attachments: Vec<Attachment>,
}

/// The single classification result of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Verified instant inside the window.
    Confirmed,
    /// Verified instant outside the window.
    Failed,
    /// No usable capture metadata in the photo.
    InvalidMetadata,
    /// Capture metadata present but not a parseable datetime.
    InvalidDateFormat,
    /// First attachment is not an allow-listed image type.
    UnsupportedFile,
    /// Nothing attached.
    NoAttachment,
}

impl Outcome {
    /// Only outcomes resolvable to a concrete day produce ledger entries.
    pub fn is_recordable(self) -> bool {
        matches!(self, Outcome::Confirmed | Outcome::Failed)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Outcome::Confirmed => "CONFIRMED",
            Outcome::Failed => "FAILED",
            Outcome::InvalidMetadata => "INVALID_METADATA",
            Outcome::InvalidDateFormat => "INVALID_DATE_FORMAT",
            Outcome::UnsupportedFile => "UNSUPPORTED_FILE",
            Outcome::NoAttachment => "NO_ATTACHMENT",
        };
        write!(f, "{s}")
    }
}

/// User-visible feedback for one outcome: a reaction emoji plus a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub reaction: &'static str,
    pub message: String,
}

impl Feedback {
    /// Build the feedback for an outcome, addressed at `mention`.
    pub fn for_outcome(outcome: Outcome, mention: &str, window: &VerificationWindow) -> Self {
        match outcome {
            Outcome::Confirmed => Self {
                reaction: "💪",
                message: format!(
                    "{mention} Wake-up CONFIRMED. Discipline equals freedom. Well done."
                ),
            },
            Outcome::Failed => Self {
                reaction: "🔴",
                message: format!(
                    "{mention} Wake-up FAILED. That photo wasn't taken between {} and {}. \
                     No shortcuts. No excuses.",
                    window.start().format("%H:%M"),
                    window.end().format("%H:%M"),
                ),
            },
            Outcome::InvalidMetadata => Self {
                reaction: "⚠️",
                message: format!(
                    "{mention} INVALID photo. Couldn't confirm the date. \
                     Only legit submissions count. Step up."
                ),
            },
            Outcome::InvalidDateFormat => Self {
                reaction: "⚠️",
                message: format!(
                    "{mention} INVALID date format in EXIF data. \
                     Couldn't confirm the date. Step up."
                ),
            },
            Outcome::UnsupportedFile => Self {
                reaction: "❌",
                message: format!(
                    "{mention} UNACCEPTABLE. Only image files are allowed. \
                     Stick to the plan. No deviations."
                ),
            },
            Outcome::NoAttachment => Self {
                reaction: "❗",
                message: format!(
                    "{mention} INCOMPLETE submission. No image attached. Get it right. Now."
                ),
            },
        }
    }
}
