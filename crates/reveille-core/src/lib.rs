//! # Reveille Core Library
//!
//! This library provides the core business logic for Reveille, a chat bot
//! that verifies a daily wake-up ritual. Members post a photo to a channel
//! during a fixed morning window; the bot classifies each submission,
//! reacts with immediate feedback, and keeps a persistent per-user record.
//! The chat-platform client itself is an external collaborator wired in
//! through the narrow traits in [`gateway`].
//!
//! ## Architecture
//!
//! - **Window**: pure daily-window arithmetic against a fixed UTC offset
//! - **Metadata**: best-effort capture-timestamp extraction from image bytes
//! - **Validator**: classifies one submission into exactly one [`Outcome`]
//! - **Ledger**: append-only JSON-backed per-user outcome history
//! - **Alarm**: wall-clock state machine that fires boundary reminders
//!   exactly once per boundary per day; the caller polls `tick()`
//!
//! ## Key Components
//!
//! - [`SubmissionValidator`]: submission classification pipeline
//! - [`StatusLedger`]: outcome persistence
//! - [`AlarmScheduler`]: reminder scheduling
//! - [`MessageHandler`]: thin shell between the chat gateway and the core

pub mod alarm;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod metadata;
pub mod submission;
pub mod validator;
pub mod window;

pub use alarm::{AlarmEvent, AlarmScheduler};
pub use config::Config;
pub use error::{ConfigError, CoreError, DeliveryError, LedgerError};
pub use gateway::{ChannelId, FeedbackSink, InboundMessage, MessageHandler, MessageId};
pub use ledger::{StatusLedger, WakeupRecord};
pub use metadata::{capture_timestamp, EXIF_DATETIME_FORMAT};
pub use submission::{Attachment, Feedback, Outcome, Submission};
pub use validator::{SubmissionValidator, ValidationStrategy, Verdict};
pub use window::VerificationWindow;
