//! Seams to the chat-platform collaborator.
//!
//! The chat client itself (connection, auth, message objects, reaction
//! rendering) lives outside this crate. The core consumes two narrow
//! interfaces: inbound events arrive as [`InboundMessage`] values pushed
//! into [`MessageHandler::handle`], and outbound feedback leaves through
//! the [`FeedbackSink`] trait. A gateway implementation adapts both to a
//! concrete platform.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::DeliveryError;
use crate::submission::{Attachment, Feedback, Submission};
use crate::validator::{SubmissionValidator, Verdict};

pub type ChannelId = u64;
pub type MessageId = u64;

/// One inbound chat event, already resolved by the gateway: attachment
/// bytes are fetched, the author mention string is rendered.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub author_id: String,
    /// Platform mention string for the author, e.g. `<@101>`.
    pub author_mention: String,
    pub arrival: DateTime<Utc>,
    pub attachments: Vec<Attachment>,
}

/// Outbound side of the chat platform. Implementations deliver reactions
/// and messages; the core treats every failure as best-effort.
pub trait FeedbackSink: Send + Sync {
    /// Attach a reaction emoji to a message.
    fn react(&self, channel: ChannelId, message: MessageId, emoji: &str)
        -> Result<(), DeliveryError>;

    /// Post a text message to a channel.
    fn send(&self, channel: ChannelId, text: &str) -> Result<(), DeliveryError>;
}

/// Thin shell between the gateway and the verification core: filters
/// events, runs the validator, and sends feedback.
pub struct MessageHandler {
    channel_id: ChannelId,
    bot_user_id: String,
    validator: SubmissionValidator,
}

impl MessageHandler {
    pub fn new(channel_id: ChannelId, bot_user_id: String, validator: SubmissionValidator) -> Self {
        Self {
            channel_id,
            bot_user_id,
            validator,
        }
    }

    /// Post the on-connect announcement to the configured channel.
    pub fn announce_ready(&self, sink: &dyn FeedbackSink) {
        let text = "Reveille reporting for duty. Time to get after it.";
        if let Err(e) = sink.send(self.channel_id, text) {
            warn!(error = %e, "ready announcement failed");
        }
    }

    /// Process one inbound event. Events from other channels or from the
    /// bot itself are dropped. Returns the verdict when a submission was
    /// actually processed.
    ///
    /// Delivery failures are logged and swallowed so the next submission
    /// is never blocked by a flaky platform.
    pub fn handle(&self, message: InboundMessage, sink: &dyn FeedbackSink) -> Option<Verdict> {
        if message.channel_id != self.channel_id {
            return None;
        }
        if message.author_id == self.bot_user_id {
            return None;
        }

        let submission = Submission {
            user_id: message.author_id,
            arrival: message.arrival,
            attachments: message.attachments,
        };
        let verdict = self.validator.validate(&submission);
        debug!(user = %submission.user_id, outcome = %verdict.outcome, "submission classified");

        let feedback = Feedback::for_outcome(
            verdict.outcome,
            &message.author_mention,
            self.validator.window(),
        );
        if let Err(e) = sink.react(message.channel_id, message.message_id, feedback.reaction) {
            warn!(error = %e, "feedback reaction failed");
        }
        if let Err(e) = sink.send(message.channel_id, &feedback.message) {
            warn!(error = %e, "feedback message failed");
        }

        Some(verdict)
    }
}
