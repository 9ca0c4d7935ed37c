use crate::slack::SlackError;
use thiserror::Error;

/// Failures that abort a comparison. Per-profile problems never show up
/// here; they are reported as warnings instead.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error(
        "Channel '{name}' not found. Make sure the bot is added to the channel if it's private."
    )]
    ChannelNotFound { name: String },

    #[error("Failed to reach Slack while fetching '{channel}': {source}")]
    DirectoryUnavailable {
        channel: String,
        #[source]
        source: SlackError,
    },

    #[error("Failed to fetch members for channel '{channel}': {message}")]
    MembershipFetch { channel: String, message: String },
}
