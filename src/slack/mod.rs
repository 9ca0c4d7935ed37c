//! Slack integration module
//!
//! Typed access to the channel, membership, profile and auth endpoints
//! behind the [`Directory`] capability.

mod client;
mod directory;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{SlackClient, SLACK_API_BASE};
pub use directory::Directory;
pub use types::{
    AuthIdentity, ChannelIdentity, ChannelSummary, ChannelType, ConnectionStatus, CursorTrail,
    MembersPage, RawProfile, RawUser, SlackError, UserLookup, UserProfile, NO_EMAIL,
};
