//! Directory capability consumed by the membership pipeline
//!
//! ```text
//! ChannelComparer
//!       |
//!       v
//! Directory (trait)
//!       |
//!       +---> SlackClient (HTTP)
//!       |
//!       +---> MockDirectory (tests)
//! ```

use super::types::{AuthIdentity, ChannelSummary, ChannelType, MembersPage, SlackError, UserLookup};
use async_trait::async_trait;

#[async_trait]
pub trait Directory: Send + Sync {
    /// List every channel of the given types visible to the credential
    async fn list_channels(
        &self,
        types: &[ChannelType],
        page_size: u32,
    ) -> Result<Vec<ChannelSummary>, SlackError>;

    /// Fetch one page of member IDs. A page with `ok == false` is returned as a value.
    async fn list_members(
        &self,
        channel_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<MembersPage, SlackError>;

    async fn get_user_profile(&self, user_id: &str) -> Result<UserLookup, SlackError>;

    async fn test_credential(&self) -> Result<AuthIdentity, SlackError>;
}
