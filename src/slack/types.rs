//! Slack data types and error definitions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Conversation types accepted by `conversations.list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Public,
    Private,
}

impl ChannelType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelType::Public => "public_channel",
            ChannelType::Private => "private_channel",
        }
    }
}

/// Channel entry as returned by the channel listing
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
    /// Legacy private channels report `is_group` instead of `is_private`
    #[serde(default)]
    pub is_group: bool,
}

impl ChannelSummary {
    pub fn private(&self) -> bool {
        self.is_private || self.is_group
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelListResponse {
    pub ok: bool,
    #[serde(default)]
    pub channels: Vec<ChannelSummary>,
    pub error: Option<String>,
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    pub next_cursor: Option<String>,
}

impl ResponseMetadata {
    pub fn cursor(self) -> Option<String> {
        self.next_cursor.filter(|c| !c.is_empty())
    }
}

/// Cursors already requested during one paginated walk.
///
/// A walk ends when the API stops returning a cursor. A cursor that was
/// already requested means the API is cycling, and [`advance`](Self::advance)
/// hands it back as an error so the caller can abort.
#[derive(Debug, Default)]
pub struct CursorTrail {
    requested: HashSet<String>,
}

impl CursorTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Ok(None)` when pagination is done, `Err(cursor)` on a revisit.
    pub fn advance(&mut self, next: Option<String>) -> Result<Option<String>, String> {
        match next.filter(|c| !c.is_empty()) {
            None => Ok(None),
            Some(cursor) if self.requested.insert(cursor.clone()) => Ok(Some(cursor)),
            Some(cursor) => Err(cursor),
        }
    }
}

/// One page of channel membership
#[derive(Debug, Clone, Default)]
pub struct MembersPage {
    pub ok: bool,
    pub members: Vec<String>,
    pub next_cursor: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MembersResponse {
    pub ok: bool,
    #[serde(default)]
    pub members: Vec<String>,
    pub error: Option<String>,
    pub response_metadata: Option<ResponseMetadata>,
}

impl From<MembersResponse> for MembersPage {
    fn from(resp: MembersResponse) -> Self {
        Self {
            ok: resp.ok,
            members: resp.members,
            next_cursor: resp.response_metadata.and_then(ResponseMetadata::cursor),
            error: resp.error,
        }
    }
}

/// Raw `users.info` user object; every field past `id` is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    pub id: String,
    pub name: Option<String>,
    pub real_name: Option<String>,
    pub profile: Option<RawProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfile {
    pub real_name: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Result of a single profile lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserLookup {
    pub ok: bool,
    pub user: Option<RawUser>,
    pub error: Option<String>,
}

/// Auth test response info
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthIdentity {
    pub ok: bool,
    pub user: Option<String>,
    pub team: Option<String>,
    pub error: Option<String>,
}

/// Resolved Slack user, keyed by `id` for comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub real_name: String,
    pub email: String,
    pub display_name: String,
}

pub const NO_EMAIL: &str = "No email";

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl UserProfile {
    pub fn from_raw(raw: &RawUser) -> Self {
        let profile = raw.profile.as_ref();
        let profile_real_name = profile.and_then(|p| present(p.real_name.as_ref()));
        let profile_display_name = profile.and_then(|p| present(p.display_name.as_ref()));
        let real_name = present(raw.real_name.as_ref());
        let handle = present(raw.name.as_ref());

        Self {
            id: raw.id.clone(),
            name: handle.unwrap_or("unknown").to_string(),
            real_name: real_name
                .or(profile_real_name)
                .unwrap_or("Unknown User")
                .to_string(),
            email: profile
                .and_then(|p| present(p.email.as_ref()))
                .unwrap_or(NO_EMAIL)
                .to_string(),
            display_name: profile_display_name
                .or(real_name)
                .or(handle)
                .unwrap_or("Unknown")
                .to_string(),
        }
    }
}

/// Channel resolved from a user supplied name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelIdentity {
    pub id: String,
    pub name: String,
    pub is_private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
}

/// Credential check outcome; never an error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}
