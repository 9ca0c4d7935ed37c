//! Scripted in-memory directory for tests

use super::directory::Directory;
use super::types::{
    AuthIdentity, ChannelSummary, ChannelType, MembersPage, RawProfile, RawUser, SlackError,
    UserLookup,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// How a single profile lookup should fail
#[derive(Debug, Clone, Copy)]
pub enum LookupFailure {
    Transport,
    NotOk,
}

#[derive(Default)]
pub struct MockDirectory {
    channels: Vec<ChannelSummary>,
    /// channel id -> scripted pages, indexed by cursor ("" for the first page)
    pages: HashMap<String, HashMap<String, MembersPage>>,
    failing: HashMap<String, LookupFailure>,
    unreachable: bool,
    auth: Option<AuthIdentity>,
    pub list_channels_calls: AtomicUsize,
    pub list_members_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub requested_cursors: Mutex<Vec<Option<String>>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, id: &str, name: &str, is_private: bool) -> Self {
        self.channels.push(ChannelSummary {
            id: id.into(),
            name: name.into(),
            is_private,
            is_group: false,
        });
        self
    }

    /// Register a channel whose members arrive in a single page
    pub fn with_members(self, channel_id: &str, members: &[&str]) -> Self {
        let page = MembersPage {
            ok: true,
            members: members.iter().map(|m| m.to_string()).collect(),
            next_cursor: None,
            error: None,
        };
        self.with_page(channel_id, None, page)
    }

    pub fn with_page(mut self, channel_id: &str, cursor: Option<&str>, page: MembersPage) -> Self {
        self.pages
            .entry(channel_id.into())
            .or_default()
            .insert(cursor.unwrap_or_default().into(), page);
        self
    }

    pub fn with_failure(mut self, user_id: &str, failure: LookupFailure) -> Self {
        self.failing.insert(user_id.into(), failure);
        self
    }

    pub fn with_auth(mut self, auth: AuthIdentity) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Every call fails at the transport level
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    fn check_reachable(&self) -> Result<(), SlackError> {
        if self.unreachable {
            return Err(SlackError::Api("connection refused".into()));
        }
        Ok(())
    }
}

pub fn raw_user(id: &str) -> RawUser {
    RawUser {
        id: id.into(),
        name: Some(format!("user_{}", id.to_lowercase())),
        real_name: Some(format!("User {}", id)),
        profile: Some(RawProfile {
            real_name: None,
            display_name: None,
            email: Some(format!("{}@example.com", id.to_lowercase())),
        }),
    }
}

pub fn ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}

pub fn id_set<'a>(ids: impl IntoIterator<Item = &'a String>) -> HashSet<String> {
    ids.into_iter().cloned().collect()
}

#[async_trait]
impl Directory for MockDirectory {
    async fn list_channels(
        &self,
        types: &[ChannelType],
        _page_size: u32,
    ) -> Result<Vec<ChannelSummary>, SlackError> {
        self.list_channels_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        let want_public = types.contains(&ChannelType::Public);
        let want_private = types.contains(&ChannelType::Private);
        Ok(self
            .channels
            .iter()
            .filter(|c| if c.private() { want_private } else { want_public })
            .cloned()
            .collect())
    }

    async fn list_members(
        &self,
        channel_id: &str,
        cursor: Option<&str>,
        _page_size: u32,
    ) -> Result<MembersPage, SlackError> {
        self.list_members_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_cursors
            .lock()
            .unwrap()
            .push(cursor.map(String::from));
        self.check_reachable()?;

        self.pages
            .get(channel_id)
            .and_then(|pages| pages.get(cursor.unwrap_or_default()))
            .cloned()
            .ok_or_else(|| SlackError::Api(format!("no page scripted for {:?}", cursor)))
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<UserLookup, SlackError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        tokio::task::yield_now().await;

        match self.failing.get(user_id) {
            Some(LookupFailure::Transport) => Err(SlackError::Api("ratelimited".into())),
            Some(LookupFailure::NotOk) => Ok(UserLookup {
                ok: false,
                user: None,
                error: Some("user_not_found".into()),
            }),
            None => Ok(UserLookup {
                ok: true,
                user: Some(raw_user(user_id)),
                error: None,
            }),
        }
    }

    async fn test_credential(&self) -> Result<AuthIdentity, SlackError> {
        self.check_reachable()?;
        Ok(self.auth.clone().unwrap_or(AuthIdentity {
            ok: false,
            user: None,
            team: None,
            error: Some("invalid_auth".into()),
        }))
    }
}
