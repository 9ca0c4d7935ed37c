//! Channel lookup and membership pagination

use super::batcher::RateLimitedBatcher;
use super::error::CompareError;
use super::resolver::{ProfileLookupWarning, ProfileResolver};
use crate::config::FetchSettings;
use crate::slack::{ChannelIdentity, ChannelType, CursorTrail, Directory, UserProfile};
use std::collections::HashSet;

const VISIBLE_CHANNEL_TYPES: [ChannelType; 2] = [ChannelType::Public, ChannelType::Private];

/// Resolved profiles of one channel, in directory delivery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSet {
    profiles: Vec<UserProfile>,
}

impl MembershipSet {
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[UserProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.profiles.iter().map(|p| p.id.as_str()).collect()
    }
}

impl FromIterator<UserProfile> for MembershipSet {
    fn from_iter<I: IntoIterator<Item = UserProfile>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone)]
pub struct ChannelMembership {
    pub channel: ChannelIdentity,
    pub members: MembershipSet,
    pub warnings: Vec<ProfileLookupWarning>,
}

/// Strip leading `#` and surrounding whitespace from a user supplied name
pub fn clean_channel_name(name: &str) -> &str {
    name.trim().trim_start_matches('#')
}

pub struct MembershipFetcher<'a, D: ?Sized> {
    directory: &'a D,
    settings: FetchSettings,
    batcher: RateLimitedBatcher,
}

impl<'a, D: Directory + ?Sized> MembershipFetcher<'a, D> {
    pub fn new(directory: &'a D, settings: FetchSettings, batcher: RateLimitedBatcher) -> Self {
        Self {
            directory,
            settings,
            batcher,
        }
    }

    pub async fn fetch(&self, channel_name: &str) -> Result<ChannelMembership, CompareError> {
        let mut channel = self.find_channel(channel_name).await?;
        tracing::info!(
            "Fetching members of #{} ({}{})",
            channel.name,
            channel.id,
            if channel.is_private { ", private" } else { "" }
        );

        let member_ids = self.fetch_member_ids(&channel).await?;
        channel.member_count = Some(member_ids.len());

        let resolved = ProfileResolver::new(self.directory, self.batcher)
            .resolve(&member_ids)
            .await;

        tracing::info!(
            "#{}: {} members, {} profiles resolved",
            channel.name,
            member_ids.len(),
            resolved.profiles.len()
        );

        Ok(ChannelMembership {
            channel,
            members: MembershipSet::new(resolved.profiles),
            warnings: resolved.warnings,
        })
    }

    /// Exact, case-sensitive match among public and private channels
    pub async fn find_channel(&self, channel_name: &str) -> Result<ChannelIdentity, CompareError> {
        let wanted = clean_channel_name(channel_name);

        let channels = self
            .directory
            .list_channels(&VISIBLE_CHANNEL_TYPES, self.settings.channel_page_size)
            .await
            .map_err(|source| CompareError::DirectoryUnavailable {
                channel: channel_name.to_string(),
                source,
            })?;

        channels
            .into_iter()
            .find(|c| c.name == wanted)
            .map(|c| ChannelIdentity {
                is_private: c.private(),
                id: c.id,
                name: c.name,
                member_count: None,
            })
            .ok_or_else(|| CompareError::ChannelNotFound {
                name: channel_name.to_string(),
            })
    }

    /// Drain the cursor-paginated member list, de-duplicating IDs.
    pub async fn fetch_member_ids(
        &self,
        channel: &ChannelIdentity,
    ) -> Result<Vec<String>, CompareError> {
        let mut members = Vec::new();
        let mut seen = HashSet::new();
        let mut trail = CursorTrail::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .directory
                .list_members(&channel.id, cursor.as_deref(), self.settings.member_page_size)
                .await
                .map_err(|source| CompareError::DirectoryUnavailable {
                    channel: channel.name.clone(),
                    source,
                })?;
            pages += 1;

            if !page.ok {
                return Err(CompareError::MembershipFetch {
                    channel: channel.name.clone(),
                    message: page.error.unwrap_or_else(|| "Unknown error".to_string()),
                });
            }

            let received = page.members.len();
            for id in page.members {
                if seen.insert(id.clone()) {
                    members.push(id);
                }
            }
            tracing::debug!(
                "#{} page {}: {} ids ({} total)",
                channel.name,
                pages,
                received,
                members.len()
            );

            match trail.advance(page.next_cursor) {
                Ok(None) => break,
                Ok(next) => cursor = next,
                Err(repeated) => {
                    return Err(CompareError::MembershipFetch {
                        channel: channel.name.clone(),
                        message: format!("pagination cursor repeated ({})", repeated),
                    });
                }
            }
        }

        Ok(members)
    }
}
