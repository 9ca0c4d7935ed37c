//! Symmetric difference between two channel memberships

use super::batcher::RateLimitedBatcher;
use super::error::CompareError;
use super::fetcher::{ChannelMembership, MembershipFetcher};
use super::resolver::ProfileLookupWarning;
use crate::config::{FetchSettings, ResolverSettings};
use crate::slack::{ConnectionStatus, Directory, UserProfile};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub channel_a_name: String,
    pub channel_b_name: String,
    pub unique_to_a: Vec<UserProfile>,
    pub unique_to_b: Vec<UserProfile>,
    pub total_unique_count: usize,
    /// Members resolved in both channels
    pub common_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ProfileLookupWarning>,
}

impl ComparisonResult {
    pub fn is_identical(&self) -> bool {
        self.total_unique_count == 0
    }
}

/// Pure set comparison keyed on user ID. Channel names come from the
/// resolved channels, not from what the user typed.
pub fn compare(a: &ChannelMembership, b: &ChannelMembership) -> ComparisonResult {
    let ids_a = a.members.ids();
    let ids_b = b.members.ids();

    let unique_to_a: Vec<UserProfile> = a
        .members
        .profiles()
        .iter()
        .filter(|p| !ids_b.contains(p.id.as_str()))
        .cloned()
        .collect();
    let unique_to_b: Vec<UserProfile> = b
        .members
        .profiles()
        .iter()
        .filter(|p| !ids_a.contains(p.id.as_str()))
        .cloned()
        .collect();

    ComparisonResult {
        channel_a_name: a.channel.name.clone(),
        channel_b_name: b.channel.name.clone(),
        total_unique_count: unique_to_a.len() + unique_to_b.len(),
        common_count: ids_a.intersection(&ids_b).count(),
        unique_to_a,
        unique_to_b,
        warnings: Vec::new(),
    }
}

/// Entry point for the CLI: fetches both channels and compares them
pub struct ChannelComparer<D> {
    directory: D,
    fetch: FetchSettings,
    resolver: ResolverSettings,
}

impl<D: Directory> ChannelComparer<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            fetch: FetchSettings::default(),
            resolver: ResolverSettings::default(),
        }
    }

    pub fn with_fetch_settings(mut self, fetch: FetchSettings) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_resolver_settings(mut self, resolver: ResolverSettings) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    fn fetcher(&self) -> MembershipFetcher<'_, D> {
        MembershipFetcher::new(
            &self.directory,
            self.fetch,
            RateLimitedBatcher::from(self.resolver),
        )
    }

    pub async fn fetch_membership(
        &self,
        channel_name: &str,
    ) -> Result<ChannelMembership, CompareError> {
        self.fetcher().fetch(channel_name).await
    }

    /// Channels are fetched one after the other so they share the
    /// rate-limit budget instead of competing for it.
    pub async fn compare_channels(
        &self,
        channel_a: &str,
        channel_b: &str,
    ) -> Result<ComparisonResult, CompareError> {
        tracing::info!("Fetching members from #{}", channel_a);
        let a = self.fetch_membership(channel_a).await?;

        tracing::info!("Fetching members from #{}", channel_b);
        let b = self.fetch_membership(channel_b).await?;

        let mut result = compare(&a, &b);
        result.warnings = a.warnings.into_iter().chain(b.warnings).collect();

        tracing::info!(
            "#{} vs #{}: {} unique, {} common",
            result.channel_a_name,
            result.channel_b_name,
            result.total_unique_count,
            result.common_count
        );
        Ok(result)
    }

    /// Never errors: any failure reads as `ok: false`.
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.directory.test_credential().await {
            Ok(auth) if auth.ok => ConnectionStatus {
                ok: true,
                user: Some(or_unknown(auth.user)),
                team: Some(or_unknown(auth.team)),
            },
            Ok(auth) => {
                tracing::debug!(
                    "Credential rejected: {}",
                    auth.error.as_deref().unwrap_or("unknown reason")
                );
                ConnectionStatus::default()
            }
            Err(e) => {
                tracing::debug!("Credential check failed: {}", e);
                ConnectionStatus::default()
            }
        }
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}
