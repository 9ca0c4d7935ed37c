//! Batched profile resolution
//!
//! Lookups are fail-soft: a failed or not-ok lookup produces a
//! [`ProfileLookupWarning`] and the ID is left out of the result.

use super::batcher::RateLimitedBatcher;
use crate::slack::{Directory, UserProfile};
use serde::Serialize;
use std::fmt;

/// A member ID whose profile could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLookupWarning {
    pub user_id: String,
    pub reason: String,
}

impl fmt::Display for ProfileLookupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to get info for user {}: {}", self.user_id, self.reason)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedProfiles {
    pub profiles: Vec<UserProfile>,
    pub warnings: Vec<ProfileLookupWarning>,
}

pub struct ProfileResolver<'a, D: ?Sized> {
    directory: &'a D,
    batcher: RateLimitedBatcher,
}

impl<'a, D: Directory + ?Sized> ProfileResolver<'a, D> {
    pub fn new(directory: &'a D, batcher: RateLimitedBatcher) -> Self {
        Self { directory, batcher }
    }

    /// Never fails as a whole; see the module docs.
    pub async fn resolve(&self, user_ids: &[String]) -> ResolvedProfiles {
        let directory = self.directory;
        let outcomes = self
            .batcher
            .run(user_ids, |user_id| {
                let user_id = user_id.clone();
                async move {
                    let result = lookup(directory, &user_id).await;
                    result.map_err(|reason| ProfileLookupWarning { user_id, reason })
                }
            })
            .await;

        let mut resolved = ResolvedProfiles::default();
        for outcome in outcomes {
            match outcome {
                Ok(profile) => resolved.profiles.push(profile),
                Err(warning) => {
                    tracing::warn!("{}", warning);
                    resolved.warnings.push(warning);
                }
            }
        }

        tracing::debug!(
            "Resolved {}/{} profiles ({} warnings)",
            resolved.profiles.len(),
            user_ids.len(),
            resolved.warnings.len()
        );
        resolved
    }
}

async fn lookup<D: Directory + ?Sized>(directory: &D, user_id: &str) -> Result<UserProfile, String> {
    let response = directory
        .get_user_profile(user_id)
        .await
        .map_err(|e| e.to_string())?;

    match response.user {
        Some(user) if response.ok => Ok(UserProfile::from_raw(&user)),
        _ => Err(response
            .error
            .unwrap_or_else(|| "user not returned".to_string())),
    }
}
