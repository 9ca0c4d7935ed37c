//! Channel membership pipeline
//!
//! Channel lookup and cursor pagination fail fast; per-user profile
//! lookups fail soft and surface as warnings.

mod batcher;
mod compare;
mod error;
mod fetcher;
mod resolver;

pub use batcher::RateLimitedBatcher;
pub use compare::{compare, ChannelComparer, ComparisonResult};
pub use error::CompareError;
pub use fetcher::{clean_channel_name, ChannelMembership, MembershipFetcher, MembershipSet};
pub use resolver::{ProfileLookupWarning, ProfileResolver, ResolvedProfiles};
