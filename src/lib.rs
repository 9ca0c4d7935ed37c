// Library entry point for the slack-member-comparer CLI
pub mod commands;
pub mod config;
pub mod members;
pub mod slack;

pub use config::AppConfig;
pub use members::{ChannelComparer, CompareError, ComparisonResult};
pub use slack::{Directory, SlackClient};
