//! Slack Web API client

use super::directory::Directory;
use super::types::{
    AuthIdentity, ChannelListResponse, ChannelSummary, ChannelType, CursorTrail, MembersPage,
    MembersResponse, SlackError, UserLookup,
};
use crate::config::{AppConfig, DEFAULT_HTTP_TIMEOUT_SECS};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

pub struct SlackClient {
    http: Client,
    token: SecretString,
    api_base: String,
}

impl SlackClient {
    pub fn new(token: SecretString) -> Result<Self, SlackError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            token,
            api_base: SLACK_API_BASE.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SlackError> {
        if !config.api_base.starts_with("https://") && !config.api_base.starts_with("http://") {
            return Err(SlackError::Config(format!(
                "API base must be an http(s) URL, got '{}'",
                config.api_base
            )));
        }

        let http = Client::builder().timeout(config.http_timeout).build()?;

        Ok(Self {
            http,
            token: config.token.clone(),
            api_base: config.api_base.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), method)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, SlackError> {
        let response = self
            .http
            .get(self.method_url(method))
            .bearer_auth(self.token.expose_secret())
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SlackError::Api(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Directory for SlackClient {
    async fn list_channels(
        &self,
        types: &[ChannelType],
        page_size: u32,
    ) -> Result<Vec<ChannelSummary>, SlackError> {
        let types = types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut all_channels = Vec::new();
        let mut trail = CursorTrail::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = vec![
                ("types", types.clone()),
                ("limit", page_size.to_string()),
                ("exclude_archived", "true".to_string()),
            ];
            if let Some(ref c) = cursor {
                params.push(("cursor", c.clone()));
            }

            let resp: ChannelListResponse = self.get("conversations.list", &params).await?;

            if !resp.ok {
                return Err(SlackError::Api(
                    resp.error.unwrap_or_else(|| "Unknown error".into()),
                ));
            }

            tracing::debug!("conversations.list returned {} channels", resp.channels.len());
            all_channels.extend(resp.channels);

            let next = resp.response_metadata.and_then(|m| m.cursor());
            match trail.advance(next) {
                Ok(None) => break,
                Ok(next) => cursor = next,
                Err(repeated) => {
                    return Err(SlackError::Api(format!(
                        "conversations.list repeated cursor {}",
                        repeated
                    )));
                }
            }
        }

        Ok(all_channels)
    }

    async fn list_members(
        &self,
        channel_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<MembersPage, SlackError> {
        let mut params = vec![
            ("channel", channel_id.to_string()),
            ("limit", page_size.to_string()),
        ];
        if let Some(c) = cursor {
            params.push(("cursor", c.to_string()));
        }

        let resp: MembersResponse = self.get("conversations.members", &params).await?;
        Ok(resp.into())
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<UserLookup, SlackError> {
        self.get("users.info", &[("user", user_id.to_string())]).await
    }

    async fn test_credential(&self) -> Result<AuthIdentity, SlackError> {
        self.get("auth.test", &[]).await
    }
}
