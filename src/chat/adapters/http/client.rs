//! Discord REST adapter built on `reqwest`.

use async_trait::async_trait;
use reqwest::{
    Client, Method, Response, StatusCode, Url,
    header::{AUTHORIZATION, RETRY_AFTER},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

use super::wire::{
    WireChannel, WireErrorBody, WireGuild, WireMessage, WireRateLimit, WireThreadList,
};
use crate::chat::{
    domain::{
        Channel, ChannelId, ChatDomainError, DirectConversation, ForumThread, Guild, GuildDetails,
        GuildId, MessageId, MessageRecord, UserId,
    },
    ports::{ChatActions, ChatTransport, TransportError, TransportResult},
};

/// Default REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts made for a rate-limited request before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

/// Longest honoured `retry_after` delay.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Largest message page the platform serves.
pub const MAX_MESSAGE_PAGE: usize = 100;

/// Page size used when a requested count is out of range.
pub const DEFAULT_MESSAGE_PAGE: usize = 50;

const GUILD_PAGE: &str = "200";
const FALLBACK_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Clamps a requested message count to the platform's page window.
#[must_use]
pub const fn clamp_message_page(count: usize) -> usize {
    if count == 0 || count > MAX_MESSAGE_PAGE {
        DEFAULT_MESSAGE_PAGE
    } else {
        count
    }
}

/// Connection settings for [`HttpChatTransport`].
#[derive(Clone)]
pub struct HttpTransportConfig {
    token: String,
    base_url: String,
    timeout: Duration,
}

impl HttpTransportConfig {
    /// Creates settings for the public API with the default timeout.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Overrides the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for HttpTransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Authenticated REST client for the chat platform.
#[derive(Clone)]
pub struct HttpChatTransport {
    client: Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for HttpChatTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn invalid(endpoint: &str) -> impl Fn(ChatDomainError) -> TransportError + '_ {
    move |err| TransportError::invalid_response(endpoint, err)
}

async fn retry_delay(response: Response) -> Duration {
    let from_header = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok());
    let from_body = response
        .json::<WireRateLimit>()
        .await
        .ok()
        .map(|body| body.retry_after);
    from_body
        .or(from_header)
        .and_then(|secs| {
            Duration::try_from_secs_f64(secs.clamp(0.0, MAX_RETRY_AFTER.as_secs_f64())).ok()
        })
        .unwrap_or(FALLBACK_RETRY_AFTER)
}

async fn rejection_message(response: Response, status: StatusCode) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<WireErrorBody>(&text)
        .map(|body| body.message)
        .ok()
        .or_else(|| Some(text.trim().to_owned()).filter(|trimmed| !trimmed.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned())
}

impl HttpChatTransport {
    /// Builds a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidBaseUrl`] when the base URL cannot
    /// be parsed or cannot carry a path, and [`TransportError::Connection`]
    /// when the HTTP client cannot be constructed.
    pub fn new(config: &HttpTransportConfig) -> TransportResult<Self> {
        let base_url =
            Url::parse(&config.base_url).map_err(|err| TransportError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: err.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::connection)?;
        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> TransportResult<Response> {
        let endpoint = url.path().to_owned();
        let mut attempt: u32 = 1;
        loop {
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .header(AUTHORIZATION, self.token.as_str());
            if let Some(payload) = body {
                request = request.json(payload);
            }
            tracing::debug!(method = %method, endpoint = %endpoint, attempt, "sending request");
            let response = request.send().await.map_err(TransportError::connection)?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let delay = retry_delay(response).await;
                if attempt >= MAX_ATTEMPTS {
                    return Err(TransportError::RateLimited {
                        endpoint,
                        retry_after_secs: delay.as_secs(),
                    });
                }
                tracing::warn!(
                    endpoint = %endpoint,
                    attempt,
                    retry_after_secs = delay.as_secs_f64(),
                    "rate limited, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt = attempt.saturating_add(1);
                continue;
            }

            if status.is_success() {
                return Ok(response);
            }
            let message = rejection_message(response, status).await;
            return Err(TransportError::Rejected {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> TransportResult<T> {
        let endpoint = url.path().to_owned();
        self.execute(Method::GET, url, None)
            .await?
            .json::<T>()
            .await
            .map_err(|err| TransportError::invalid_response(endpoint, err))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &Value,
    ) -> TransportResult<T> {
        let endpoint = url.path().to_owned();
        self.execute(method, url, Some(body))
            .await?
            .json::<T>()
            .await
            .map_err(|err| TransportError::invalid_response(endpoint, err))
    }

    async fn post_message(
        &self,
        channel_id: &ChannelId,
        body: &Value,
    ) -> TransportResult<MessageRecord> {
        let url = self.endpoint(&["channels", channel_id.as_str(), "messages"])?;
        let endpoint = url.path().to_owned();
        let message: WireMessage = self.send_json(Method::POST, url, body).await?;
        message.into_record().map_err(invalid(&endpoint))
    }

    fn reaction_url(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        emoji: &str,
    ) -> TransportResult<Url> {
        self.endpoint(&[
            "channels",
            channel_id.as_str(),
            "messages",
            message_id.as_str(),
            "reactions",
            emoji,
            "@me",
        ])
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn list_direct_conversations(&self) -> TransportResult<Vec<DirectConversation>> {
        let url = self.endpoint(&["users", "@me", "channels"])?;
        let endpoint = url.path().to_owned();
        let channels: Vec<WireChannel> = self.get_json(url).await?;
        channels
            .into_iter()
            .filter_map(|channel| channel.into_direct_conversation().transpose())
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid(&endpoint))
    }

    async fn list_guilds(&self) -> TransportResult<Vec<Guild>> {
        let mut url = self.endpoint(&["users", "@me", "guilds"])?;
        url.query_pairs_mut().append_pair("limit", GUILD_PAGE);
        let endpoint = url.path().to_owned();
        let guilds: Vec<WireGuild> = self.get_json(url).await?;
        guilds
            .into_iter()
            .map(WireGuild::into_guild)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid(&endpoint))
    }

    async fn list_channels(&self, guild_id: &GuildId) -> TransportResult<Vec<Channel>> {
        let url = self.endpoint(&["guilds", guild_id.as_str(), "channels"])?;
        let endpoint = url.path().to_owned();
        let channels: Vec<WireChannel> = self.get_json(url).await?;
        channels
            .into_iter()
            .map(WireChannel::into_channel)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid(&endpoint))
    }

    async fn fetch_messages(
        &self,
        channel_id: &ChannelId,
        count: usize,
    ) -> TransportResult<Vec<MessageRecord>> {
        let mut url = self.endpoint(&["channels", channel_id.as_str(), "messages"])?;
        url.query_pairs_mut()
            .append_pair("limit", &clamp_message_page(count).to_string());
        let endpoint = url.path().to_owned();
        let messages: Vec<WireMessage> = self.get_json(url).await?;
        messages
            .into_iter()
            .map(WireMessage::into_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid(&endpoint))
    }

    async fn search_guild_messages(
        &self,
        guild_id: &GuildId,
        params: &[(&'static str, String)],
    ) -> TransportResult<Vec<u8>> {
        let mut url = self.endpoint(&["guilds", guild_id.as_str(), "messages", "search"])?;
        url.query_pairs_mut().extend_pairs(params);
        let endpoint = url.path().to_owned();
        let body = self
            .execute(Method::GET, url, None)
            .await?
            .bytes()
            .await
            .map_err(|err| TransportError::invalid_response(endpoint, err))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ChatActions for HttpChatTransport {
    async fn guild_details(&self, guild_id: &GuildId) -> TransportResult<GuildDetails> {
        let mut url = self.endpoint(&["guilds", guild_id.as_str()])?;
        url.query_pairs_mut().append_pair("with_counts", "true");
        let endpoint = url.path().to_owned();
        let guild: WireGuild = self.get_json(url).await?;
        guild.into_details().map_err(invalid(&endpoint))
    }

    async fn fetch_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> TransportResult<MessageRecord> {
        let url = self.endpoint(&[
            "channels",
            channel_id.as_str(),
            "messages",
            message_id.as_str(),
        ])?;
        let endpoint = url.path().to_owned();
        let message: WireMessage = self.get_json(url).await?;
        message.into_record().map_err(invalid(&endpoint))
    }

    async fn send_message(
        &self,
        channel_id: &ChannelId,
        content: &str,
    ) -> TransportResult<MessageRecord> {
        self.post_message(channel_id, &json!({ "content": content }))
            .await
    }

    async fn reply_to_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        content: &str,
    ) -> TransportResult<MessageRecord> {
        let body = json!({
            "content": content,
            "message_reference": { "message_id": message_id.as_str() },
        });
        self.post_message(channel_id, &body).await
    }

    async fn edit_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        content: &str,
    ) -> TransportResult<MessageRecord> {
        let url = self.endpoint(&[
            "channels",
            channel_id.as_str(),
            "messages",
            message_id.as_str(),
        ])?;
        let endpoint = url.path().to_owned();
        let message: WireMessage = self
            .send_json(Method::PATCH, url, &json!({ "content": content }))
            .await?;
        message.into_record().map_err(invalid(&endpoint))
    }

    async fn delete_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> TransportResult<()> {
        let url = self.endpoint(&[
            "channels",
            channel_id.as_str(),
            "messages",
            message_id.as_str(),
        ])?;
        self.execute(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        emoji: &str,
    ) -> TransportResult<()> {
        let url = self.reaction_url(channel_id, message_id, emoji)?;
        self.execute(Method::PUT, url, None).await?;
        Ok(())
    }

    async fn remove_reaction(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        emoji: &str,
    ) -> TransportResult<()> {
        let url = self.reaction_url(channel_id, message_id, emoji)?;
        self.execute(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn open_direct_conversation(&self, user_id: &UserId) -> TransportResult<ChannelId> {
        let url = self.endpoint(&["users", "@me", "channels"])?;
        let endpoint = url.path().to_owned();
        let channel: WireChannel = self
            .send_json(
                Method::POST,
                url,
                &json!({ "recipient_id": user_id.as_str() }),
            )
            .await?;
        channel
            .into_channel()
            .map(|opened| opened.id().clone())
            .map_err(invalid(&endpoint))
    }

    async fn list_archived_threads(
        &self,
        channel_id: &ChannelId,
    ) -> TransportResult<Vec<ForumThread>> {
        let url = self.endpoint(&[
            "channels",
            channel_id.as_str(),
            "threads",
            "archived",
            "public",
        ])?;
        let endpoint = url.path().to_owned();
        let listing: WireThreadList = self.get_json(url).await?;
        listing
            .threads
            .into_iter()
            .map(WireChannel::into_thread)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid(&endpoint))
    }
}
