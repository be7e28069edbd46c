use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    cookie::{CookieStore, Jar},
    Url,
};
use serde::Deserialize;

use crate::{
    domain::message::Message,
    usecases::load_history::{HistorySource, HistorySourceError},
};

use super::{
    error::TransportError,
    roster::{parse_index_page, RosterPage},
};

const HISTORY_PATH: &str = "get_private_messages";
const LOGIN_PATH: &str = "login";
const SOCKET_IO_PATH: &str = "socket.io/?EIO=4&transport=websocket";

/// One entry of `GET /get_private_messages/{peer}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct HistoryEntry {
    username: String,
    msg: String,
    #[serde(default)]
    timestamp: Option<String>,
}

impl HistoryEntry {
    fn into_message(self) -> Message {
        let message = Message::new(self.username, self.msg);
        match self.timestamp {
            Some(at) => message.with_sent_at(at),
            None => message,
        }
    }
}

/// HTTP side of the chat server. Cookies from `login` are reused by every call.
#[derive(Debug, Clone)]
pub struct ChatHttpClient {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl ChatHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = parse_base_url(base_url)?;
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            jar,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Posts the login form; the server answers with a session cookie and a redirect.
    pub async fn login(&self, username: &str) -> Result<(), TransportError> {
        let url = self.endpoint(&[LOGIN_PATH])?;
        let response = self
            .client
            .post(url)
            .form(&[("username", username)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::LoginRejected {
                username: username.to_owned(),
                status: status.as_u16(),
            });
        }

        if self.session_cookie().is_none() {
            return Err(TransportError::MissingSessionCookie);
        }

        tracing::info!(username, "logged in to chat server");
        Ok(())
    }

    /// Fetches the index page and reads who we are and who we can talk to.
    pub async fn roster(&self) -> Result<RosterPage, TransportError> {
        let html = self
            .client
            .get(self.base_url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let page = parse_index_page(&html)?;
        tracing::debug!(
            current_username = %page.current_username,
            users = page.usernames.len(),
            "roster loaded from index page"
        );
        Ok(page)
    }

    /// `Cookie` header value for the websocket handshake.
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(ToOwned::to_owned))
    }

    /// Engine.IO websocket endpoint matching the HTTP base URL.
    pub fn socket_url(&self) -> Result<String, TransportError> {
        let base = self.base_url.as_str();
        if let Some(rest) = base.strip_prefix("http://") {
            return Ok(format!("ws://{rest}{SOCKET_IO_PATH}"));
        }
        if let Some(rest) = base.strip_prefix("https://") {
            return Ok(format!("wss://{rest}{SOCKET_IO_PATH}"));
        }

        Err(TransportError::InvalidBaseUrl(base.to_owned()))
    }

    fn history_url(&self, peer: &str) -> Result<Url, TransportError> {
        self.endpoint(&[HISTORY_PATH, peer])
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl HistorySource for ChatHttpClient {
    async fn fetch_history(&self, peer: &str) -> Result<Vec<Message>, HistorySourceError> {
        let url = self
            .history_url(peer)
            .map_err(|error| HistorySourceError::Network(error.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| HistorySourceError::Network(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HistorySourceError::Status {
                code: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("HTTP error")
                    .to_owned(),
            });
        }

        let entries: Vec<HistoryEntry> = response
            .json()
            .await
            .map_err(|error| HistorySourceError::InvalidData(error.to_string()))?;

        Ok(entries.into_iter().map(HistoryEntry::into_message).collect())
    }
}

/// Accepts `http(s)://host[:port][/prefix]` and normalises it to end with `/`.
fn parse_base_url(raw: &str) -> Result<Url, TransportError> {
    let invalid = || TransportError::InvalidBaseUrl(raw.to_owned());

    let mut url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
