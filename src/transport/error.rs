use thiserror::Error;

use super::{protocol::ProtocolError, roster::RosterError};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server URL `{0}`: expected http:// or https://")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("login for `{username}` was rejected with HTTP {status}")]
    LoginRejected { username: String, status: u16 },
    #[error("server did not issue a session cookie")]
    MissingSessionCookie,
    #[error("index page could not be read: {0}")]
    Roster(#[from] RosterError),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("invalid websocket request header: {0}")]
    InvalidHeader(#[from] tokio_tungstenite::tungstenite::http::header::InvalidHeaderValue),
    #[error("socket protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
