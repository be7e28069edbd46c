//! Socket.IO v5 over Engine.IO v4 text frames.
//!
//! Only the subset this client needs: the open handshake, heartbeats,
//! namespace connect/disconnect and JSON events on the default namespace.
//! Binary attachments are rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const EVENT_PRIVATE_MESSAGE: &str = "private_message";
pub const EVENT_ONLINE_USERS: &str = "update_online_users";
pub const EVENT_SEND_PRIVATE_MESSAGE: &str = "send_private_message";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty frame")]
    EmptyFrame,
    #[error("unknown engine packet type `{0}`")]
    UnknownEnginePacket(char),
    #[error("unknown socket packet type `{0}`")]
    UnknownSocketPacket(char),
    #[error("binary socket packets are not supported")]
    BinaryUnsupported,
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect(Option<Value>),
    Disconnect,
    Event { name: String, args: Vec<Value> },
    Ack,
    ConnectError(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrivateMessagePayload {
    pub sender: String,
    pub recipient: String,
    pub msg: String,
}

/// Events the server pushes that the client understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    PrivateMessage(PrivateMessagePayload),
    OnlineUsers(Vec<String>),
    Unhandled(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendPrivateMessage {
    pub msg: String,
    pub recipient: String,
}

pub fn decode_frame(frame: &str) -> Result<EnginePacket, ProtocolError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or(ProtocolError::EmptyFrame)?;
    let rest = chars.as_str();

    match kind {
        '0' => Ok(EnginePacket::Open(serde_json::from_str(rest)?)),
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping(rest.to_owned())),
        '3' => Ok(EnginePacket::Pong(rest.to_owned())),
        '4' => decode_socket_packet(rest).map(EnginePacket::Message),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(ProtocolError::UnknownEnginePacket(other)),
    }
}

fn decode_socket_packet(packet: &str) -> Result<SocketPacket, ProtocolError> {
    let mut chars = packet.chars();
    let kind = chars.next().ok_or(ProtocolError::EmptyFrame)?;
    let payload = strip_ack_id(strip_namespace(chars.as_str()));

    match kind {
        '0' if payload.is_empty() => Ok(SocketPacket::Connect(None)),
        '0' => Ok(SocketPacket::Connect(Some(serde_json::from_str(payload)?))),
        '1' => Ok(SocketPacket::Disconnect),
        '2' => decode_event(payload),
        '3' => Ok(SocketPacket::Ack),
        '4' if payload.is_empty() => Ok(SocketPacket::ConnectError(Value::Null)),
        '4' => Ok(SocketPacket::ConnectError(serde_json::from_str(payload)?)),
        '5' | '6' => Err(ProtocolError::BinaryUnsupported),
        other => Err(ProtocolError::UnknownSocketPacket(other)),
    }
}

/// Drops a `/namespace,` prefix; this client only lives on `/`.
fn strip_namespace(payload: &str) -> &str {
    if !payload.starts_with('/') {
        return payload;
    }

    match payload.find(',') {
        Some(comma) => &payload[comma + 1..],
        None => "",
    }
}

fn strip_ack_id(payload: &str) -> &str {
    payload.trim_start_matches(|ch: char| ch.is_ascii_digit())
}

fn decode_event(payload: &str) -> Result<SocketPacket, ProtocolError> {
    let mut items: Vec<Value> = serde_json::from_str(payload)?;
    if items.is_empty() {
        return Err(ProtocolError::MalformedEvent("missing event name".to_owned()));
    }

    let name = match items.remove(0) {
        Value::String(name) => name,
        other => {
            return Err(ProtocolError::MalformedEvent(format!(
                "event name is not a string: {other}"
            )))
        }
    };

    Ok(SocketPacket::Event { name, args: items })
}

impl ServerEvent {
    pub fn from_event(name: &str, mut args: Vec<Value>) -> Result<Self, ProtocolError> {
        let first = if args.is_empty() {
            Value::Null
        } else {
            args.swap_remove(0)
        };

        match name {
            EVENT_PRIVATE_MESSAGE => Ok(Self::PrivateMessage(serde_json::from_value(first)?)),
            EVENT_ONLINE_USERS => Ok(Self::OnlineUsers(serde_json::from_value(first)?)),
            other => Ok(Self::Unhandled(other.to_owned())),
        }
    }
}

pub fn encode_namespace_connect() -> String {
    "40".to_owned()
}

pub fn encode_pong(probe: &str) -> String {
    format!("3{probe}")
}

pub fn encode_send_private_message(message: &SendPrivateMessage) -> Result<String, ProtocolError> {
    let body = serde_json::to_string(&(EVENT_SEND_PRIVATE_MESSAGE, message))?;
    Ok(format!("42{body}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_open_handshake() {
        let packet = decode_frame(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        )
        .expect("open packet should decode");

        let EnginePacket::Open(open) = packet else {
            panic!("expected open packet, got {packet:?}");
        };
        assert_eq!(open.sid, "abc");
        assert_eq!(open.ping_interval, 25_000);
        assert_eq!(open.ping_timeout, 20_000);
        assert_eq!(open.max_payload, Some(1_000_000));
    }

    #[test]
    fn decodes_heartbeats_and_control_packets() {
        assert_eq!(decode_frame("2").expect("ping"), EnginePacket::Ping(String::new()));
        assert_eq!(
            decode_frame("2probe").expect("ping"),
            EnginePacket::Ping("probe".to_owned())
        );
        assert_eq!(decode_frame("1").expect("close"), EnginePacket::Close);
        assert_eq!(decode_frame("6").expect("noop"), EnginePacket::Noop);
    }

    #[test]
    fn decodes_namespace_connect_with_and_without_payload() {
        assert_eq!(
            decode_frame("40").expect("connect"),
            EnginePacket::Message(SocketPacket::Connect(None))
        );
        assert_eq!(
            decode_frame(r#"40{"sid":"xyz"}"#).expect("connect"),
            EnginePacket::Message(SocketPacket::Connect(Some(json!({"sid": "xyz"}))))
        );
    }

    #[test]
    fn decodes_private_message_event() {
        let packet = decode_frame(
            r#"42["private_message",{"sender":"bob","recipient":"alice","msg":"hi"}]"#,
        )
        .expect("event should decode");

        let EnginePacket::Message(SocketPacket::Event { name, args }) = packet else {
            panic!("expected event, got {packet:?}");
        };
        let event = ServerEvent::from_event(&name, args).expect("typed event");

        assert_eq!(
            event,
            ServerEvent::PrivateMessage(PrivateMessagePayload {
                sender: "bob".to_owned(),
                recipient: "alice".to_owned(),
                msg: "hi".to_owned(),
            })
        );
    }

    #[test]
    fn decodes_online_users_event_with_namespace_and_ack_id() {
        let packet = decode_frame(r#"42/,7["update_online_users",["bob","carol"]]"#)
            .expect("event should decode");

        let EnginePacket::Message(SocketPacket::Event { name, args }) = packet else {
            panic!("expected event, got {packet:?}");
        };

        assert_eq!(
            ServerEvent::from_event(&name, args).expect("typed event"),
            ServerEvent::OnlineUsers(vec!["bob".to_owned(), "carol".to_owned()])
        );
    }

    #[test]
    fn unknown_events_are_reported_as_unhandled() {
        let event = ServerEvent::from_event("typing", vec![json!({"who": "bob"})])
            .expect("unknown events are not errors");

        assert_eq!(event, ServerEvent::Unhandled("typing".to_owned()));
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(matches!(decode_frame(""), Err(ProtocolError::EmptyFrame)));
        assert!(matches!(
            decode_frame("9"),
            Err(ProtocolError::UnknownEnginePacket('9'))
        ));
        assert!(matches!(
            decode_frame("42[]"),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            decode_frame("42[1,2]"),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            decode_frame(r#"451-["file",{"_placeholder":true,"num":0}]"#),
            Err(ProtocolError::BinaryUnsupported)
        ));
    }

    #[test]
    fn private_message_with_missing_fields_is_a_json_error() {
        let result = ServerEvent::from_event(EVENT_PRIVATE_MESSAGE, vec![json!({"sender": "bob"})]);

        assert!(matches!(result, Err(ProtocolError::Json(_))));
    }

    #[test]
    fn encodes_outbound_frames() {
        let frame = encode_send_private_message(&SendPrivateMessage {
            msg: "hi \"bob\"".to_owned(),
            recipient: "bob".to_owned(),
        })
        .expect("event should encode");

        assert_eq!(
            frame,
            r#"42["send_private_message",{"msg":"hi \"bob\"","recipient":"bob"}]"#
        );
        assert_eq!(encode_namespace_connect(), "40");
        assert_eq!(encode_pong("probe"), "3probe");
    }
}
