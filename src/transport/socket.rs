use std::{collections::VecDeque, sync::mpsc::Sender};

use futures_util::{SinkExt, StreamExt};
use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        http::{header::COOKIE, HeaderValue},
        Message as WsMessage,
    },
};

use crate::{
    domain::events::{AppEvent, ConnectivityStatus, InboundMessage},
    usecases::send_message::{EmitError, MessageEmitter},
};

use super::{
    error::TransportError,
    protocol::{
        decode_frame, encode_namespace_connect, encode_pong, encode_send_private_message,
        EnginePacket, ProtocolError, SendPrivateMessage, ServerEvent, SocketPacket,
    },
};

const SOCKET_STARTED: &str = "SOCKET_STARTED";
const SOCKET_CONNECT_FAILED: &str = "SOCKET_CONNECT_FAILED";
const SOCKET_CONNECT_REJECTED: &str = "SOCKET_CONNECT_REJECTED";
const SOCKET_FRAME_DECODE_FAILED: &str = "SOCKET_FRAME_DECODE_FAILED";
const SOCKET_READ_FAILED: &str = "SOCKET_READ_FAILED";
const SOCKET_WRITE_FAILED: &str = "SOCKET_WRITE_FAILED";
const SOCKET_EVENT_FORWARD_FAILED: &str = "SOCKET_EVENT_FORWARD_FAILED";
const SOCKET_STOPPED: &str = "SOCKET_STOPPED";

/// Where and how to open the websocket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketTarget {
    pub url: String,
    pub cookie: Option<String>,
}

/// Emitting half of the connection, handed to the shell.
#[derive(Debug, Clone)]
pub struct SocketHandle {
    outbound_tx: mpsc::UnboundedSender<SendPrivateMessage>,
}

impl MessageEmitter for SocketHandle {
    fn emit_private_message(&self, recipient: &str, body: &str) -> Result<(), EmitError> {
        self.outbound_tx
            .send(SendPrivateMessage {
                msg: body.to_owned(),
                recipient: recipient.to_owned(),
            })
            .map_err(|_| EmitError::Disconnected)
    }
}

/// Owns the background socket task; dropping it closes the connection.
#[derive(Debug)]
pub struct SocketConnection {
    handle: SocketHandle,
    stop_tx: Option<watch::Sender<bool>>,
}

impl SocketConnection {
    pub fn start(runtime: &Handle, target: SocketTarget, event_tx: Sender<AppEvent>) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        runtime.spawn(run_connection(target, event_tx, outbound_rx, stop_rx));
        tracing::info!(code = SOCKET_STARTED, "socket task started");

        Self {
            handle: SocketHandle { outbound_tx },
            stop_tx: Some(stop_tx),
        }
    }

    pub fn handle(&self) -> SocketHandle {
        self.handle.clone()
    }
}

impl Drop for SocketConnection {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
            tracing::debug!("socket shutdown signal sent");
        }
    }
}

/// What the connection loop must do after one inbound frame.
#[derive(Debug, Default, PartialEq)]
pub struct FrameReaction {
    pub replies: Vec<String>,
    pub events: Vec<AppEvent>,
    pub closed: bool,
}

/// Socket.IO session bookkeeping, independent of the websocket itself.
///
/// Emits issued before the namespace is joined are queued and flushed on join.
#[derive(Debug, Default)]
pub struct SocketSession {
    joined: bool,
    queued: VecDeque<String>,
}

impl SocketSession {
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn on_frame(&mut self, frame: &str) -> Result<FrameReaction, ProtocolError> {
        let mut reaction = FrameReaction::default();

        match decode_frame(frame)? {
            EnginePacket::Open(open) => {
                tracing::debug!(
                    sid = %open.sid,
                    ping_interval_ms = open.ping_interval,
                    ping_timeout_ms = open.ping_timeout,
                    "engine handshake received"
                );
                reaction.replies.push(encode_namespace_connect());
            }
            EnginePacket::Ping(probe) => reaction.replies.push(encode_pong(&probe)),
            EnginePacket::Close => reaction.closed = true,
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
            EnginePacket::Message(packet) => self.on_packet(packet, &mut reaction)?,
        }

        Ok(reaction)
    }

    /// Encodes an emit, or queues it until the namespace is joined.
    pub fn outbound(&mut self, message: &SendPrivateMessage) -> Result<Option<String>, ProtocolError> {
        let frame = encode_send_private_message(message)?;
        if self.joined {
            return Ok(Some(frame));
        }

        self.queued.push_back(frame);
        Ok(None)
    }

    fn on_packet(
        &mut self,
        packet: SocketPacket,
        reaction: &mut FrameReaction,
    ) -> Result<(), ProtocolError> {
        match packet {
            SocketPacket::Connect(_) => {
                self.joined = true;
                reaction
                    .events
                    .push(AppEvent::ConnectivityChanged(ConnectivityStatus::Connected));
                reaction.replies.extend(self.queued.drain(..));
            }
            SocketPacket::Disconnect => reaction.closed = true,
            SocketPacket::ConnectError(details) => {
                tracing::warn!(
                    code = SOCKET_CONNECT_REJECTED,
                    details = %details,
                    "server rejected namespace connect"
                );
                reaction.closed = true;
            }
            SocketPacket::Ack => {}
            SocketPacket::Event { name, args } => match ServerEvent::from_event(&name, args)? {
                ServerEvent::PrivateMessage(payload) => {
                    reaction
                        .events
                        .push(AppEvent::MessageReceived(InboundMessage::new(
                            payload.sender,
                            payload.recipient,
                            payload.msg,
                        )));
                }
                ServerEvent::OnlineUsers(online) => {
                    reaction.events.push(AppEvent::PresenceChanged(online));
                }
                ServerEvent::Unhandled(name) => {
                    tracing::debug!(event = %name, "ignoring unhandled server event");
                }
            },
        }

        Ok(())
    }
}

async fn run_connection(
    target: SocketTarget,
    event_tx: Sender<AppEvent>,
    mut outbound_rx: mpsc::UnboundedReceiver<SendPrivateMessage>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let _ = event_tx.send(AppEvent::ConnectivityChanged(ConnectivityStatus::Connecting));

    let stream = match open_stream(&target).await {
        Ok(stream) => stream,
        Err(error) => {
            tracing::warn!(code = SOCKET_CONNECT_FAILED, error = %error, "socket connect failed");
            let _ = event_tx.send(AppEvent::ConnectivityChanged(
                ConnectivityStatus::Disconnected,
            ));
            return;
        }
    };

    let (mut sink, mut source) = stream.split();
    let mut session = SocketSession::default();

    loop {
        let mut replies = Vec::new();

        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break;
                }
            }
            frame = source.next() => {
                let text = match frame {
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(error)) => {
                        tracing::warn!(code = SOCKET_READ_FAILED, error = %error, "socket read failed");
                        break;
                    }
                };

                match session.on_frame(text.as_str()) {
                    Ok(reaction) => {
                        if !forward_events(&event_tx, reaction.events) {
                            break;
                        }
                        if reaction.closed {
                            break;
                        }
                        replies = reaction.replies;
                    }
                    Err(error) => {
                        tracing::warn!(
                            code = SOCKET_FRAME_DECODE_FAILED,
                            error = %error,
                            "skipping undecodable frame"
                        );
                    }
                }
            }
            outbound = outbound_rx.recv() => {
                let Some(message) = outbound else {
                    break;
                };
                match session.outbound(&message) {
                    Ok(Some(frame)) => replies.push(frame),
                    Ok(None) => tracing::debug!("emit queued until namespace join"),
                    Err(error) => tracing::warn!(
                        code = SOCKET_FRAME_DECODE_FAILED,
                        error = %error,
                        "outbound message could not be encoded"
                    ),
                }
            }
        }

        let mut write_failed = false;
        for reply in replies {
            if let Err(error) = sink.send(WsMessage::Text(reply.into())).await {
                tracing::warn!(code = SOCKET_WRITE_FAILED, error = %error, "socket write failed");
                write_failed = true;
                break;
            }
        }
        if write_failed {
            break;
        }
    }

    tracing::info!(code = SOCKET_STOPPED, "socket task stopped");
    let _ = event_tx.send(AppEvent::ConnectivityChanged(
        ConnectivityStatus::Disconnected,
    ));
}

async fn open_stream(
    target: &SocketTarget,
) -> Result<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    TransportError,
> {
    let mut request = target
        .url
        .as_str()
        .into_client_request()
        .map_err(|error| TransportError::WsConnect(Box::new(error)))?;

    if let Some(cookie) = &target.cookie {
        request
            .headers_mut()
            .insert(COOKIE, HeaderValue::from_str(cookie)?);
    }

    let (stream, _) = connect_async(request)
        .await
        .map_err(|error| TransportError::WsConnect(Box::new(error)))?;
    Ok(stream)
}

/// Returns false once the UI side of the channel is gone.
fn forward_events(event_tx: &Sender<AppEvent>, events: Vec<AppEvent>) -> bool {
    for event in events {
        if let Err(error) = event_tx.send(event) {
            tracing::warn!(
                code = SOCKET_EVENT_FORWARD_FAILED,
                error = %error,
                "UI event channel closed"
            );
            return false;
        }
    }

    true
}
