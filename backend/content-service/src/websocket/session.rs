/// WebSocket session actor for a connected notification client
use super::manager::{ChannelHandle, PresenceRegistry};
use super::messages::WebSocketMessage;
use crate::config::RealtimeConfig;
use crate::models::UserId;
use actix::{Actor, ActorContext, AsyncContext, StreamHandler};
use actix_web_actors::ws;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub struct NotificationSession {
    user_id: UserId,
    channel: ChannelHandle,
    outbound: Option<mpsc::Receiver<String>>,
    presence: PresenceRegistry,
    heartbeat_interval: Duration,
    client_timeout: Duration,
    hb: Instant,
}

impl NotificationSession {
    pub fn new(user_id: UserId, presence: PresenceRegistry, config: &RealtimeConfig) -> Self {
        let (channel, outbound) = ChannelHandle::open(config.channel_buffer);
        Self {
            user_id,
            channel,
            outbound: Some(outbound),
            presence,
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs),
            client_timeout: Duration::from_secs(config.client_timeout_secs),
            hb: Instant::now(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let client_timeout = self.client_timeout;
        ctx.run_interval(self.heartbeat_interval, move |act, ctx| {
            if Instant::now().duration_since(act.hb) > client_timeout {
                tracing::warn!(user_id = %act.user_id, "WebSocket heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send_frame(&self, frame: WebSocketMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match frame.to_json() {
            Ok(json) => ctx.text(json),
            Err(e) => tracing::error!("Failed to encode WebSocket frame: {}", e),
        }
    }
}

impl Actor for NotificationSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.hb(ctx);

        if let Some(outbound) = self.outbound.take() {
            ctx.add_stream(ReceiverStream::new(outbound));
        }

        self.presence.register(self.user_id, self.channel.clone());
        tracing::info!(
            user_id = %self.user_id,
            channel_id = ?self.channel.id(),
            "Notification session started"
        );

        self.send_frame(WebSocketMessage::connected(self.channel.id()), ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.presence.unregister(self.user_id, &self.channel);
        tracing::info!(
            user_id = %self.user_id,
            channel_id = ?self.channel.id(),
            "Notification session stopped"
        );
    }
}

/// Frames pushed by the notification dispatcher
impl StreamHandler<String> for NotificationSession {
    fn handle(&mut self, frame: String, ctx: &mut Self::Context) {
        ctx.text(frame);
    }

    // The session owns a sender, so the stream only ends on shutdown.
    fn finished(&mut self, _ctx: &mut Self::Context) {}
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for NotificationSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.hb = Instant::now();
                match WebSocketMessage::from_json(&text) {
                    Ok(WebSocketMessage::Ping { timestamp }) => {
                        self.send_frame(WebSocketMessage::pong(timestamp), ctx);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(user_id = %self.user_id, "Failed to parse WS message: {}", e);
                        self.send_frame(
                            WebSocketMessage::error("INVALID_MESSAGE", "unrecognized frame"),
                            ctx,
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                tracing::warn!("Binary WebSocket messages not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::info!("WebSocket close message received: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                tracing::warn!(user_id = %self.user_id, "WebSocket protocol error: {}", e);
                ctx.stop();
            }
            _ => {}
        }
    }
}
