/// Real-time notification channels
///
/// - manager: presence registry of live channels per user
/// - messages: JSON frames exchanged with clients
/// - session: actix WebSocket actor bridging a client to its channel
pub mod manager;
pub mod messages;
pub mod session;

pub use manager::{ChannelHandle, ChannelId, PresenceRegistry, PushError};
pub use messages::WebSocketMessage;
pub use session::NotificationSession;
