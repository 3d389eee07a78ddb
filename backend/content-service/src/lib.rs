/// Content Service Library
///
/// Posts, threaded comments and their media, plus the notifications those
/// mutations produce for the Nova social platform.
///
/// # Modules
///
/// - `handlers`: HTTP and WebSocket endpoints
/// - `models`: Posts, comments, media references, notifications
/// - `services`: Block gate, media orchestration, content mutations, fan-out
/// - `db`: Repository traits and their Postgres implementations
/// - `storage`: Object storage capability and the S3 adapter
/// - `websocket`: Presence registry and live session actor
/// - `middleware`: Gateway-authenticated user extraction
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus counters
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod websocket;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::{AppState, Collaborators};
