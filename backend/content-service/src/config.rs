/// Configuration management for Content Service
///
/// Loaded from environment variables; every value except the production
/// guards has a default so the service boots in development unconfigured.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Object storage configuration
    pub storage: StorageConfig,
    /// Media upload/discard bounds
    pub media: MediaConfig,
    /// Real-time push settings
    pub realtime: RealtimeConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

/// S3-compatible object storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible storage (MinIO, R2, ...)
    pub endpoint: Option<String>,
    /// Base URL clients use to fetch stored objects
    pub public_base_url: String,
    pub key_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub upload_timeout_ms: u64,
    pub discard_timeout_ms: u64,
    pub max_attachments: usize,
}

impl MediaConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_timeout_ms)
    }

    pub fn discard_timeout(&self) -> Duration {
        Duration::from_millis(self.discard_timeout_ms)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_timeout_ms: millis(resilience::presets::object_storage_upload().duration),
            discard_timeout_ms: millis(resilience::presets::object_storage_delete().duration),
            max_attachments: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    pub push_timeout_ms: u64,
    /// Per-channel outbound buffer
    pub channel_buffer: usize,
    pub heartbeat_interval_secs: u64,
    pub client_timeout_secs: u64,
}

impl RealtimeConfig {
    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            push_timeout_ms: millis(resilience::presets::realtime_push().duration),
            channel_buffer: 64,
            heartbeat_interval_secs: 5,
            client_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let app = AppConfig {
            env: app_env,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_or_default("APP_PORT", 8081)?,
        };

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) if app.is_production() => {
                return Err("DATABASE_URL must be set in production".to_string())
            }
            Err(_) => "postgresql://localhost/nova".to_string(),
        };

        let bucket = match std::env::var("S3_BUCKET") {
            Ok(bucket) => bucket,
            Err(_) if app.is_production() => {
                return Err("S3_BUCKET must be set in production".to_string())
            }
            Err(_) => "nova-media-dev".to_string(),
        };

        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.{}.amazonaws.com", bucket, region));

        let media_defaults = MediaConfig::default();
        let realtime_defaults = RealtimeConfig::default();

        Ok(Config {
            app,
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10)?,
                acquire_timeout_ms: millis(resilience::presets::database().duration),
            },
            storage: StorageConfig {
                bucket,
                region,
                endpoint: std::env::var("S3_ENDPOINT").ok().filter(|v| !v.trim().is_empty()),
                public_base_url,
                key_prefix: std::env::var("S3_KEY_PREFIX").unwrap_or_else(|_| "media".to_string()),
            },
            media: MediaConfig {
                upload_timeout_ms: parse_env_or_default(
                    "MEDIA_UPLOAD_TIMEOUT_MS",
                    media_defaults.upload_timeout_ms,
                )?,
                discard_timeout_ms: parse_env_or_default(
                    "MEDIA_DISCARD_TIMEOUT_MS",
                    media_defaults.discard_timeout_ms,
                )?,
                max_attachments: parse_env_or_default(
                    "MEDIA_MAX_ATTACHMENTS",
                    media_defaults.max_attachments,
                )?,
            },
            realtime: RealtimeConfig {
                push_timeout_ms: parse_env_or_default(
                    "REALTIME_PUSH_TIMEOUT_MS",
                    realtime_defaults.push_timeout_ms,
                )?,
                channel_buffer: parse_env_or_default(
                    "REALTIME_CHANNEL_BUFFER",
                    realtime_defaults.channel_buffer,
                )?,
                heartbeat_interval_secs: parse_env_or_default(
                    "REALTIME_HEARTBEAT_INTERVAL_SECS",
                    realtime_defaults.heartbeat_interval_secs,
                )?,
                client_timeout_secs: parse_env_or_default(
                    "REALTIME_CLIENT_TIMEOUT_SECS",
                    realtime_defaults.client_timeout_secs,
                )?,
            },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
