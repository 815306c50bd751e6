pub mod errors;
pub mod id;

pub use errors::{ConfigError, EireneError};
pub use id::{new_correlation_id, SessionId, UserId};

pub type Result<T> = std::result::Result<T, EireneError>;

/// Address of the chat server when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Environment variable that overrides the chat server address.
pub const SERVER_URL_ENV: &str = "EIRENE_SERVER_URL";
