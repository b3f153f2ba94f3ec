use chrono::DateTime;
use std::time::{SystemTime, UNIX_EPOCH};

/// Session token type - a secure random string
pub type SessionToken = String;

/// Get current timestamp in milliseconds since Unix epoch
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Format a timestamp (ms since epoch) as ISO 8601 UTC string
pub fn format_utc_time(timestamp_ms: u64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms as i64)
        .or_else(|| DateTime::from_timestamp(0, 0))
        .map(|datetime| datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default()
}

/// A live session. It points at an identity and holds nothing else about the account.
#[derive(Clone)]
pub struct Session {
    pub token: SessionToken,
    pub identifier: String,
    pub created_at: u64,          // UTC timestamp in milliseconds
    pub created_at_utc: String,   // Human-readable UTC time (ISO 8601)
    pub client_ip: Option<String>,
}

impl Session {
    pub fn new(token: SessionToken, identifier: String, client_ip: Option<String>) -> Self {
        let now = current_timestamp_ms();

        Self {
            token,
            identifier,
            created_at: now,
            created_at_utc: format_utc_time(now),
            client_ip,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identifier", &self.identifier)
            .field("created_at_utc", &self.created_at_utc)
            .field("client_ip", &self.client_ip)
            .finish_non_exhaustive()
    }
}

/// Generate a cryptographically secure random session token
pub fn generate_session_token() -> SessionToken {
    use rand::Rng;

    // Generate 32 random bytes and encode as hex (64 characters)
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
