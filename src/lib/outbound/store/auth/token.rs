use chrono::{DateTime, Duration, Utc};

/// Treat a token as expired this many seconds early so an in-flight request
/// never carries a token that lapses mid-call.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Clone)]
pub struct AuthToken {
    access_token: String,
    token_type: String,
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(access_token: String, token_type: String, expires_in_secs: i64) -> Self {
        Self {
            access_token,
            token_type,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }

    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
