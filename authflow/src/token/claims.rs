//! Session and claim types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `expires` value of a token that never expires.
pub const NEVER_EXPIRES: i64 = 0;

/// Session fields embedded in a token.
///
/// The core treats sessions as open records; the standard login pipeline
/// fills `account_id` and `user_name`.
pub type Session = Map<String, Value>;

/// The decoded contents of a verified token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The session fields the token was issued for.
    #[serde(flatten)]
    pub session: Session,
    /// Issue instant, milliseconds since the epoch.
    pub timestamp: i64,
    /// Expiry instant, milliseconds since the epoch, or [`NEVER_EXPIRES`].
    pub expires: i64,
}

impl Claims {
    /// Builds claims for `session` issued at `now` with a lifetime of
    /// `ttl_seconds` (zero means never expires).
    #[must_use]
    pub fn new(mut session: Session, now: i64, ttl_seconds: u64) -> Self {
        session.remove("timestamp");
        session.remove("expires");
        let expires = if ttl_seconds == 0 {
            NEVER_EXPIRES
        } else {
            let ttl_millis = i64::try_from(ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
            now.saturating_add(ttl_millis)
        };
        Self {
            session,
            timestamp: now,
            expires,
        }
    }

    /// Returns true if the claims have expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires != NEVER_EXPIRES && now > self.expires
    }

    /// Returns a session field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.session.get(key)
    }

    /// Flattens the claims into one map: session fields plus `timestamp`
    /// and `expires`.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = self.session;
        map.insert("timestamp".to_string(), Value::from(self.timestamp));
        map.insert("expires".to_string(), Value::from(self.expires));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> Session {
        let mut session = Session::new();
        session.insert("account_id".to_string(), json!(1));
        session.insert("user_name".to_string(), json!("a"));
        session
    }

    #[test]
    fn test_never_expires() {
        let claims = Claims::new(session(), 1_000, 0);
        assert_eq!(claims.expires, NEVER_EXPIRES);
        assert!(!claims.is_expired(i64::MAX));
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims::new(session(), 1_000, 5);
        assert_eq!(claims.expires, 6_000);
        assert!(!claims.is_expired(6_000));
        assert!(claims.is_expired(6_001));
    }

    #[test]
    fn test_flattened_serialization() {
        let claims = Claims::new(session(), 10, 0);
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(
            value,
            json!({"account_id": 1, "user_name": "a", "timestamp": 10, "expires": 0})
        );

        let back: Claims = serde_json::from_value(value).unwrap();
        assert_eq!(back, claims);
    }

    #[test]
    fn test_into_map() {
        let map = Claims::new(session(), 10, 1).into_map();
        assert_eq!(map["timestamp"], 10);
        assert_eq!(map["expires"], 1_010);
        assert_eq!(map["user_name"], "a");
    }
}
