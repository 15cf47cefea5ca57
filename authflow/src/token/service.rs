//! Token issue and verification.

use super::claims::{Claims, Session};
use super::clock::{Clock, SystemClock};
use crate::config::AuthConfig;
use crate::errors::{ConfigurationError, ErrorRecord};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use std::sync::Arc;

/// The only signing algorithm issued or accepted.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Random secret length in bytes.
const GENERATED_SECRET_LENGTH: usize = 32;

/// Issues a token for `session` at `now` (milliseconds), valid for
/// `ttl_seconds` or forever when zero.
///
/// # Errors
///
/// Returns a `System` record if the claims cannot be encoded.
pub fn issue(
    session: &Session,
    secret: &[u8],
    ttl_seconds: u64,
    now: i64,
) -> Result<String, ErrorRecord> {
    let claims = Claims::new(session.clone(), now, ttl_seconds);
    encode(&Header::new(ALGORITHM), &claims, &EncodingKey::from_secret(secret))
        .map_err(|err| ErrorRecord::system(format!("Token encoding failed: {err}")))
}

/// Verifies `token` against `secret` at `now` (milliseconds).
///
/// Expiry is checked against the millisecond `expires` claim rather than
/// the registered `exp` claim.
///
/// # Errors
///
/// Returns an `Authentication` record if the token is empty, malformed,
/// signed with another secret or algorithm, or expired.
pub fn verify(token: &str, secret: &[u8], now: i64) -> Result<Claims, ErrorRecord> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ErrorRecord::authentication("missing token"));
    }

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation())
        .map_err(|err| ErrorRecord::authentication(err.to_string()))?
        .claims;

    if claims.is_expired(now) {
        return Err(ErrorRecord::authentication("token expired")
            .with_info("expires", serde_json::Value::from(claims.expires)));
    }

    Ok(claims)
}

fn validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation
}

/// Issues and verifies tokens with a configured secret, lifetime, and clock.
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<[u8]>,
    ttl_seconds: u64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a service using the wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSecret`] if `secret` is empty.
    pub fn new(secret: impl AsRef<[u8]>, ttl_seconds: u64) -> Result<Self, ConfigurationError> {
        Self::with_clock(secret, ttl_seconds, Arc::new(SystemClock))
    }

    /// Creates a service using the given clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSecret`] if `secret` is empty.
    pub fn with_clock(
        secret: impl AsRef<[u8]>,
        ttl_seconds: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(ConfigurationError::MissingSecret);
        }
        Ok(Self {
            secret: Arc::from(secret),
            ttl_seconds,
            clock,
        })
    }

    /// Creates a service from auth settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSecret`] if no secret is configured.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigurationError> {
        Self::new(config.jwt_secret.as_bytes(), config.jwt_expiration)
    }

    /// Generates a random hex-encoded secret.
    #[must_use]
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; GENERATED_SECRET_LENGTH];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Returns the configured lifetime in seconds.
    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issues a token for `session`.
    ///
    /// # Errors
    ///
    /// Returns a `System` record if the claims cannot be encoded.
    pub fn issue(&self, session: &Session) -> Result<String, ErrorRecord> {
        issue(session, &self.secret, self.ttl_seconds, self.clock.now_millis())
    }

    /// Verifies a token.
    ///
    /// # Errors
    ///
    /// Returns an `Authentication` record on any verification failure.
    pub fn verify(&self, token: &str) -> Result<Claims, ErrorRecord> {
        verify(token, &self.secret, self.clock.now_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::token::ManualClock;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use serde_json::json;

    fn session() -> Session {
        json!({"account_id": 1, "user_name": "a"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_session() {
        let token = issue(&session(), b"secret", 60, 1_000).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = verify(&token, b"secret", 2_000).unwrap();
        assert_eq!(claims.session, session());
        assert_eq!(claims.timestamp, 1_000);
        assert_eq!(claims.expires, 61_000);
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let token = issue(&session(), b"secret", 0, 0).unwrap();
        let claims = verify(&token, b"secret", i64::MAX).unwrap();
        assert_eq!(claims.expires, 0);
    }

    #[test]
    fn test_five_second_ttl() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let service = TokenService::with_clock("secret", 5, clock.clone()).unwrap();
        let token = service.issue(&session()).unwrap();

        clock.advance(4_000);
        assert_eq!(service.verify(&token).unwrap().session, session());

        clock.advance(2_000);
        let err = service.verify(&token).unwrap_err();
        assert!(err.is(ErrorKind::Authentication));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue(&session(), b"secret-a", 0, 0).unwrap();
        for other in [&b"secret-b"[..], b"", b"secret-a "] {
            let err = verify(&token, other, 0).unwrap_err();
            assert!(err.is(ErrorKind::Authentication));
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue(&session(), b"secret", 0, 0).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims =
            json!({"account_id": 2, "user_name": "admin", "timestamp": 0, "expires": 0});
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(verify(&forged, b"secret", 0)
            .unwrap_err()
            .is(ErrorKind::Authentication));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for token in ["", "   ", "abc", "a.b", "a.b.c.d", "!!.@@.##"] {
            let err = verify(token, b"secret", 0).unwrap_err();
            assert!(err.is(ErrorKind::Authentication), "{token}");
        }
    }

    #[test]
    fn test_unsupported_algorithm_rejected() {
        let token = issue(&session(), b"secret", 0, 0).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let forged = format!("{header}.{}.{}", parts[1], parts[2]);

        assert!(verify(&forged, b"secret", 0)
            .unwrap_err()
            .is(ErrorKind::Authentication));
    }

    #[test]
    fn test_other_hmac_algorithm_rejected() {
        let claims = Claims::new(session(), 0, 0);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(verify(&token, b"secret", 0)
            .unwrap_err()
            .is(ErrorKind::Authentication));
    }

    #[test]
    fn test_header_is_hs256_jwt() {
        let token = issue(&session(), b"secret", 0, 0).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        assert_eq!(
            TokenService::new("", 0).unwrap_err(),
            ConfigurationError::MissingSecret
        );
    }

    #[test]
    fn test_generate_secret() {
        let a = TokenService::generate_secret();
        let b = TokenService::generate_secret();
        assert_eq!(a.len(), GENERATED_SECRET_LENGTH * 2);
        assert_ne!(a, b);
    }
}
