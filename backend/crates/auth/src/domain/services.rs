//! Telegram Assertion Validation
//!
//! Pure domain logic for checking a WebApp `initData` blob against the
//! bot token, per Telegram's signing scheme:
//!
//! 1. percent-decode the query-string pairs and pull out `hash`
//! 2. sort the remaining pairs by key (byte order) and join as
//!    `key=value` lines separated by `\n`
//! 3. secret = HMAC-SHA256(key = "WebAppData", message = bot token)
//! 4. expected = HMAC-SHA256(key = secret, message = joined lines)
//! 5. compare against the hex-decoded `hash` in constant time
//!
//! `now` is always passed in explicitly so staleness is testable.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::entity::telegram_user::{TelegramAuthData, TelegramUser};
use crate::error::{AuthError, AuthResult};

/// Fixed key Telegram uses to derive the per-bot secret
const SECRET_SEED: &[u8] = b"WebAppData";

/// Validate an `initData` assertion and extract the signed identity
pub fn validate_init_data(
    bot_token: Option<&str>,
    init_data: &str,
    now: DateTime<Utc>,
    max_age: Duration,
) -> AuthResult<TelegramAuthData> {
    let bot_token = match bot_token {
        Some(token) if !token.trim().is_empty() => token,
        _ => return Err(AuthError::BotTokenMissing),
    };
    if init_data.trim().is_empty() {
        return Err(AuthError::InitDataRequired);
    }

    let mut pairs = parse_init_data(init_data);

    let hash_pos = pairs
        .iter()
        .position(|(key, _)| key == "hash")
        .ok_or(AuthError::MissingHash)?;
    let (_, received_hash) = pairs.remove(hash_pos);
    if received_hash.is_empty() {
        return Err(AuthError::MissingHash);
    }

    let check_string = build_check_string(&pairs);
    let secret = derive_secret_key(bot_token);
    let expected = platform::crypto::hmac_sha256(&secret, check_string.as_bytes());

    if !signature_matches(&received_hash, &expected) {
        return Err(AuthError::InvalidSignature);
    }

    let auth_date_raw = field(&pairs, "auth_date").ok_or(AuthError::AuthDateMissing)?;
    let auth_date_secs: i64 = auth_date_raw
        .parse()
        .map_err(|_| AuthError::AuthDateInvalid)?;
    let auth_date = Utc
        .timestamp_opt(auth_date_secs, 0)
        .single()
        .ok_or(AuthError::AuthDateInvalid)?;
    if now.signed_duration_since(auth_date) > max_age {
        return Err(AuthError::AuthDateStale);
    }

    let user_json = field(&pairs, "user").ok_or(AuthError::UserPayloadMissing)?;
    if user_json.trim().is_empty() {
        return Err(AuthError::UserPayloadMissing);
    }
    let user: TelegramUser =
        serde_json::from_str(user_json).map_err(|_| AuthError::UserPayloadInvalid)?;
    if user.id == 0 {
        return Err(AuthError::UserIdMissing);
    }

    Ok(TelegramAuthData { user, auth_date })
}

/// Decode the query-string pairs, preserving order
pub(crate) fn parse_init_data(init_data: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(init_data.as_bytes())
        .into_owned()
        .collect()
}

/// Build the data-check-string: pairs sorted by key, joined as lines
pub(crate) fn build_check_string(pairs: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = pairs.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Derive the per-bot signing secret
pub(crate) fn derive_secret_key(bot_token: &str) -> [u8; 32] {
    platform::crypto::hmac_sha256(SECRET_SEED, bot_token.as_bytes())
}

/// Compare a received hex signature against the expected MAC
///
/// Malformed hex counts as a mismatch, never an error.
pub(crate) fn signature_matches(received_hex: &str, expected: &[u8; 32]) -> bool {
    match hex::decode(received_hex) {
        Ok(received) => platform::crypto::constant_time_eq(&received, expected),
        Err(_) => false,
    }
}

fn field<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_percent_escapes() {
        let pairs = parse_init_data("user=%7B%22id%22%3A1%7D&auth_date=100");
        assert_eq!(pairs[0].0, "user");
        assert_eq!(pairs[0].1, r#"{"id":1}"#);
        assert_eq!(pairs[1], ("auth_date".to_string(), "100".to_string()));
    }

    #[test]
    fn test_check_string_sorted_by_key() {
        let pairs = vec![
            ("query_id".to_string(), "q1".to_string()),
            ("auth_date".to_string(), "100".to_string()),
            ("user".to_string(), "{}".to_string()),
        ];
        assert_eq!(
            build_check_string(&pairs),
            "auth_date=100\nquery_id=q1\nuser={}"
        );
    }

    #[test]
    fn test_signature_matches_rejects_bad_hex() {
        let expected = [0u8; 32];
        assert!(!signature_matches("zz", &expected));
        assert!(!signature_matches("abc", &expected)); // odd length
        assert!(!signature_matches("", &expected));
    }

    #[test]
    fn test_signature_matches_roundtrip() {
        let expected = platform::crypto::hmac_sha256(b"secret", b"payload");
        assert!(signature_matches(&hex::encode(expected), &expected));
        assert!(!signature_matches(&hex::encode([1u8; 32]), &expected));
    }
}
