//! Unit tests for Auth crate

const BOT_TOKEN: &str = "7000000001:AAHsampletokensampletokensample";

/// Build an initData blob signed the way Telegram signs it
fn signed_init_data(bot_token: &str, fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<(&str, &str)> = fields.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let check_string = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let secret = platform::crypto::hmac_sha256(b"WebAppData", bot_token.as_bytes());
    let mac = platform::crypto::hmac_sha256(&secret, check_string.as_bytes());

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key, value);
    }
    serializer.append_pair("hash", &hex::encode(mac));
    serializer.finish()
}

mod validator_tests {
    use super::{BOT_TOKEN, signed_init_data};
    use crate::domain::entity::telegram_user::TelegramUser;
    use crate::domain::services::validate_init_data;
    use crate::error::AuthError;
    use chrono::{Duration, Utc};

    fn valid_init_data(auth_date: i64) -> String {
        let auth_date = auth_date.to_string();
        signed_init_data(
            BOT_TOKEN,
            &[
                ("auth_date", auth_date.as_str()),
                ("query_id", "AAE5mQAAAAAAAJmZExample"),
                (
                    "user",
                    r#"{"id":555,"first_name":"Ada","username":"ada","language_code":"en"}"#,
                ),
            ],
        )
    }

    #[test]
    fn test_valid_assertion_accepted() {
        let now = Utc::now();
        let init_data = valid_init_data(now.timestamp() - 60);

        let data = validate_init_data(Some(BOT_TOKEN), &init_data, now, Duration::hours(1))
            .expect("assertion should validate");

        assert_eq!(data.user.id, 555);
        assert_eq!(data.user.username.as_deref(), Some("ada"));
        assert_eq!(data.auth_date.timestamp(), now.timestamp() - 60);
    }

    #[test]
    fn test_missing_bot_token_rejected() {
        let now = Utc::now();
        let init_data = valid_init_data(now.timestamp());

        let err = validate_init_data(None, &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::BotTokenMissing));

        let err = validate_init_data(Some("  "), &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::BotTokenMissing));
    }

    #[test]
    fn test_empty_init_data_rejected() {
        let now = Utc::now();
        let err = validate_init_data(Some(BOT_TOKEN), "", now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::InitDataRequired));

        let err = validate_init_data(Some(BOT_TOKEN), "   ", now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::InitDataRequired));
    }

    #[test]
    fn test_missing_hash_rejected() {
        let now = Utc::now();
        let err = validate_init_data(
            Some(BOT_TOKEN),
            "auth_date=100&user=%7B%22id%22%3A1%7D",
            now,
            Duration::hours(1),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::MissingHash));
    }

    #[test]
    fn test_flipped_hash_bit_rejected() {
        let now = Utc::now();
        let mut init_data = valid_init_data(now.timestamp());

        // The hash is the final query parameter; flip its last hex digit
        let last = init_data.pop().unwrap();
        init_data.push(if last == '0' { '1' } else { '0' });

        let err =
            validate_init_data(Some(BOT_TOKEN), &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn test_tampered_field_rejected() {
        let now = Utc::now();
        let auth_date = now.timestamp();
        let init_data = valid_init_data(auth_date);
        let tampered = init_data.replace(&auth_date.to_string(), &(auth_date + 1).to_string());

        let err =
            validate_init_data(Some(BOT_TOKEN), &tampered, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn test_wrong_bot_token_rejected() {
        let now = Utc::now();
        let init_data = valid_init_data(now.timestamp());

        let err = validate_init_data(
            Some("7000000002:AAHanothertokenanothertokenanoth"),
            &init_data,
            now,
            Duration::hours(1),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn test_non_hex_hash_is_mismatch_not_panic() {
        let now = Utc::now();
        let err = validate_init_data(
            Some(BOT_TOKEN),
            "auth_date=100&hash=nothex!",
            now,
            Duration::hours(1),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn test_stale_auth_date_rejected() {
        let now = Utc::now();
        let init_data = valid_init_data(now.timestamp() - 2 * 3600);

        let err =
            validate_init_data(Some(BOT_TOKEN), &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::AuthDateStale));
    }

    #[test]
    fn test_missing_auth_date_rejected() {
        let now = Utc::now();
        let init_data = signed_init_data(BOT_TOKEN, &[("user", r#"{"id":1}"#)]);

        let err =
            validate_init_data(Some(BOT_TOKEN), &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::AuthDateMissing));
    }

    #[test]
    fn test_non_numeric_auth_date_rejected() {
        let now = Utc::now();
        let init_data =
            signed_init_data(BOT_TOKEN, &[("auth_date", "soon"), ("user", r#"{"id":1}"#)]);

        let err =
            validate_init_data(Some(BOT_TOKEN), &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::AuthDateInvalid));
    }

    #[test]
    fn test_missing_user_rejected() {
        let now = Utc::now();
        let auth_date = now.timestamp().to_string();
        let init_data = signed_init_data(BOT_TOKEN, &[("auth_date", auth_date.as_str())]);

        let err =
            validate_init_data(Some(BOT_TOKEN), &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::UserPayloadMissing));
    }

    #[test]
    fn test_malformed_user_rejected() {
        let now = Utc::now();
        let auth_date = now.timestamp().to_string();
        let init_data = signed_init_data(
            BOT_TOKEN,
            &[("auth_date", auth_date.as_str()), ("user", "{not json")],
        );

        let err =
            validate_init_data(Some(BOT_TOKEN), &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::UserPayloadInvalid));
    }

    #[test]
    fn test_zero_user_id_rejected() {
        let now = Utc::now();
        let auth_date = now.timestamp().to_string();
        let init_data = signed_init_data(
            BOT_TOKEN,
            &[
                ("auth_date", auth_date.as_str()),
                ("user", r#"{"first_name":"Ghost"}"#),
            ],
        );

        let err =
            validate_init_data(Some(BOT_TOKEN), &init_data, now, Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AuthError::UserIdMissing));
    }

    #[test]
    fn test_telegram_user_parses_partial_payload() {
        let user: TelegramUser = serde_json::from_str(r#"{"id":42}"#).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.username, None);
        assert_eq!(user.is_premium, None);
    }
}

mod token_tests {
    use crate::application::config::AuthConfig;
    use crate::application::issue_token::{Claims, TokenIssuer};
    use crate::domain::entity::telegram_user::TelegramUser;
    use crate::domain::entity::user::User;
    use crate::error::AuthError;
    use chrono::Utc;

    fn test_config() -> AuthConfig {
        AuthConfig {
            signing_key: "unit-test-signing-key-0123456789".to_string(),
            ..AuthConfig::default()
        }
    }

    fn test_user(telegram_id: i64) -> User {
        let mut user = User::from_telegram(&TelegramUser {
            id: telegram_id,
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            username: Some("ada".to_string()),
            photo_url: Some("https://t.me/i/userpic/ada.jpg".to_string()),
            ..Default::default()
        });
        user.telegram_id = telegram_id;
        user
    }

    #[test]
    fn test_issue_and_decode_roundtrip() {
        let config = test_config();
        let issuer = TokenIssuer::new();

        let issued = issuer.issue(&config, &test_user(555)).unwrap();
        assert!(issued.expires_at > Utc::now());
        assert_eq!(issued.csrf_token.len(), 32);

        let claims = issuer.decode(&config, &issued.token).unwrap();
        assert_eq!(claims.sub, "555");
        assert_eq!(claims.telegram_id().unwrap(), 555);
        assert_eq!(claims.unique_name, "ada");
        assert_eq!(claims.first_name, "Ada");
        assert_eq!(claims.csrf, issued.csrf_token);
        assert_eq!(claims.role, None);
        assert_eq!(claims.iss, "ucode");
        assert_eq!(claims.aud, "ucode-web");
    }

    #[test]
    fn test_issue_reuses_cached_token() {
        let config = test_config();
        let issuer = TokenIssuer::new();
        let user = test_user(555);

        let first = issuer.issue(&config, &user).unwrap();
        let second = issuer.issue(&config, &user).unwrap();

        assert_eq!(first.token, second.token);
        assert_eq!(first.csrf_token, second.csrf_token);
    }

    #[test]
    fn test_cache_misses_across_users() {
        let config = test_config();
        let issuer = TokenIssuer::new();

        let a = issuer.issue(&config, &test_user(1)).unwrap();
        let b = issuer.issue(&config, &test_user(2)).unwrap();

        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_signing_key_rotation_invalidates_cache() {
        let issuer = TokenIssuer::new();
        let user = test_user(555);

        let config_a = test_config();
        let config_b = AuthConfig {
            signing_key: "rotated-signing-key-9876543210ab".to_string(),
            ..AuthConfig::default()
        };

        let first = issuer.issue(&config_a, &user).unwrap();
        let second = issuer.issue(&config_b, &user).unwrap();

        assert_ne!(first.token, second.token);
        assert!(issuer.decode(&config_b, &second.token).is_ok());
        assert!(matches!(
            issuer.decode(&config_a, &second.token).unwrap_err(),
            AuthError::TokenInvalid
        ));
    }

    #[test]
    fn test_admin_and_root_role_claims() {
        let config = test_config();
        let issuer = TokenIssuer::new();

        let mut admin = test_user(10);
        admin.is_admin = true;
        let issued = issuer.issue(&config, &admin).unwrap();
        let claims = issuer.decode(&config, &issued.token).unwrap();
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert!(claims.user_role().is_admin_or_higher());

        let mut root = test_user(11);
        root.is_root = true;
        let issued = issuer.issue(&config, &root).unwrap();
        let claims = issuer.decode(&config, &issued.token).unwrap();
        assert_eq!(claims.role.as_deref(), Some("root"));
        assert!(claims.user_role().is_root());
        assert!(claims.user_role().is_admin_or_higher());
    }

    #[test]
    fn test_issue_without_signing_key_fails() {
        let config = AuthConfig::default();
        let issuer = TokenIssuer::new();

        let err = issuer.issue(&config, &test_user(555)).unwrap_err();
        assert!(matches!(err, AuthError::SigningKeyMissing));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config();
        let issuer = TokenIssuer::new();

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            sub: "555".to_string(),
            unique_name: "ada".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            username: String::new(),
            photo_url: None,
            csrf: "deadbeefdeadbeefdeadbeefdeadbeef".to_string(),
            role: None,
            iat: now - 7200,
            nbf: now - 7200,
            exp: now - 3600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(config.signing_key.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            issuer.decode(&config, &token).unwrap_err(),
            AuthError::TokenInvalid
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let config = test_config();
        let issuer = TokenIssuer::new();

        let other = AuthConfig {
            issuer: "someone-else".to_string(),
            ..test_config()
        };
        let issued = issuer.issue(&other, &test_user(99)).unwrap();

        assert!(matches!(
            issuer.decode(&config, &issued.token).unwrap_err(),
            AuthError::TokenInvalid
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = test_config();
        let issuer = TokenIssuer::new();

        assert!(matches!(
            issuer.decode(&config, "not.a.token").unwrap_err(),
            AuthError::TokenInvalid
        ));
    }

    #[test]
    fn test_photo_url_claim_skipped_when_empty() {
        let config = test_config();
        let issuer = TokenIssuer::new();

        let mut user = test_user(555);
        user.photo_url = Some(String::new());
        let issued = issuer.issue(&config, &user).unwrap();
        let claims = issuer.decode(&config, &issued.token).unwrap();
        assert_eq!(claims.photo_url, None);
    }
}

mod config_tests {
    use crate::application::config::AuthConfig;
    use platform::cookie::SameSite;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.issuer, "ucode");
        assert_eq!(config.audience, "ucode-web");
        assert_eq!(config.token_lifetime_minutes, 60);
        assert_eq!(config.auth_max_age_secs, 3600);
        assert!(config.bot_token.is_none());
        assert!(!config.csrf_cookie.http_only);
        assert_eq!(config.csrf_cookie.same_site, SameSite::None);
    }

    #[test]
    fn test_token_lifetime_falls_back_on_invalid() {
        let config = AuthConfig {
            token_lifetime_minutes: 0,
            ..AuthConfig::default()
        };
        assert_eq!(config.token_lifetime().num_minutes(), 60);

        let config = AuthConfig {
            token_lifetime_minutes: -5,
            ..AuthConfig::default()
        };
        assert_eq!(config.token_lifetime().num_minutes(), 60);

        let config = AuthConfig {
            token_lifetime_minutes: 15,
            ..AuthConfig::default()
        };
        assert_eq!(config.token_lifetime().num_minutes(), 15);
    }

    #[test]
    fn test_with_random_signing_key() {
        let a = AuthConfig::with_random_signing_key();
        let b = AuthConfig::with_random_signing_key();
        assert_eq!(a.signing_key.len(), 64);
        assert_ne!(a.signing_key, b.signing_key);
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(config.bot_token.is_some());
        assert!(!config.signing_key.is_empty());
        assert!(!config.csrf_cookie.secure);
    }
}

mod models_tests {
    use crate::application::issue_token::Claims;
    use crate::domain::entity::telegram_user::TelegramUser;
    use crate::domain::entity::user::User;
    use crate::presentation::dto::{
        AuthConfigResponse, AuthMeResponse, AuthUserDto, SetAdminRequest, TelegramAuthRequest,
        TelegramAuthResponse, UserSearchItem,
    };
    use chrono::Utc;

    #[test]
    fn test_auth_request_deserialization() {
        let request: TelegramAuthRequest =
            serde_json::from_str(r#"{"initData":"auth_date=1"}"#).unwrap();
        assert_eq!(request.init_data, "auth_date=1");

        // Missing field falls back to empty, rejected later by validation
        let request: TelegramAuthRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.init_data, "");
    }

    #[test]
    fn test_auth_response_serialization() {
        let response = TelegramAuthResponse {
            token: "jwt".to_string(),
            expires_at: Utc::now(),
            user: TelegramUser {
                id: 555,
                first_name: Some("Ada".to_string()),
                ..Default::default()
            }
            .into(),
            csrf_token: "deadbeef".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("token").is_some());
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("csrfToken").is_some());
        assert_eq!(json["user"]["id"], 555);
        assert_eq!(json["user"]["firstName"], "Ada");
    }

    #[test]
    fn test_me_response_serialization() {
        let user = User::from_telegram(&TelegramUser {
            id: 555,
            username: Some("ada".to_string()),
            ..Default::default()
        });
        let response = AuthMeResponse {
            user: AuthUserDto::from_user(user, 30),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["id"], 555);
        assert_eq!(json["user"]["role"], "client");
        assert_eq!(json["user"]["balance"], 30);
        assert!(json["user"].get("photoUrl").is_some());
    }

    #[test]
    fn test_config_response_serialization() {
        let response = AuthConfigResponse {
            issuer: "ucode".to_string(),
            audience: "ucode-web".to_string(),
            token_ttl_seconds: 3600,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["tokenTtlSeconds"], 3600);
    }

    #[test]
    fn test_search_item_serialization() {
        let mut user = User::from_telegram(&TelegramUser {
            id: 7,
            username: Some("mod".to_string()),
            ..Default::default()
        });
        user.is_admin = true;

        let json = serde_json::to_value(UserSearchItem::from(user)).unwrap();
        assert_eq!(json["telegramId"], 7);
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["isRoot"], false);
    }

    #[test]
    fn test_set_admin_request_deserialization() {
        let request: SetAdminRequest = serde_json::from_str(r#"{"isAdmin":true}"#).unwrap();
        assert!(request.is_admin);
    }

    #[test]
    fn test_claims_wire_keys() {
        let claims = Claims {
            iss: "ucode".to_string(),
            aud: "ucode-web".to_string(),
            sub: "555".to_string(),
            unique_name: "ada".to_string(),
            first_name: "Ada".to_string(),
            last_name: String::new(),
            username: "ada".to_string(),
            photo_url: None,
            csrf: "c".to_string(),
            role: None,
            iat: 0,
            nbf: 0,
            exp: 10,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("tg:first_name").is_some());
        assert!(json.get("tg:username").is_some());
        assert!(json.get("unique_name").is_some());
        // Absent optionals stay off the wire
        assert!(json.get("tg:photo_url").is_none());
        assert!(json.get("role").is_none());
    }
}

mod error_tests {
    use crate::error::AuthError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AuthError::InitDataRequired.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::AuthDateStale.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::TokenInvalid.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::CsrfRejected.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::BotTokenMissing.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AuthError::SigningKeyMissing.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(AuthError::MissingHash.kind(), ErrorKind::BadRequest);
        assert_eq!(AuthError::TokenInvalid.kind(), ErrorKind::Unauthorized);
        assert_eq!(AuthError::Forbidden.kind(), ErrorKind::Forbidden);
        assert_eq!(AuthError::UserNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            AuthError::Internal("x".to_string()).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_error_into_response() {
        let response = AuthError::UserNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AuthError::CsrfRejected.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AuthError::InvalidSignature.to_string(),
            "Invalid Telegram signature"
        );
        assert_eq!(AuthError::AuthDateStale.to_string(), "Auth data is too old");
        assert_eq!(AuthError::QueryRequired.to_string(), "Query is required");
    }
}

mod usecase_tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::{BOT_TOKEN, signed_init_data};
    use crate::application::config::AuthConfig;
    use crate::application::issue_token::TokenIssuer;
    use crate::application::manage_users::{SearchUsersUseCase, SetAdminUseCase};
    use crate::application::me::MeUseCase;
    use crate::application::sign_in::{SignInInput, SignInUseCase};
    use crate::domain::entity::telegram_user::TelegramUser;
    use crate::domain::entity::user::User;
    use crate::domain::repository::UserRepository;
    use crate::error::{AuthError, AuthResult};
    use chrono::Utc;

    /// In-memory stand-in for the Postgres repository
    #[derive(Default)]
    struct MemoryUserRepository {
        users: Mutex<HashMap<i64, User>>,
        balances: Mutex<HashMap<i64, i64>>,
    }

    impl MemoryUserRepository {
        fn seed(&self, user: User) {
            self.users.lock().unwrap().insert(user.telegram_id, user);
        }

        fn seed_balance(&self, telegram_id: i64, balance: i64) {
            self.balances.lock().unwrap().insert(telegram_id, balance);
        }
    }

    impl UserRepository for MemoryUserRepository {
        async fn upsert_from_telegram(&self, profile: &TelegramUser) -> AuthResult<User> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .entry(profile.id)
                .and_modify(|existing| existing.apply_telegram(profile))
                .or_insert_with(|| User::from_telegram(profile));
            Ok(user.clone())
        }

        async fn find_by_telegram_id(&self, telegram_id: i64) -> AuthResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(&telegram_id).cloned())
        }

        async fn search(&self, query: &str, limit: i64) -> AuthResult<Vec<User>> {
            let users = self.users.lock().unwrap();
            let exact_id: Option<i64> = query.parse().ok();
            let needle = query.to_lowercase();

            let mut hits: Vec<User> = users
                .values()
                .filter(|user| {
                    let name_match = [&user.username, &user.first_name, &user.last_name]
                        .into_iter()
                        .flatten()
                        .any(|field| field.to_lowercase().contains(&needle));
                    name_match || exact_id == Some(user.telegram_id)
                })
                .cloned()
                .collect();
            hits.sort_by_key(|user| user.telegram_id);
            hits.truncate(limit as usize);
            Ok(hits)
        }

        async fn set_admin(&self, telegram_id: i64, is_admin: bool) -> AuthResult<bool> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(&telegram_id) {
                Some(user) => {
                    user.is_admin = is_admin;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn balance_of(&self, telegram_id: i64) -> AuthResult<i64> {
            Ok(*self.balances.lock().unwrap().get(&telegram_id).unwrap_or(&0))
        }
    }

    fn sign_in_use_case(
        repo: Arc<MemoryUserRepository>,
    ) -> SignInUseCase<MemoryUserRepository> {
        let config = AuthConfig {
            bot_token: Some(BOT_TOKEN.to_string()),
            signing_key: "usecase-test-signing-key-0123456".to_string(),
            ..AuthConfig::default()
        };
        SignInUseCase::new(repo, Arc::new(TokenIssuer::new()), Arc::new(config))
    }

    fn user_init_data(id: i64, username: &str) -> String {
        let auth_date = Utc::now().timestamp().to_string();
        let payload = format!(r#"{{"id":{id},"first_name":"Test","username":"{username}"}}"#);
        signed_init_data(
            BOT_TOKEN,
            &[("auth_date", auth_date.as_str()), ("user", payload.as_str())],
        )
    }

    #[tokio::test]
    async fn test_sign_in_persists_user_and_issues_token() {
        let repo = Arc::new(MemoryUserRepository::default());
        let use_case = sign_in_use_case(repo.clone());

        let output = use_case
            .execute(SignInInput {
                init_data: user_init_data(555, "ada"),
            })
            .await
            .unwrap();

        assert!(!output.token.is_empty());
        assert_eq!(output.csrf_token.len(), 32);
        assert_eq!(output.user.id, 555);

        let stored = repo.find_by_telegram_id(555).await.unwrap().unwrap();
        assert_eq!(stored.username.as_deref(), Some("ada"));
        assert!(!stored.is_admin);
    }

    #[tokio::test]
    async fn test_sign_in_refreshes_profile_and_keeps_grants() {
        let repo = Arc::new(MemoryUserRepository::default());
        let mut existing = User::from_telegram(&TelegramUser {
            id: 555,
            username: Some("old_name".to_string()),
            ..Default::default()
        });
        existing.is_admin = true;
        repo.seed(existing);

        let use_case = sign_in_use_case(repo.clone());
        use_case
            .execute(SignInInput {
                init_data: user_init_data(555, "new_name"),
            })
            .await
            .unwrap();

        let stored = repo.find_by_telegram_id(555).await.unwrap().unwrap();
        assert_eq!(stored.username.as_deref(), Some("new_name"));
        assert!(stored.is_admin);
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_signature() {
        let repo = Arc::new(MemoryUserRepository::default());
        let use_case = sign_in_use_case(repo.clone());

        let err = use_case
            .execute(SignInInput {
                init_data: "auth_date=1&user=%7B%22id%22%3A1%7D&hash=00".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
        assert!(repo.find_by_telegram_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_me_returns_user_with_balance() {
        let repo = Arc::new(MemoryUserRepository::default());
        repo.seed(User::from_telegram(&TelegramUser {
            id: 555,
            username: Some("ada".to_string()),
            ..Default::default()
        }));
        repo.seed_balance(555, 30);

        let output = MeUseCase::new(repo).execute(555).await.unwrap();
        assert_eq!(output.user.telegram_id, 555);
        assert_eq!(output.balance, 30);
    }

    #[tokio::test]
    async fn test_me_unknown_user() {
        let repo = Arc::new(MemoryUserRepository::default());
        let err = MeUseCase::new(repo).execute(404).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let repo = Arc::new(MemoryUserRepository::default());
        let err = SearchUsersUseCase::new(repo)
            .execute("   ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::QueryRequired));
    }

    #[tokio::test]
    async fn test_search_matches_name_and_id() {
        let repo = Arc::new(MemoryUserRepository::default());
        for (id, name) in [(1, "ada"), (2, "adam"), (3, "grace")] {
            repo.seed(User::from_telegram(&TelegramUser {
                id,
                username: Some(name.to_string()),
                ..Default::default()
            }));
        }

        let use_case = SearchUsersUseCase::new(repo);

        let hits = use_case.execute("ada", None).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = use_case.execute("ada", Some(1)).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = use_case.execute("3", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].telegram_id, 3);
    }

    #[tokio::test]
    async fn test_set_admin_flips_grant() {
        let repo = Arc::new(MemoryUserRepository::default());
        repo.seed(User::from_telegram(&TelegramUser {
            id: 7,
            ..Default::default()
        }));

        SetAdminUseCase::new(repo.clone()).execute(7, true).await.unwrap();
        assert!(repo.find_by_telegram_id(7).await.unwrap().unwrap().is_admin);

        SetAdminUseCase::new(repo.clone()).execute(7, false).await.unwrap();
        assert!(!repo.find_by_telegram_id(7).await.unwrap().unwrap().is_admin);
    }

    #[tokio::test]
    async fn test_set_admin_unknown_user() {
        let repo = Arc::new(MemoryUserRepository::default());
        let err = SetAdminUseCase::new(repo).execute(404, true).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }
}
