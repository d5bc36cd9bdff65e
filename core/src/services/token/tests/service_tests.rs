//! Tests for the token service: issuance, validation, refresh, revocation
//! and introspection

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;
use tl_shared::TokenSettings;

use crate::domain::entities::token::TokenType;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemoryRevocationStore, RevocationStore};
use crate::services::token::{
    SigningKeys, TokenCodec, TokenIssuer, TokenService, TokenServiceConfig,
};

use super::{create_test_service, test_config, token_error, TEST_SECRET};

fn scopes(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[tokio::test]
async fn test_access_token_lifecycle() {
    let config = test_config().with_access_ttl(Duration::hours(1));
    let service = TokenService::in_memory(config).unwrap();

    let (token, expires_at) = service.issue_access("u1", Some("u1@x.com")).unwrap();
    let claims = service.validate(&token).await.unwrap();

    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.email.as_deref(), Some("u1@x.com"));
    assert_eq!(claims.token_type, TokenType::Auth);
    assert_eq!(claims.exp, expires_at.timestamp());
    assert_eq!(claims.iss, "tokenlife");
    assert_eq!(claims.aud, "tokenlife-api");

    let refresh_token = service.issue_refresh("u1").unwrap();

    service.revoke(&token).await.unwrap();
    assert_eq!(
        token_error(service.validate(&token).await),
        TokenError::TokenRevoked
    );

    // Revoking the access token leaves the refresh token alone
    let refresh_claims = service.validate(&refresh_token).await.unwrap();
    assert_eq!(refresh_claims.token_type, TokenType::Refresh);
    assert!(refresh_claims.email.is_none());
}

#[tokio::test]
async fn test_access_token_ttl() {
    let service = create_test_service();
    let before = Utc::now();

    let (_, expires_at) = service.issue_access("u1", None).unwrap();

    let ttl = expires_at - before;
    assert!(ttl <= Duration::minutes(15) + Duration::seconds(1));
    assert!(ttl > Duration::minutes(15) - Duration::seconds(2));
}

#[tokio::test]
async fn test_empty_email_is_omitted() {
    let service = create_test_service();

    let (token, _) = service.issue_access("u1", Some("")).unwrap();
    let claims = service.validate_access(&token).await.unwrap();

    assert!(claims.email.is_none());
}

#[tokio::test]
async fn test_token_ids_are_unique() {
    let service = create_test_service();

    let (first, _) = service.issue_access("u1", None).unwrap();
    let (second, _) = service.issue_access("u1", None).unwrap();
    assert_ne!(first, second);

    let first = service.validate(&first).await.unwrap();
    let second = service.validate(&second).await.unwrap();
    assert_ne!(first.jti, second.jti);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let config = test_config().with_access_ttl(Duration::milliseconds(1));
    let service = TokenService::in_memory(config).unwrap();

    let (token, _) = service.issue_access("u1", None).unwrap();
    sleep_ms(10).await;

    assert_eq!(
        token_error(service.validate(&token).await),
        TokenError::TokenExpired
    );
}

#[tokio::test]
async fn test_revocation_checked_before_expiry() {
    let config = test_config().with_access_ttl(Duration::milliseconds(1));
    let service = TokenService::in_memory(config).unwrap();

    let (token, _) = service.issue_access("u1", None).unwrap();
    let claims = service.inspect(&token).await.unwrap();

    // Entry recorded with a future expiry so it survives the next lookup
    service
        .store()
        .revoke(&claims.id, Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    sleep_ms(10).await;

    assert_eq!(
        token_error(service.validate(&token).await),
        TokenError::TokenRevoked
    );
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let service = create_test_service();
    let (token, _) = service.issue_access("u1", None).unwrap();

    let signature_start = token.rfind('.').unwrap() + 1;
    for index in signature_start..token.len() {
        let mut bytes = token.clone().into_bytes();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            token_error(service.validate(&tampered).await),
            TokenError::InvalidSignature
        );
    }
}

#[tokio::test]
async fn test_malformed_token_is_rejected() {
    let service = create_test_service();

    for token in ["", "not-a-token", "a.b", "a.b.c"] {
        assert_eq!(
            token_error(service.validate(token).await),
            TokenError::MalformedToken
        );
    }
}

#[tokio::test]
async fn test_token_type_discrimination() {
    let service = create_test_service();

    let (access_token, _) = service.issue_access("u1", None).unwrap();
    let refresh_token = service.issue_refresh("u1").unwrap();

    // Generic validation accepts any class
    assert!(service.validate(&refresh_token).await.is_ok());

    assert!(matches!(
        token_error(service.refresh(&access_token).await),
        TokenError::InvalidToken { .. }
    ));
    assert!(matches!(
        token_error(service.validate_api(&refresh_token).await),
        TokenError::InvalidToken { .. }
    ));
    assert!(matches!(
        token_error(service.validate_access(&refresh_token).await),
        TokenError::InvalidToken { .. }
    ));
    assert!(matches!(
        token_error(service.validate_reset(&access_token).await),
        TokenError::InvalidToken { .. }
    ));
    assert!(matches!(
        token_error(service.validate_verification(&access_token).await),
        TokenError::InvalidToken { .. }
    ));
}

#[tokio::test]
async fn test_wrong_type_reason() {
    let service = create_test_service();
    let refresh_token = service.issue_refresh("u1").unwrap();

    match token_error(service.validate_api(&refresh_token).await) {
        TokenError::InvalidToken { reason } => {
            assert_eq!(reason, "expected api token, got refresh")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let service = create_test_service();
    let refresh_token = service.issue_refresh("u1").unwrap();

    let first = service.refresh(&refresh_token).await.unwrap();
    let second = service.refresh(&refresh_token).await.unwrap();

    assert_ne!(first.access_token, second.access_token);
    assert_eq!(first.refresh_token, refresh_token);
    assert_eq!(second.refresh_token, refresh_token);
    assert_eq!(first.token_type, "bearer");
    assert_eq!(first.expires_in, 900);

    let claims = service.validate_access(&second.access_token).await.unwrap();
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.exp, second.expires_at.timestamp());
}

#[tokio::test]
async fn test_refresh_with_revoked_token_fails() {
    let service = create_test_service();
    let refresh_token = service.issue_refresh("u1").unwrap();

    service.revoke(&refresh_token).await.unwrap();

    assert_eq!(
        token_error(service.refresh(&refresh_token).await),
        TokenError::TokenRevoked
    );
}

#[tokio::test]
async fn test_refresh_disabled() {
    let mut config = test_config();
    config.enable_refresh = false;
    let service = TokenService::in_memory(config).unwrap();
    let refresh_token = service.issue_refresh("u1").unwrap();

    assert_eq!(
        token_error(service.refresh(&refresh_token).await),
        TokenError::FeatureDisabled {
            feature: "refresh".to_string()
        }
    );
}

#[tokio::test]
async fn test_issue_pair() {
    let service = create_test_service();

    let pair = service.issue_pair("u1", Some("u1@x.com")).unwrap();

    assert_eq!(pair.token_type, "bearer");
    assert_eq!(pair.expires_in, 900);
    let access = service.validate_access(&pair.access_token).await.unwrap();
    assert_eq!(access.exp, pair.expires_at.timestamp());
    let refreshed = service.refresh(&pair.refresh_token).await.unwrap();
    assert_eq!(refreshed.refresh_token, pair.refresh_token);
}

#[tokio::test]
async fn test_api_token_scopes() {
    let service = create_test_service();

    let api_token = service
        .issue_api("u1", &scopes(&["read", "write"]))
        .unwrap();
    assert_eq!(api_token.scopes, scopes(&["read", "write"]));
    assert!(api_token.has_scope("read"));
    assert!(!api_token.has_scope("admin"));

    let (claims, granted) = service.validate_api(&api_token.token).await.unwrap();
    assert_eq!(claims.token_type, TokenType::Api);
    assert_eq!(claims.jti, api_token.token_id);
    assert_eq!(granted, scopes(&["read", "write"]));
    assert_eq!(claims.exp, api_token.expires_at.timestamp());

    assert_eq!(
        claims.require_scope("admin"),
        Err(TokenError::InsufficientScope {
            scope: "admin".to_string()
        })
    );
}

#[tokio::test]
async fn test_api_token_ttl_and_dedup() {
    let service = create_test_service();

    let api_token = service
        .issue_api("u1", &scopes(&["write", "read", "write"]))
        .unwrap();

    assert_eq!(api_token.scopes, scopes(&["write", "read"]));
    assert_eq!(api_token.name, "api-token");
    let ttl = api_token.expires_at - api_token.created_at;
    assert_eq!(ttl, Duration::hours(6));
}

#[tokio::test]
async fn test_api_token_without_scopes() {
    let service = create_test_service();

    let api_token = service.issue_api("u1", &[]).unwrap();
    let (_, granted) = service.validate_api(&api_token.token).await.unwrap();

    assert!(granted.is_empty());
}

#[tokio::test]
async fn test_named_api_token() {
    let service = create_test_service();

    let api_token = service
        .issuer()
        .issue_named_api("u1", "ci-deploy", &scopes(&["deploy"]))
        .unwrap();

    assert_eq!(api_token.name, "ci-deploy");
    assert_ne!(api_token.id.to_string(), api_token.token_id);
}

#[tokio::test]
async fn test_reset_and_verification_tokens() {
    let service = create_test_service();

    let reset = service.issue_reset("u1").unwrap();
    let verification = service.issue_verification("u1").unwrap();

    let reset_claims = service.validate_reset(&reset).await.unwrap();
    assert_eq!(reset_claims.token_type, TokenType::Reset);
    assert_eq!(reset_claims.exp - reset_claims.iat, 3600);

    let verification_claims = service.validate_verification(&verification).await.unwrap();
    assert_eq!(verification_claims.token_type, TokenType::Verification);
    assert_eq!(verification_claims.exp - verification_claims.iat, 86400);
}

#[tokio::test]
async fn test_empty_subject_is_rejected() {
    let service = create_test_service();

    assert!(matches!(
        service.issue_access("", None),
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        service.issue_api("", &[]),
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_revoke_expired_token() {
    let config = test_config().with_access_ttl(Duration::milliseconds(1));
    let service = TokenService::in_memory(config).unwrap();

    let (token, _) = service.issue_access("u1", None).unwrap();
    sleep_ms(10).await;

    service.revoke(&token).await.unwrap();

    // The entry was already stale, so the post-revoke sweep removed it
    assert_eq!(service.store().len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let service = create_test_service();
    let (token, _) = service.issue_access("u1", None).unwrap();

    service.revoke(&token).await.unwrap();
    service.revoke(&token).await.unwrap();

    assert_eq!(service.store().len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_revoke_requires_valid_signature() {
    let service = create_test_service();
    let other = TokenService::in_memory(TokenServiceConfig::new("other-secret")).unwrap();
    let (foreign, _) = other.issue_access("u1", None).unwrap();

    assert_eq!(
        token_error(service.revoke(&foreign).await),
        TokenError::InvalidSignature
    );
    assert_eq!(
        token_error(service.revoke("garbage").await),
        TokenError::MalformedToken
    );
    assert_eq!(service.store().len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_revocation_disabled() {
    let mut config = test_config();
    config.enable_revocation = false;
    let store = Arc::new(InMemoryRevocationStore::new());
    let service = TokenService::new(store.clone(), config).unwrap();

    let (token, _) = service.issue_access("u1", None).unwrap();
    assert_eq!(
        token_error(service.revoke(&token).await),
        TokenError::FeatureDisabled {
            feature: "revocation".to_string()
        }
    );

    // The store is not consulted while revocation is off
    let claims = service.inspect(&token).await.unwrap();
    store
        .revoke(&claims.id, Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    assert!(service.validate(&token).await.is_ok());
}

#[tokio::test]
async fn test_inspect() {
    let service = create_test_service();
    let api_token = service.issue_api("u1", &scopes(&["read"])).unwrap();

    let info = service.inspect(&api_token.token).await.unwrap();
    assert_eq!(info.id, api_token.token_id);
    assert_eq!(info.subject_id, "u1");
    assert_eq!(info.token_type, TokenType::Api);
    assert_eq!(info.expires_at, api_token.expires_at);
    assert_eq!(info.scopes, Some(scopes(&["read"])));
    assert!(!info.is_revoked);
    assert!(!info.is_expired);
    assert!(info.is_active());

    service.revoke(&api_token.token).await.unwrap();
    let info = service.inspect(&api_token.token).await.unwrap();
    assert!(info.is_revoked);
    assert!(!info.is_active());
}

#[tokio::test]
async fn test_inspect_expired_token() {
    let config = test_config().with_access_ttl(Duration::milliseconds(1));
    let service = TokenService::in_memory(config).unwrap();

    let (token, _) = service.issue_access("u1", None).unwrap();
    sleep_ms(10).await;

    let info = service.inspect(&token).await.unwrap();
    assert!(info.is_expired);
    assert_eq!(
        token_error(service.inspect("a.b.c").await),
        TokenError::MalformedToken
    );
}

#[tokio::test]
async fn test_issuer_and_audience_are_enforced() {
    let service = create_test_service();

    let mut foreign_config = test_config();
    foreign_config.issuer = "someone-else".to_string();
    let foreign_issuer = TokenService::in_memory(foreign_config).unwrap();
    let (token, _) = foreign_issuer.issue_access("u1", None).unwrap();
    assert!(matches!(
        token_error(service.validate(&token).await),
        TokenError::InvalidToken { .. }
    ));

    let mut foreign_config = test_config();
    foreign_config.audience = "another-api".to_string();
    let foreign_audience = TokenService::in_memory(foreign_config).unwrap();
    let (token, _) = foreign_audience.issue_access("u1", None).unwrap();
    assert!(matches!(
        token_error(service.validate(&token).await),
        TokenError::InvalidToken { .. }
    ));
}

#[tokio::test]
async fn test_concurrent_validation_and_revocation() {
    let service = Arc::new(create_test_service());
    let tokens: Vec<String> = (0..32)
        .map(|i| service.issue_access(&format!("user-{}", i), None).unwrap().0)
        .collect();

    let mut handles = Vec::new();
    for (i, token) in tokens.iter().cloned().enumerate() {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                service.revoke(&token).await.unwrap();
            }
            service.validate(&token).await.is_ok()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap(), i % 2 == 1);
    }
    assert_eq!(service.store().len().await.unwrap(), 16);
}

#[test]
fn test_config_validation() {
    assert!(TokenServiceConfig::new(TEST_SECRET).validate().is_ok());
    assert!(matches!(
        TokenServiceConfig::new("").validate(),
        Err(DomainError::Validation { .. })
    ));
    assert!(TokenServiceConfig::new(TEST_SECRET)
        .with_access_ttl(Duration::zero())
        .validate()
        .is_err());

    let mut config = TokenServiceConfig::new(TEST_SECRET);
    config.api_ttl_multiplier = 0;
    assert!(config.validate().is_err());

    let mut config = TokenServiceConfig::new(TEST_SECRET);
    config.algorithm = Algorithm::RS256;
    assert!(config.validate().is_err());
    assert!(TokenService::in_memory(config).is_err());
}

#[test]
fn test_config_debug_redacts_secret() {
    let debug = format!("{:?}", TokenServiceConfig::new(TEST_SECRET));
    assert!(!debug.contains(TEST_SECRET));
}

#[test]
fn test_config_from_settings() {
    let mut settings = TokenSettings::new(TEST_SECRET);
    settings.access_ttl_seconds = 60;
    settings.api_ttl_multiplier = 2;

    let config = TokenServiceConfig::from_settings(&settings).unwrap();
    assert_eq!(config.algorithm, Algorithm::HS256);
    assert_eq!(config.access_ttl, Duration::seconds(60));
    assert_eq!(config.api_ttl().unwrap(), Duration::seconds(120));
    assert_eq!(config.secret, TEST_SECRET.as_bytes());

    settings.algorithm = String::new();
    assert!(matches!(
        TokenServiceConfig::from_settings(&settings),
        Err(DomainError::Validation { .. })
    ));

    settings.algorithm = "XS999".to_string();
    assert!(TokenServiceConfig::from_settings(&settings).is_err());
}

#[test]
fn test_config_from_settings_out_of_range_ttl() {
    let mut settings = TokenSettings::new(TEST_SECRET);
    settings.refresh_ttl_seconds = i64::MAX;
    assert!(matches!(
        TokenServiceConfig::from_settings(&settings),
        Err(DomainError::Validation { .. })
    ));

    // Access TTL fits; 24x of it runs past the last representable instant
    let mut settings = TokenSettings::new(TEST_SECRET);
    settings.access_ttl_seconds = 1_000_000_000_000;
    assert!(matches!(
        TokenServiceConfig::from_settings(&settings),
        Err(DomainError::Validation { .. })
    ));

    // Multiplying by the API multiplier overflows
    let mut settings = TokenSettings::new(TEST_SECRET);
    settings.access_ttl_seconds = 100_000_000_000;
    settings.api_ttl_multiplier = i32::MAX;
    assert!(matches!(
        TokenServiceConfig::from_settings(&settings),
        Err(DomainError::Validation { .. })
    ));
}

#[test]
fn test_config_rejects_non_positive_ttls() {
    for field in ["refresh", "reset", "verification"] {
        let mut settings = TokenSettings::new(TEST_SECRET);
        match field {
            "refresh" => settings.refresh_ttl_seconds = -60,
            "reset" => settings.reset_ttl_seconds = 0,
            _ => settings.verification_ttl_seconds = -1,
        }
        assert!(
            matches!(
                TokenServiceConfig::from_settings(&settings),
                Err(DomainError::Validation { .. })
            ),
            "{} TTL accepted",
            field
        );
    }

    let mut config = TokenServiceConfig::new(TEST_SECRET);
    config.refresh_ttl = Duration::seconds(-60);
    assert!(TokenService::in_memory(config).is_err());
}

#[test]
fn test_unrepresentable_expiry_fails_issuance() {
    let service = create_test_service();
    let mut config = service.config().clone();
    config.access_ttl = Duration::days(365 * 1_000_000);
    let codec = TokenCodec::new(SigningKeys::hmac(Algorithm::HS256, TEST_SECRET.as_bytes()));
    let issuer = TokenIssuer::new(Arc::new(codec), Arc::new(config));

    assert!(matches!(
        issuer.issue_access("u1", None),
        Err(DomainError::Token(TokenError::TokenGenerationFailed))
    ));
    assert!(issuer.issue_api("u1", &[]).is_err());
}
