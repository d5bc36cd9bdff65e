//! Tests for the claims codec

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::domain::entities::token::{TokenClaims, TokenType};
use crate::errors::TokenError;
use crate::services::token::{SigningKeys, TokenCodec};

use super::TEST_SECRET;

fn codec() -> TokenCodec {
    TokenCodec::new(SigningKeys::hmac(Algorithm::HS256, TEST_SECRET.as_bytes()))
}

fn claims(token_type: TokenType) -> TokenClaims {
    TokenClaims::new(
        "u1",
        token_type,
        Utc::now(),
        Duration::hours(1),
        "tokenlife",
        "tokenlife-api",
    )
    .unwrap()
}

fn replace_char(token: &str, index: usize) -> String {
    let mut bytes = token.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_round_trip() {
    let codec = codec();
    let original = claims(TokenType::Api).with_scopes(vec!["read".to_string(), "write".to_string()]);

    let token = codec.encode(&original).unwrap();
    assert_eq!(token.split('.').count(), 3);

    let decoded = codec.decode(&token).unwrap();
    assert_eq!(decoded.sub, original.sub);
    assert_eq!(decoded.token_type, original.token_type);
    assert_eq!(decoded.exp, original.exp);
    assert_eq!(decoded.jti, original.jti);
    assert_eq!(decoded, original);
}

#[test]
fn test_decode_does_not_check_expiry() {
    let codec = codec();
    let mut expired = claims(TokenType::Auth);
    expired.exp = Utc::now().timestamp() - 3600;

    let token = codec.encode(&expired).unwrap();
    assert_eq!(codec.decode(&token).unwrap().exp, expired.exp);
}

#[test]
fn test_header_names_algorithm() {
    let token = codec().encode(&claims(TokenType::Auth)).unwrap();
    let header = URL_SAFE_NO_PAD.decode(token.split('.').next().unwrap()).unwrap();
    let header: serde_json::Value = serde_json::from_slice(&header).unwrap();

    assert_eq!(header["alg"], "HS256");
    assert_eq!(header["typ"], "JWT");
}

#[test]
fn test_every_signature_character_is_checked() {
    let codec = codec();
    let token = codec.encode(&claims(TokenType::Auth)).unwrap();
    let signature_start = token.rfind('.').unwrap() + 1;

    for index in signature_start..token.len() {
        let tampered = replace_char(&token, index);
        assert_eq!(
            codec.decode(&tampered),
            Err(TokenError::InvalidSignature),
            "signature position {}",
            index - signature_start
        );
    }
}

#[test]
fn test_payload_substitution_is_detected() {
    let codec = codec();
    let token = codec.encode(&claims(TokenType::Auth)).unwrap();
    let segments: Vec<&str> = token.split('.').collect();

    let mut forged = claims(TokenType::Auth);
    forged.sub = "admin".to_string();
    let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
    let forged_token = format!("{}.{}.{}", segments[0], forged_payload, segments[2]);

    assert_eq!(codec.decode(&forged_token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_none_algorithm_is_rejected() {
    let codec = codec();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims(TokenType::Auth)).unwrap());

    let token = format!("{}.{}.{}", header, payload, "c2ln");
    assert_eq!(codec.decode(&token), Err(TokenError::InvalidSignature));

    let unsigned = format!("{}.{}.", header, payload);
    assert_eq!(codec.decode(&unsigned), Err(TokenError::MalformedToken));
}

#[test]
fn test_algorithm_substitution_is_rejected() {
    let codec = codec();
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims(TokenType::Auth),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(codec.decode(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let other = TokenCodec::new(SigningKeys::hmac(Algorithm::HS256, b"another-secret"));
    let token = other.encode(&claims(TokenType::Auth)).unwrap();

    assert_eq!(codec().decode(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_structural_garbage_is_malformed() {
    let codec = codec();
    for token in ["", "abc", "a.b", "a.b.c.d", "!!!.???.sig", "e30.e30.", "..."] {
        assert_eq!(codec.decode(token), Err(TokenError::MalformedToken), "{:?}", token);
    }

    // Header decodes but the payload is not a JSON object
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
    let token = format!("{}.{}.c2ln", header, payload);
    assert_eq!(codec.decode(&token), Err(TokenError::MalformedToken));
}

#[test]
fn test_missing_required_claim_is_malformed() {
    let codec = codec();
    let payload = serde_json::json!({
        "sub": "u1",
        "token_type": "auth",
        "iat": Utc::now().timestamp(),
        "exp": Utc::now().timestamp() + 3600,
    });
    let token = encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(codec.decode(&token), Err(TokenError::MalformedToken));
}

#[test]
fn test_unknown_token_type_is_malformed() {
    let codec = codec();
    let mut payload = serde_json::to_value(claims(TokenType::Auth)).unwrap();
    payload["token_type"] = serde_json::json!("superuser");
    let token = encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(codec.decode(&token), Err(TokenError::MalformedToken));
}
