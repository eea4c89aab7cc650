// =====================================================
// 서명된 URL 토큰 테스트
// Signed URL token tests: issuance, verification, rotation
// =====================================================
// Exercises the token service directly, without HTTP. Two differently-keyed
// stores stand in for a rotation: what one store signed, another verifies
// only while the key id stays registered.
// =====================================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use media_server::domains::media::services::{SignedUrlService, SigningKeyStore};
use media_server::shared::errors::MediaError;

const KEY0: &[u8] = b"token-test-signing-key-zero";
const KEY1: &[u8] = b"token-test-signing-key-one";

fn store(current: &str, ids: &[(&str, &[u8])]) -> Arc<SigningKeyStore> {
    let keys: HashMap<String, Vec<u8>> = ids
        .iter()
        .map(|(id, secret)| (id.to_string(), secret.to_vec()))
        .collect();
    Arc::new(SigningKeyStore::new(current, keys).expect("current key must be registered"))
}

fn service(current: &str, ids: &[(&str, &[u8])]) -> SignedUrlService {
    SignedUrlService::new("origin-sign.test", store(current, ids))
}

fn custom_claims(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn round_trip_returns_superset_of_custom_claims() {
    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/videos/a.mp4";
    let custom = custom_claims(&[
        ("uid", serde_json::json!(42)),
        ("allowedIpRange", serde_json::json!("10.0.0.0/8")),
    ]);

    let token = service.issue(path, 3600, custom, None).unwrap();
    let claims = service.verify(&token, path).unwrap();

    assert_eq!(claims.sub, path);
    assert_eq!(claims.iss, "origin-sign.test");
    assert_eq!(claims.exp - claims.iat, 3600);
    assert_eq!(claims.extra.get("uid"), Some(&serde_json::json!(42)));
    assert_eq!(
        claims.extra.get("allowedIpRange"),
        Some(&serde_json::json!("10.0.0.0/8"))
    );
    // URI-signing claims stamped by default
    assert_eq!(claims.extra.get("cdnistt"), Some(&serde_json::json!(1)));
    assert_eq!(claims.extra.get("cdniets"), Some(&serde_json::json!(3600)));
}

#[test]
fn reserved_claims_cannot_be_forged_by_callers() {
    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/images/cat.jpg";
    let custom = custom_claims(&[
        ("exp", serde_json::json!(9_999_999_999_i64)),
        ("sub", serde_json::json!("/uploads/images/other.jpg")),
        ("nbf", serde_json::json!(0)),
    ]);

    let token = service.issue(path, 60, custom, None).unwrap();
    let claims = service.verify(&token, path).unwrap();

    assert_eq!(claims.sub, path);
    assert_eq!(claims.exp - claims.iat, 60);
    assert!(!claims.extra.contains_key("exp"));
    assert!(!claims.extra.contains_key("sub"));
}

#[test]
fn token_is_dead_in_its_expiry_second() {
    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/images/cat.jpg";

    // ttl 0 makes exp == now: the boundary itself must fail
    let token = service.issue(path, 0, serde_json::Map::new(), None).unwrap();
    assert!(matches!(
        service.verify(&token, path),
        Err(MediaError::TokenExpired)
    ));

    // while a generous ttl verifies
    let token = service.issue(path, 3600, serde_json::Map::new(), None).unwrap();
    assert!(service.verify(&token, path).is_ok());
}

#[test]
fn negative_ttl_is_already_expired() {
    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/images/cat.jpg";
    let expired = service.issue(path, -10, serde_json::Map::new(), None).unwrap();
    assert!(matches!(
        service.verify(&expired, path),
        Err(MediaError::TokenExpired)
    ));
}

#[test]
fn token_before_its_nbf_window_is_rejected() {
    use jsonwebtoken::{Algorithm, EncodingKey, crypto};
    use media_server::domains::media::models::TokenHeader;
    use media_server::domains::media::services::token_codec;

    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/images/cat.jpg";
    let now = Utc::now().timestamp();
    let claims = serde_json::json!({
        "iss": "origin-sign.test",
        "iat": now,
        "nbf": now + 1000,
        "exp": now + 2000,
        "sub": path,
    });
    let encoding_key = EncodingKey::from_secret(KEY0);
    let token = token_codec::encode(
        &TokenHeader::hs256("0"),
        &serde_json::to_vec(&claims).unwrap(),
        |signing_input| {
            Ok(crypto::sign(signing_input.as_bytes(), &encoding_key, Algorithm::HS256).unwrap())
        },
    )
    .unwrap();

    assert!(matches!(
        service.verify(&token, path),
        Err(MediaError::TokenExpired)
    ));
}

#[test]
fn flipping_any_signature_byte_is_detected() {
    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/videos/a.mp4";
    let token = service.issue(path, 3600, serde_json::Map::new(), None).unwrap();

    let (prefix, signature) = token.rsplit_once('.').unwrap();
    for (i, original) in signature.char_indices() {
        let replacement = if original == 'A' { 'B' } else { 'A' };
        let mut tampered_sig = String::with_capacity(signature.len());
        tampered_sig.push_str(&signature[..i]);
        tampered_sig.push(replacement);
        tampered_sig.push_str(&signature[i + original.len_utf8()..]);

        let tampered = format!("{prefix}.{tampered_sig}");
        assert!(
            matches!(service.verify(&tampered, path), Err(MediaError::BadSignature)),
            "flipped signature byte {i} was not detected"
        );
    }
}

#[test]
fn tampered_claims_break_the_signature() {
    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/videos/a.mp4";
    let token = service.issue(path, 3600, serde_json::Map::new(), None).unwrap();

    let mut segments: Vec<&str> = token.split('.').collect();
    let claims_seg = segments[1];
    let flipped = if claims_seg.as_bytes()[0] == b'a' { "b" } else { "a" };
    let tampered_claims = format!("{flipped}{}", &claims_seg[1..]);
    segments[1] = &tampered_claims;
    let tampered = segments.join(".");

    assert!(matches!(
        service.verify(&tampered, path),
        Err(MediaError::BadSignature)
    ));
}

#[test]
fn rotated_key_verifies_until_removed() {
    let path = "/uploads/videos/a.mp4";
    // rotation in progress: new issuance uses key 1, key 0 still registered
    let rotating = service("1", &[("0", KEY0), ("1", KEY1)]);
    let old_token = rotating
        .issue(path, 3600, serde_json::Map::new(), Some("0"))
        .unwrap();
    assert!(rotating.verify(&old_token, path).is_ok());

    // rotation finished: key 0 dropped from the store
    let retired = service("1", &[("1", KEY1)]);
    assert!(matches!(
        retired.verify(&old_token, path),
        Err(MediaError::UnknownSigningKey { .. })
    ));
}

#[test]
fn issuing_with_unknown_key_id_fails() {
    let service = service("0", &[("0", KEY0)]);
    assert!(matches!(
        service.issue("/uploads/images/cat.jpg", 60, serde_json::Map::new(), Some("9")),
        Err(MediaError::UnknownSigningKey { .. })
    ));
}

#[test]
fn token_is_bound_to_one_resource() {
    let service = service("0", &[("0", KEY0)]);
    let token = service
        .issue("/uploads/videos/a.mp4", 3600, serde_json::Map::new(), None)
        .unwrap();

    assert!(service.verify(&token, "/uploads/videos/a.mp4").is_ok());
    assert!(matches!(
        service.verify(&token, "/uploads/videos/b.mp4"),
        Err(MediaError::ResourceMismatch { .. })
    ));
}

#[test]
fn malformed_tokens_fail_uniformly() {
    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/images/cat.jpg";
    for token in ["", "abc", "a.b", "a.b.c.d", "!!!.b.c", "..", "a..c"] {
        assert!(
            matches!(service.verify(token, path), Err(MediaError::MalformedToken)),
            "expected malformed rejection for {token:?}"
        );
    }
}

#[test]
fn signed_url_embeds_token_and_cache_buster() {
    let service = service("0", &[("0", KEY0)]);
    let path = "/uploads/images/cat.jpg";
    let before = Utc::now().timestamp();
    let url = service
        .signed_url(path, 3600, serde_json::Map::new(), None)
        .unwrap();

    assert!(url.starts_with("/uploads/images/cat.jpg?t="));
    let (_, token) = url.split_once("&URISigningPackage=").unwrap();
    assert!(service.verify(token, path).is_ok());

    let t_param: i64 = url
        .split_once("?t=")
        .unwrap()
        .1
        .split_once('&')
        .unwrap()
        .0
        .parse()
        .unwrap();
    assert!(t_param >= before);
}
