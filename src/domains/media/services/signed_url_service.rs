// 서명된 URL 토큰 발급/검증 서비스
// Signed URL issuance and verification
//
// Issuance is called by the CRUD layer when it wants to hand out a protected
// URL and never touches the filesystem. Verification checks generic
// cryptographic validity (signature, expiry, subject binding) and returns the
// full claims so callers can layer resource-specific policy on top.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, crypto};

use crate::domains::media::models::{RESERVED_CLAIMS, SignedUrlClaims, TokenHeader};
use crate::domains::media::services::key_store::SigningKeyStore;
use crate::domains::media::services::token_codec;
use crate::shared::errors::MediaError;

/// 서명된 URL 서비스
/// Signed URL service
#[derive(Clone)]
pub struct SignedUrlService {
    issuer: String,
    key_store: Arc<SigningKeyStore>,
}

impl SignedUrlService {
    pub fn new(issuer: impl Into<String>, key_store: Arc<SigningKeyStore>) -> Self {
        Self {
            issuer: issuer.into(),
            key_store,
        }
    }

    /// 토큰 발급
    /// Issue a token authorizing `resource_path` for `ttl_secs` seconds
    ///
    /// `key_id` defaults to the store's current key. Reserved claims always
    /// win over `custom_claims` so a caller cannot forge its own expiry; the
    /// CDN URI-signing claims (`cdnistt`, `cdniets`) are stamped by default
    /// and may be overridden.
    pub fn issue(
        &self,
        resource_path: &str,
        ttl_secs: i64,
        custom_claims: serde_json::Map<String, serde_json::Value>,
        key_id: Option<&str>,
    ) -> Result<String, MediaError> {
        let kid = key_id.unwrap_or_else(|| self.key_store.current_key_id());
        let secret = self
            .key_store
            .key_for(kid)
            .ok_or_else(|| MediaError::UnknownSigningKey { kid: kid.to_string() })?;

        let now = Utc::now().timestamp();
        let mut extra = serde_json::Map::new();
        extra.insert("cdnistt".to_string(), serde_json::Value::from(1));
        extra.insert("cdniets".to_string(), serde_json::Value::from(3600));
        for (name, value) in custom_claims {
            if !RESERVED_CLAIMS.contains(&name.as_str()) {
                extra.insert(name, value);
            }
        }

        let claims = SignedUrlClaims {
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now + ttl_secs,
            sub: resource_path.to_string(),
            extra,
        };
        let claims_json = serde_json::to_vec(&claims)
            .map_err(|e| MediaError::Internal(format!("failed to serialize claims: {e}")))?;

        let encoding_key = EncodingKey::from_secret(secret);
        token_codec::encode(&TokenHeader::hs256(kid), &claims_json, |signing_input| {
            crypto::sign(signing_input.as_bytes(), &encoding_key, Algorithm::HS256)
                .map_err(|e| MediaError::Internal(format!("failed to sign token: {e}")))
        })
    }

    /// 서명된 URL 생성
    /// Build the signed URL the token travels in
    ///
    /// The `t` query parameter is a cache-busting timestamp only; the
    /// verifier never trusts it. It keeps intermediate caches from
    /// coalescing requests that carry different tokens for the same path.
    pub fn signed_url(
        &self,
        resource_path: &str,
        ttl_secs: i64,
        custom_claims: serde_json::Map<String, serde_json::Value>,
        key_id: Option<&str>,
    ) -> Result<String, MediaError> {
        let token = self.issue(resource_path, ttl_secs, custom_claims, key_id)?;
        let path = resource_path.trim_start_matches('/');
        let separator = if path.contains('?') { '&' } else { '?' };
        let timestamp = Utc::now().timestamp();
        Ok(format!("/{path}{separator}t={timestamp}&URISigningPackage={token}"))
    }

    /// 토큰 검증
    /// Verify a token against the resource being requested
    ///
    /// Order: syntax -> key lookup -> signature (constant-time compare via
    /// the jsonwebtoken crypto primitive) -> claims parse -> expiry window
    /// -> subject binding. `exp` is strict: a token is dead in its exact
    /// expiry second.
    pub fn verify(
        &self,
        token: &str,
        expected_resource_path: &str,
    ) -> Result<SignedUrlClaims, MediaError> {
        let decoded = token_codec::decode(token)?;
        if decoded.header.alg != "HS256" {
            return Err(MediaError::MalformedToken);
        }

        let secret = self
            .key_store
            .key_for(&decoded.header.kid)
            .ok_or_else(|| MediaError::UnknownSigningKey {
                kid: decoded.header.kid.clone(),
            })?;

        let decoding_key = DecodingKey::from_secret(secret);
        let signature_ok = crypto::verify(
            &decoded.signature_b64,
            decoded.signing_input.as_bytes(),
            &decoding_key,
            Algorithm::HS256,
        )
        .unwrap_or(false);
        if !signature_ok {
            return Err(MediaError::BadSignature);
        }

        let claims: SignedUrlClaims = serde_json::from_slice(&decoded.claims_bytes)
            .map_err(|_| MediaError::MalformedToken)?;

        let now = Utc::now().timestamp();
        if now >= claims.exp || now < claims.nbf {
            return Err(MediaError::TokenExpired);
        }
        if claims.sub != expected_resource_path {
            return Err(MediaError::ResourceMismatch {
                sub: claims.sub,
                expected: expected_resource_path.to_string(),
            });
        }

        Ok(claims)
    }
}
