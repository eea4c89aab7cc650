use serde::{Deserialize, Serialize};

/// Compact token header. Always `{alg: "HS256", kid, typ: "JWT"}`; the `kid`
/// selects the signing secret so keys can rotate without killing every
/// outstanding token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub kid: String,
    pub typ: String,
}

impl TokenHeader {
    pub fn hs256(kid: impl Into<String>) -> Self {
        Self {
            alg: "HS256".to_string(),
            kid: kid.into(),
            typ: "JWT".to_string(),
        }
    }
}

/// 서명된 URL 토큰의 클레임
/// Claims carried by a signed URL token
///
/// `sub` is the exact resource path the token authorizes. Custom claims
/// (`uid`, `allowedIpRange`, ...) are flattened in; reserved names always win
/// at issuance so a caller cannot forge its own expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlClaims {
    /// Issuer (informational)
    pub iss: String,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Not-before (Unix seconds)
    pub nbf: i64,
    /// Expiry (Unix seconds); the token is dead in its exact expiry second
    pub exp: i64,
    /// Resource path this token authorizes, e.g. `/uploads/videos/x.mp4`
    pub sub: String,
    /// Custom claims merged in at issuance time
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Claim names a caller may never override at issuance.
pub const RESERVED_CLAIMS: [&str; 5] = ["iss", "iat", "nbf", "exp", "sub"];
