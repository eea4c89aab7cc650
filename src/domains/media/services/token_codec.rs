// 토큰 인코딩/디코딩 (서명 검증 없음)
// Compact token codec: three URL-safe base64 JSON segments joined by '.'.
// Decoding is purely syntactic; signature verification lives in
// SignedUrlService so the whole verification path stays in one place.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::domains::media::models::TokenHeader;
use crate::shared::errors::MediaError;

/// Syntactically decoded token. `signing_input` is the first two segments
/// exactly as transmitted, so the verifier recomputes the HMAC over the same
/// bytes the issuer signed.
#[derive(Debug)]
pub struct DecodedToken {
    pub header: TokenHeader,
    pub claims_bytes: Vec<u8>,
    pub signing_input: String,
    pub signature_b64: String,
}

/// Serialize header and claims, sign `header.claims` with `sign`, and append
/// the base64url signature as the third segment. `sign` receives the exact
/// signing input and must return a base64url-encoded signature.
pub fn encode<F>(header: &TokenHeader, claims_json: &[u8], sign: F) -> Result<String, MediaError>
where
    F: FnOnce(&str) -> Result<String, MediaError>,
{
    let header_json = serde_json::to_vec(header)
        .map_err(|e| MediaError::Internal(format!("failed to serialize token header: {e}")))?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = sign(&signing_input)?;
    Ok(format!("{signing_input}.{signature}"))
}

/// Split into exactly three non-empty segments and base64-decode header and
/// claims. Any syntactic failure collapses to `MalformedToken`; a token is
/// never partially parsed.
pub fn decode(token: &str) -> Result<DecodedToken, MediaError> {
    let mut segments = token.split('.');
    let (Some(header_seg), Some(claims_seg), Some(signature_seg), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(MediaError::MalformedToken);
    };
    if header_seg.is_empty() || claims_seg.is_empty() || signature_seg.is_empty() {
        return Err(MediaError::MalformedToken);
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_seg)
        .map_err(|_| MediaError::MalformedToken)?;
    let header: TokenHeader =
        serde_json::from_slice(&header_bytes).map_err(|_| MediaError::MalformedToken)?;
    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_seg)
        .map_err(|_| MediaError::MalformedToken)?;

    Ok(DecodedToken {
        header,
        claims_bytes,
        signing_input: format!("{header_seg}.{claims_seg}"),
        signature_b64: signature_seg.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_token() -> String {
        encode(&TokenHeader::hs256("0"), br#"{"sub":"/uploads/images/a.jpg"}"#, |_| {
            Ok("c2ln".to_string())
        })
        .unwrap()
    }

    #[test]
    fn round_trip_preserves_segments() {
        let token = valid_token();
        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.header.alg, "HS256");
        assert_eq!(decoded.header.kid, "0");
        assert_eq!(decoded.claims_bytes, br#"{"sub":"/uploads/images/a.jpg"}"#);
        assert_eq!(decoded.signature_b64, "c2ln");
        assert_eq!(
            format!("{}.{}", decoded.signing_input, decoded.signature_b64),
            token
        );
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.b.c.d.e"] {
            assert!(matches!(decode(token), Err(MediaError::MalformedToken)));
        }
    }

    #[test]
    fn empty_segments_are_malformed() {
        for token in [".b.c", "a..c", "a.b.", "..", "a.."] {
            assert!(matches!(decode(token), Err(MediaError::MalformedToken)));
        }
    }

    #[test]
    fn non_base64_and_non_json_are_malformed() {
        // '!' is not in the base64url alphabet
        assert!(matches!(decode("!!.b.c"), Err(MediaError::MalformedToken)));
        // valid base64 but not a JSON header object
        let junk = URL_SAFE_NO_PAD.encode("not-json");
        assert!(matches!(
            decode(&format!("{junk}.{junk}.sig")),
            Err(MediaError::MalformedToken)
        ));
    }
}
