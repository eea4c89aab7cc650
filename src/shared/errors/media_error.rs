use axum::http::StatusCode;
use thiserror::Error;

/// 미디어 게이트웨이 에러
/// Media gateway errors
///
/// Every variant is a local, recoverable condition. The client-visible
/// response is deliberately coarse (see `status_code`/`public_message`);
/// the specific variant is only ever logged.
#[derive(Error, Debug)]
pub enum MediaError {
    /// 잘못된 형식의 토큰
    /// Token does not parse as three base64url JSON segments
    #[error("malformed token")]
    MalformedToken,

    /// 알 수 없는 서명 키
    /// Token names a key id that is not in the store
    #[error("unknown signing key: kid={kid}")]
    UnknownSigningKey { kid: String },

    /// 서명 불일치
    /// Recomputed HMAC does not match the transmitted signature
    #[error("token signature mismatch")]
    BadSignature,

    /// 만료된 토큰
    /// Now is outside the token's [nbf, exp) window
    #[error("token expired or not yet valid")]
    TokenExpired,

    /// 토큰이 다른 리소스에 바인딩됨
    /// Token subject does not match the requested resource
    #[error("token bound to '{sub}', requested '{expected}'")]
    ResourceMismatch { sub: String, expected: String },

    /// 허용되지 않은 폴더
    /// Folder is not in the whitelist
    #[error("invalid folder: {folder}")]
    InvalidFolder { folder: String },

    /// 경로 탐색 시도
    /// Filename attempts to escape the uploads root
    #[error("path traversal attempt: {filename}")]
    PathTraversal { filename: String },

    /// 파일 없음
    /// File not found on disk
    #[error("file not found")]
    FileNotFound,

    /// 지원하지 않는 파일 형식
    /// Extension is not in the content-type table
    #[error("unsupported file type: .{extension}")]
    UnsupportedType { extension: String },

    /// 내부 서버 에러
    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Authorization failures collapse to 403, resolution failures to 404.
    /// The two families are kept indistinguishable within themselves so a
    /// probing client cannot tell "missing" from "rejected" or learn which
    /// token check failed.
    pub fn status_code(&self) -> StatusCode {
        match self {
            MediaError::MalformedToken
            | MediaError::UnknownSigningKey { .. }
            | MediaError::BadSignature
            | MediaError::TokenExpired
            | MediaError::ResourceMismatch { .. } => StatusCode::FORBIDDEN,

            MediaError::InvalidFolder { .. }
            | MediaError::PathTraversal { .. }
            | MediaError::FileNotFound
            | MediaError::UnsupportedType { .. } => StatusCode::NOT_FOUND,

            MediaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short plain-text body; never echoes which check failed.
    pub fn public_message(&self) -> &'static str {
        let status = self.status_code();
        if status == StatusCode::FORBIDDEN {
            "Forbidden"
        } else if status == StatusCode::NOT_FOUND {
            "Not Found"
        } else {
            "Internal Server Error"
        }
    }
}

/// MediaError를 HTTP 응답으로 변환
impl From<MediaError> for (StatusCode, String) {
    fn from(err: MediaError) -> Self {
        (err.status_code(), err.public_message().to_string())
    }
}
