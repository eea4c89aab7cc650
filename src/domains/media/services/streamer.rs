// 미디어 스트리밍 (조건부 요청 + Range 처리)
// Per-request state machine:
//   resolve -> require/verify token -> cache policy -> conditional -> range
//   -> stream
//
// The file handle is opened only after every validation step passed, read
// through a bounded buffer, and closed by drop on every exit path. A client
// disconnect drops the body stream mid-loop, which releases the handle in
// the same call stack.

use std::collections::HashSet;
use std::io::SeekFrom;

use axum::body::Body;
use axum::http::header::{
    ACCEPT_RANGES, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, EXPIRES,
    IF_NONE_MATCH, LAST_MODIFIED, RANGE, VARY,
};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::domains::media::models::MediaFolder;
use crate::domains::media::services::cache_policy::{self, CachePolicy};
use crate::domains::media::services::resolver::{ResolvedFile, ResourceResolver};
use crate::domains::media::services::signed_url_service::SignedUrlService;
use crate::shared::config::MediaCacheConfig;
use crate::shared::errors::MediaError;

/// Read-loop buffer; memory use per request is O(this) regardless of file size.
const STREAM_BUFFER_SIZE: usize = 64 * 1024;

/// Inclusive byte range within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parse `bytes=<start>-<end>?`. Start is required, end defaults to EOF and
/// is clamped to it. Malformed syntax and unsatisfiable starts both return
/// `None`: the caller degrades to a full 200 rather than erroring.
pub fn parse_range(header: &str, file_len: u64) -> Option<ByteRange> {
    let ranges = header.strip_prefix("bytes=")?;
    let (start_raw, end_raw) = ranges.split_once('-')?;
    let start: u64 = start_raw.trim().parse().ok()?;
    if start >= file_len {
        return None;
    }
    let end = match end_raw.trim() {
        "" => file_len - 1,
        raw => raw.parse::<u64>().ok()?.min(file_len - 1),
    };
    if end < start {
        return None;
    }
    Some(ByteRange { start, end })
}

/// 미디어 스트리머
/// Media streamer
#[derive(Clone)]
pub struct MediaStreamer {
    resolver: ResourceResolver,
    signer: SignedUrlService,
    cache: MediaCacheConfig,
    protected_folders: HashSet<MediaFolder>,
}

impl MediaStreamer {
    pub fn new(
        resolver: ResourceResolver,
        signer: SignedUrlService,
        cache: MediaCacheConfig,
        protected_folders: HashSet<MediaFolder>,
    ) -> Self {
        Self {
            resolver,
            signer,
            cache,
            protected_folders,
        }
    }

    /// Serve one request. Any `Err` maps to the coarse 403/404 responses in
    /// `MediaError`; every success path streams with bounded memory.
    pub async fn serve(
        &self,
        folder_raw: &str,
        filename_raw: &str,
        token: Option<&str>,
        headers: &HeaderMap,
    ) -> Result<Response, MediaError> {
        let resource = ResourceResolver::validate(folder_raw, filename_raw)?;
        let file = self.resolver.resolve(&resource).await?;

        let protected = self.protected_folders.contains(&resource.folder);
        if protected {
            // Absent token -> 404, indistinguishable from a missing file
            let token = token.ok_or(MediaError::FileNotFound)?;
            let claims = self.signer.verify(token, &resource.resource_path())?;
            tracing::debug!(
                sub = %claims.sub,
                exp = claims.exp,
                "signed url token accepted"
            );
        }

        let policy = cache_policy::select(resource.folder, protected, &self.cache);

        // Conditional revalidation only applies to public resources;
        // protected ones must be re-authorized on every access
        let etag = cache_policy::etag_for(file.len, file.modified);
        if policy.revalidatable && if_none_match_hits(headers, &etag) {
            return not_modified(&policy, &etag, &file);
        }

        let range = headers
            .get(RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| parse_range(value, file.len));

        let (status, start, length) = match range {
            Some(range) => (StatusCode::PARTIAL_CONTENT, range.start, range.length()),
            None => (StatusCode::OK, 0, file.len),
        };

        let mut handle = tokio::fs::File::open(&file.path)
            .await
            .map_err(|_| MediaError::FileNotFound)?;
        if start > 0 {
            handle
                .seek(SeekFrom::Start(start))
                .await
                .map_err(|e| MediaError::Internal(format!("seek failed: {e}")))?;
        }
        let body = Body::from_stream(ReaderStream::with_capacity(
            handle.take(length),
            STREAM_BUFFER_SIZE,
        ));

        let mut builder = Response::builder()
            .status(status)
            .header(CONTENT_TYPE, resource.content_type)
            .header(CONTENT_LENGTH, length)
            .header(ACCEPT_RANGES, "bytes")
            .header(CACHE_CONTROL, policy.cache_control_value());
        if let Some(range) = range {
            builder = builder.header(
                CONTENT_RANGE,
                format!("bytes {}-{}/{}", range.start, range.end, file.len),
            );
        }
        if policy.vary_on_token {
            builder = builder.header(VARY, "Authorization");
        }
        if policy.revalidatable {
            builder = builder
                .header(ETAG, format!("\"{etag}\""))
                .header(LAST_MODIFIED, cache_policy::http_date(file.modified))
                .header(EXPIRES, cache_policy::expires_date(policy.max_age));
        }

        builder
            .body(body)
            .map_err(|e| MediaError::Internal(format!("failed to build response: {e}")))
    }
}

fn if_none_match_hits(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().trim_matches('"') == etag)
        .unwrap_or(false)
}

fn not_modified(
    policy: &CachePolicy,
    etag: &str,
    file: &ResolvedFile,
) -> Result<Response, MediaError> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(CACHE_CONTROL, policy.cache_control_value())
        .header(ETAG, format!("\"{etag}\""))
        .header(LAST_MODIFIED, cache_policy::http_date(file.modified))
        .body(Body::empty())
        .map_err(|e| MediaError::Internal(format!("failed to build response: {e}")))
}
