// 캐시 정책 선택
// Cache policy selection: a pure function of (folder, token-protected).
//
// Protected images/thumbnails are never cached; every access must be
// re-authorized. Protected video keeps a short private window because
// disabling caching outright defeats range-request efficiency for large
// files, while the short window bounds exposure after token expiry. Public
// folders get long-lived headers with ETag revalidation.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use crate::domains::media::models::MediaFolder;
use crate::shared::config::MediaCacheConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Per-request cache decision; never stored.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub max_age: u32,
    pub s_max_age: u32,
    pub visibility: Visibility,
    /// Vary on the authorization-bearing input (protected video only)
    pub vary_on_token: bool,
    /// Whether the response carries ETag/Last-Modified/Expires and honors
    /// conditional revalidation
    pub revalidatable: bool,
}

impl CachePolicy {
    pub fn cache_control_value(&self) -> String {
        match self.visibility {
            Visibility::Public => format!(
                "public, max-age={}, s-maxage={}",
                self.max_age, self.s_max_age
            ),
            Visibility::Private if self.max_age == 0 => {
                "private, no-cache, max-age=0".to_string()
            }
            Visibility::Private => format!("private, max-age={}", self.max_age),
        }
    }
}

pub fn select(folder: MediaFolder, token_protected: bool, cache: &MediaCacheConfig) -> CachePolicy {
    if token_protected {
        let max_age = match folder {
            MediaFolder::Videos => cache.protected_video_max_age,
            MediaFolder::Images | MediaFolder::Thumbnails => 0,
        };
        CachePolicy {
            max_age,
            s_max_age: 0,
            visibility: Visibility::Private,
            vary_on_token: folder == MediaFolder::Videos,
            revalidatable: false,
        }
    } else {
        let max_age = cache.max_age_for(folder);
        CachePolicy {
            max_age,
            s_max_age: max_age.saturating_mul(2),
            visibility: Visibility::Public,
            vary_on_token: false,
            revalidatable: true,
        }
    }
}

/// ETag from modification time and size: cheap, no hashing of file bodies.
pub fn etag_for(len: u64, modified: SystemTime) -> String {
    let mtime = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut hasher = Sha256::new();
    hasher.update(format!("{mtime}{len}"));
    format!("{:x}", hasher.finalize())
}

/// RFC 7231 IMF-fixdate, for Last-Modified
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Expires header value `max_age` seconds from now
pub fn expires_date(max_age: u32) -> String {
    (Utc::now() + Duration::seconds(i64::from(max_age)))
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
