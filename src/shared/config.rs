// Shared configuration: 환경 변수에서 한 번만 로드
// Read once from the environment at startup; invalid signing-key
// configuration is a fatal startup error, never a per-request failure.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use thiserror::Error;

use crate::domains::media::models::MediaFolder;

/// Environment prefix for signing secrets: `CDN_SIGN_KEY0`, `CDN_SIGN_KEY1`, ...
/// The suffix after the prefix is the key id.
const SIGN_KEY_PREFIX: &str = "CDN_SIGN_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    /// 현재 키 ID에 해당하는 시크릿이 없음 (프로세스 시작 불가)
    /// The designated current key id has no secret; the process cannot start
    #[error("no signing key registered for current key id '{id}'")]
    MissingCurrentKey { id: String },

    #[error("no signing keys configured (set CDN_SIGN_KEY0)")]
    NoSigningKeys,

    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 폴더별 캐시 수명 (초)
/// Per-folder cache lifetimes in seconds
///
/// Public defaults: images 1 week, thumbnails 2 weeks, videos 1 year.
/// `s-maxage` is always double `max-age`. Token-protected video gets a short
/// private window instead so range requests stay efficient while exposure
/// after token expiry stays bounded.
#[derive(Debug, Clone)]
pub struct MediaCacheConfig {
    pub images_max_age: u32,
    pub thumbnails_max_age: u32,
    pub videos_max_age: u32,
    pub protected_video_max_age: u32,
}

impl Default for MediaCacheConfig {
    fn default() -> Self {
        Self {
            images_max_age: 604_800,
            thumbnails_max_age: 1_209_600,
            videos_max_age: 31_536_000,
            protected_video_max_age: 30,
        }
    }
}

impl MediaCacheConfig {
    pub fn max_age_for(&self, folder: MediaFolder) -> u32 {
        match folder {
            MediaFolder::Images => self.images_max_age,
            MediaFolder::Thumbnails => self.thumbnails_max_age,
            MediaFolder::Videos => self.videos_max_age,
        }
    }
}

/// 미디어 게이트웨이 설정
/// Media gateway configuration
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Base directory all resolved paths are joined under
    pub uploads_dir: PathBuf,
    /// `iss` claim stamped into issued tokens (informational)
    pub issuer: String,
    /// Key id used for new issuance; older ids stay verifiable while present
    pub current_key_id: String,
    /// key id -> secret bytes, immutable for the process lifetime
    pub signing_keys: HashMap<String, Vec<u8>>,
    /// Folders that require a valid token; requests without one get a 404.
    /// Defaults to all folders. Folders removed from this set are served
    /// publicly with long-lived cache headers and ETag revalidation.
    pub protected_folders: HashSet<MediaFolder>,
    pub cache: MediaCacheConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub media: MediaConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut signing_keys = HashMap::new();
        for (name, value) in std::env::vars() {
            if let Some(id) = name.strip_prefix(SIGN_KEY_PREFIX) {
                // CDN_SIGN_KEY0 -> id "0"; skip unrelated CDN_SIGN_KEY* vars
                // that would yield an empty id or secret
                if !id.is_empty() && !id.contains('_') && !value.is_empty() {
                    signing_keys.insert(id.to_string(), value.into_bytes());
                }
            }
        }
        if signing_keys.is_empty() {
            return Err(ConfigError::NoSigningKeys);
        }

        let current_key_id =
            std::env::var("CDN_CURRENT_KEY_ID").unwrap_or_else(|_| "0".to_string());
        if !signing_keys.contains_key(&current_key_id) {
            return Err(ConfigError::MissingCurrentKey { id: current_key_id });
        }

        let issuer = std::env::var("CDN_SIGN_ISSUER")
            .unwrap_or_else(|_| "origin-sign.infra.cerist.test".to_string());

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public/uploads"));

        // All folders are protected unless explicitly listed as public
        let mut protected_folders: HashSet<MediaFolder> =
            MediaFolder::ALL.into_iter().collect();
        if let Ok(public) = std::env::var("MEDIA_PUBLIC_FOLDERS") {
            for entry in public.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let folder = entry.parse::<MediaFolder>().map_err(|_| {
                    ConfigError::InvalidValue {
                        name: "MEDIA_PUBLIC_FOLDERS".to_string(),
                        value: entry.to_string(),
                    }
                })?;
                protected_folders.remove(&folder);
            }
        }

        let defaults = MediaCacheConfig::default();
        let cache = MediaCacheConfig {
            images_max_age: env_u32("MEDIA_CACHE_IMAGES", defaults.images_max_age)?,
            thumbnails_max_age: env_u32("MEDIA_CACHE_THUMBNAILS", defaults.thumbnails_max_age)?,
            videos_max_age: env_u32("MEDIA_CACHE_VIDEOS", defaults.videos_max_age)?,
            protected_video_max_age: env_u32(
                "MEDIA_CACHE_PROTECTED_VIDEO",
                defaults.protected_video_max_age,
            )?,
        };

        let server = ServerConfig {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("SERVER_PORT") {
                Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "SERVER_PORT".to_string(),
                    value: v,
                })?,
                Err(_) => 3002,
            },
        };

        Ok(Self {
            server,
            media: MediaConfig {
                uploads_dir,
                issuer,
                current_key_id,
                signing_keys,
                protected_folders,
                cache,
            },
        })
    }
}

fn env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: v,
        }),
        Err(_) => Ok(default),
    }
}
