// Media domain state
// 미디어 도메인 상태
use std::sync::Arc;

use crate::domains::media::services::key_store::SigningKeyStore;
use crate::domains::media::services::resolver::ResourceResolver;
use crate::domains::media::services::signed_url_service::SignedUrlService;
use crate::domains::media::services::streamer::MediaStreamer;
use crate::shared::config::{ConfigError, MediaConfig};

/// Media domain state
/// 미디어 도메인에서 필요한 서비스들을 포함하는 상태
///
/// Everything here is immutable after startup, so requests share it across
/// tasks without locking.
#[derive(Clone)]
pub struct MediaState {
    pub signer: SignedUrlService,
    pub streamer: Arc<MediaStreamer>,
}

impl MediaState {
    /// Create MediaState from configuration
    /// 설정으로부터 MediaState 생성 (현재 키가 없으면 시작 실패)
    pub fn new(config: &MediaConfig) -> Result<Self, ConfigError> {
        let key_store = Arc::new(SigningKeyStore::new(
            config.current_key_id.clone(),
            config.signing_keys.clone(),
        )?);
        let signer = SignedUrlService::new(config.issuer.clone(), key_store);
        let resolver = ResourceResolver::new(config.uploads_dir.clone());
        let streamer = Arc::new(MediaStreamer::new(
            resolver,
            signer.clone(),
            config.cache.clone(),
            config.protected_folders.clone(),
        ));
        Ok(Self { signer, streamer })
    }

    /// Internal issuance API for the CRUD layer: mint a signed URL for a
    /// protected media file when rendering a page that references it.
    /// Returns `None` (never an error) when the folder/filename fail
    /// validation or signing is misconfigured; validation here is purely
    /// syntactic and does not touch the filesystem.
    pub fn issue_signed_url(
        &self,
        folder: &str,
        filename: &str,
        ttl_secs: i64,
        custom_claims: serde_json::Map<String, serde_json::Value>,
    ) -> Option<String> {
        let resource = match ResourceResolver::validate(folder, filename) {
            Ok(resource) => resource,
            Err(err) => {
                tracing::warn!(%folder, %filename, reason = %err, "refusing to sign url");
                return None;
            }
        };
        match self
            .signer
            .signed_url(&resource.resource_path(), ttl_secs, custom_claims, None)
        {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::error!(%folder, %filename, reason = %err, "failed to sign url");
                None
            }
        }
    }
}
