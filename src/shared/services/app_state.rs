use anyhow::Result;

use crate::domains::media::services::MediaState;
use crate::shared::config::Config;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// The gateway's only shared state is read-only configuration and signing
/// keys, so requests run in parallel without synchronization.
#[derive(Clone)]
pub struct AppState {
    pub media_state: MediaState,
}

impl AppState {
    /// Create AppState from startup configuration
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(config: &Config) -> Result<Self> {
        let media_state = MediaState::new(&config.media)?;
        Ok(Self { media_state })
    }
}
