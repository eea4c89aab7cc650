use std::collections::HashMap;

use crate::shared::config::ConfigError;

/// 서명 키 저장소
/// Signing key store: key id -> secret bytes
///
/// Built once at startup and immutable afterwards, so issuance and
/// verification can run concurrently without locking. Multiple keys allow
/// rotation: new tokens are signed with the current key while tokens signed
/// with a retiring key stay verifiable for as long as its id is registered.
#[derive(Debug, Clone)]
pub struct SigningKeyStore {
    current_key_id: String,
    keys: HashMap<String, Vec<u8>>,
}

impl SigningKeyStore {
    /// Fails if the designated current key id has no secret; callers treat
    /// that as a fatal startup error.
    pub fn new(
        current_key_id: impl Into<String>,
        keys: HashMap<String, Vec<u8>>,
    ) -> Result<Self, ConfigError> {
        let current_key_id = current_key_id.into();
        if !keys.contains_key(&current_key_id) {
            return Err(ConfigError::MissingCurrentKey {
                id: current_key_id,
            });
        }
        Ok(Self {
            current_key_id,
            keys,
        })
    }

    pub fn current_key_id(&self) -> &str {
        &self.current_key_id
    }

    pub fn key_for(&self, id: &str) -> Option<&[u8]> {
        self.keys.get(id).map(Vec::as_slice)
    }
}
