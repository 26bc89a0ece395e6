use crate::errors::CoreError;
use crate::models::state::FinanceState;

use super::encryption::{self, KdfParams};
use super::format;

/// Password-protected, portable snapshot of a user's four collections.
pub struct BackupManager;

impl BackupManager {
    /// FinanceState → JSON → AES-256-GCM(Argon2id(password)) → SFBK bytes
    pub fn save_to_bytes(state: &FinanceState, password: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_with_params(state, password, &KdfParams::default())
    }

    /// Same as [`save_to_bytes`](Self::save_to_bytes) with explicit KDF costs.
    pub fn save_with_params(
        state: &FinanceState,
        password: &str,
        params: &KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        let plaintext = serde_json::to_vec(state)
            .map_err(|e| CoreError::Serialization(format!("Failed to encode backup: {e}")))?;
        let sealed = encryption::seal(&plaintext, password, params)?;
        Ok(format::encode(params, &sealed))
    }

    /// SFBK bytes → header → Argon2id(password, salt) → decrypt → FinanceState
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<FinanceState, CoreError> {
        let (header, sealed) = format::decode(data)?;
        let plaintext = encryption::open(&sealed, password, &header.kdf_params)?;
        serde_json::from_slice(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to decode backup: {e}")))
    }

    /// Write a backup file (native only).
    pub fn save_to_file(state: &FinanceState, path: &str, password: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(state, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load_from_file(path: &str, password: &str) -> Result<FinanceState, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
