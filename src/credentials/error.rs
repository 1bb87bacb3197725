use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read tenant settings from {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tenant settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("settings store unavailable: {reason}")]
    StoreUnavailable { reason: String },
}
