use std::path::Path;

/// Every way a signing run can fail. All variants are terminal.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("Cannot read private key: {0}")]
    KeyUnreadable(String),
    #[error("Cannot parse private key: {0}")]
    KeyMalformed(String),
    #[error("Cannot initialize signing: {0}")]
    ContextInitFailed(String),
    #[error("Cannot update signing data: {0}")]
    SignUpdateFailed(String),
    #[error("Cannot finalize signature: {0}")]
    SignFinalizeFailed(String),
    #[error("Cannot read payload: {0}")]
    SourceUnreadable(String),
    #[error("Cannot write signature: {0}")]
    SinkUnwritable(String),
}

impl SignerError {
    pub(crate) fn key_unreadable(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::KeyUnreadable(format!("{}: {err}", path.display()))
    }

    pub(crate) fn source_unreadable(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::SourceUnreadable(format!("{}: {err}", path.display()))
    }

    pub(crate) fn sink_unwritable(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::SinkUnwritable(format!("{}: {err}", path.display()))
    }
}

pub type Result<T, E = SignerError> = std::result::Result<T, E>;
