//! Failure taxonomy for the mesh.
//!
//! Only transport problems and API misuse are errors. Malformed shared
//! state never is: an unreadable registry decodes as empty and an
//! unreadable counter reads as zero, because a fresh medium and a corrupt
//! one must look the same to a starting process.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store watch error: {0}")]
    Watch(String),

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("window already registered")]
    AlreadyRegistered,

    #[error("window not registered")]
    NotRegistered,

    #[error("window was deregistered")]
    Deregistered,

    #[error("metadata serialization error: {0}")]
    Meta(#[from] serde_json::Error),
}
