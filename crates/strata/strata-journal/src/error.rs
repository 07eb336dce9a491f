#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("failed to spawn journal writer thread")]
    Spawn(#[source] std::io::Error),

    #[error("unknown log level '{0}'")]
    UnknownLevel(String),
}
