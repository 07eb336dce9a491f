#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("bounded queue capacity must be at least 1")]
    ZeroCapacity,
}
