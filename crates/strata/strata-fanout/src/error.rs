use strata_queue::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum FanoutError {
    #[error("consumer '{consumer}' has been stopped")]
    Stopped { consumer: &'static str },

    #[error("failed to spawn worker thread for '{consumer}'")]
    Spawn {
        consumer: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid queue config")]
    Queue(#[from] QueueError),
}
