use strata_matrix::SharedMatrix;

/// Queue entry delivered to a consumer worker.
///
/// Shutdown is its own variant, so an empty matrix is always just data.
#[derive(Debug, Clone)]
pub enum Envelope {
    Data(SharedMatrix),
    Shutdown,
}

impl Envelope {
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Envelope::Shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_matrix::Matrix;

    #[test]
    fn empty_matrix_is_not_shutdown() {
        let env = Envelope::Data(Matrix::sequential(0, 0).into_shared());
        assert!(!env.is_shutdown());
        assert!(Envelope::Shutdown.is_shutdown());
    }
}
