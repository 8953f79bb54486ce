//! Error types for the anofox-cluster library.

use thiserror::Error;

/// Result type alias for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors that can occur during clustering operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Empty-cluster repair did not terminate within the allowed attempts.
    #[error("could not repopulate empty clusters after {attempts} attempts")]
    EmptyCluster { attempts: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ClusterError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ClusterError::InvalidParameter("n_clusters must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid parameter: n_clusters must be positive"
        );

        let err = ClusterError::DimensionMismatch {
            expected: 8,
            got: 6,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 8, got 6");

        let err = ClusterError::EmptyCluster { attempts: 3 };
        assert_eq!(
            err.to_string(),
            "could not repopulate empty clusters after 3 attempts"
        );

        let err = ClusterError::FitRequired;
        assert_eq!(err.to_string(), "model must be fitted before prediction");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ClusterError::EmptyCluster { attempts: 2 };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
