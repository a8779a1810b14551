use thiserror::Error;

/// Failure of a feature extraction call.
///
/// Every variant aborts the whole call; no partial output is returned.
/// `index` is the position of the offending sequence in the input.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A sequence with zero residues was supplied.
    #[error("empty sequence detected at index {index}")]
    InvalidInput { index: usize },

    /// The backend returned an embedding whose row count differs from the residue count.
    #[error("sequence length mismatch at index {index}: {expected} residues vs {actual} embedding rows")]
    Consistency {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// The backend itself failed (model inference, tensor ops).
    #[error("embedding backend failed at index {index}")]
    Backend {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
}

impl FeatureError {
    pub fn index(&self) -> usize {
        match self {
            FeatureError::InvalidInput { index }
            | FeatureError::Consistency { index, .. }
            | FeatureError::Backend { index, .. } => *index,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, FeatureError::InvalidInput { .. })
    }

    pub fn is_consistency(&self) -> bool {
        matches!(self, FeatureError::Consistency { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_sequence() {
        let err = FeatureError::InvalidInput { index: 2 };
        assert_eq!(err.to_string(), "empty sequence detected at index 2");
        assert!(err.is_invalid_input());

        let err = FeatureError::Consistency { index: 0, expected: 3, actual: 2 };
        assert_eq!(
            err.to_string(),
            "sequence length mismatch at index 0: 3 residues vs 2 embedding rows"
        );
        assert!(err.is_consistency());
        assert_eq!(err.index(), 0);
    }

    #[test]
    fn test_backend_error_keeps_source_chain() {
        let err = FeatureError::Backend {
            index: 4,
            source: anyhow::anyhow!("tokenize: bad input"),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("tokenize: bad input"));
        assert_eq!(err.index(), 4);
        assert!(!err.is_consistency());
    }
}
