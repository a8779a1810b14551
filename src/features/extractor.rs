// extractor.rs — Mean-pooled feature extraction over an injected backend.
//
// Each sequence is validated, embedded, checked for one row per residue,
// then reduced to a single vector by column-wise mean. The first failure
// aborts the call; no partial output is returned.

use crate::embeddings::Embedder;
use crate::error::FeatureError;

/// Column-wise mean of one sequence's embedding; length == backend dims.
pub type FeatureVector = Vec<f32>;

/// Converts sequences into fixed-length pooled feature vectors.
pub struct FeatureExtractor<E> {
    embedder: E,
}

impl<E: Embedder> FeatureExtractor<E> {
    pub fn new(embedder: E) -> Self {
        log::info!(
            "Feature extractor ready: backend={}, dims={}",
            embedder.name(),
            embedder.dims()
        );
        Self { embedder }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Length of every feature vector this extractor produces.
    pub fn dims(&self) -> usize {
        self.embedder.dims()
    }

    /// One feature vector per input sequence, in input order.
    pub fn extract_features<S: AsRef<str>>(
        &self,
        sequences: &[S],
    ) -> Result<Vec<FeatureVector>, FeatureError> {
        let mut features = Vec::with_capacity(sequences.len());
        for (index, seq) in sequences.iter().enumerate() {
            features.push(self.extract_feature(index, seq.as_ref())?);
        }
        log::debug!("Extracted {} feature vectors with {}", features.len(), self.embedder.name());
        Ok(features)
    }

    /// Validate, embed and pool a single sequence. `index` is reported in errors.
    pub fn extract_feature(&self, index: usize, sequence: &str) -> Result<FeatureVector, FeatureError> {
        let residues = sequence.chars().count();
        if residues == 0 {
            return Err(FeatureError::InvalidInput { index });
        }

        let embedding = self
            .embedder
            .embed(sequence)
            .map_err(|source| FeatureError::Backend { index, source })?;

        if embedding.rows() != residues {
            return Err(FeatureError::Consistency {
                index,
                expected: residues,
                actual: embedding.rows(),
            });
        }

        log::debug!(
            "Embedded sequence #{} ({} residues, width {})",
            index,
            residues,
            embedding.width()
        );

        embedding
            .mean_pool()
            .map_err(|source| FeatureError::Backend { index, source })
    }
}
