// features/ — Fixed-length feature vectors from per-residue embeddings.

pub mod extractor;

pub use extractor::{FeatureExtractor, FeatureVector};
