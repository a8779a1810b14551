// lib.rs — seqfeat: fixed-length feature vectors for biological sequences.
//
// A pretrained per-residue embedding backend is injected into a
// FeatureExtractor, which validates each sequence, embeds it and mean-pools
// the rows. Backends: Word2Vec and FastText k-mer tables, and a ProtBert-style
// encoder run with candle. Anything implementing `Embedder` works.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod features;
pub mod logging;

pub use embeddings::{load_backend, BackendKind, Embedder, Embedding};
pub use error::FeatureError;
pub use features::{FeatureExtractor, FeatureVector};
