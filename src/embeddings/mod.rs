// embeddings/ — Per-residue embedding backends.
//
// Provides:
// - The Embedder capability and the Embedding matrix
// - k-mer lookup backends (Word2Vec, FastText) and a BERT protein language model
// - Backend selection and model download + SHA256 verification

pub mod backend;
pub mod download;
pub mod embedding;
pub mod fasttext;
pub mod kmer;
pub mod protbert;
pub mod sequence_prep;
pub mod word2vec;

pub use backend::{load_backend, BackendKind};
pub use embedding::{Embedder, Embedding};
