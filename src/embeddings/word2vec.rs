// word2vec.rs — Word2Vec k-mer backend.
//
// Each residue is represented by the vector of its centred k-mer.
// k-mers missing from the vocabulary contribute a zero row.

use std::path::Path;

use candle_core::Device;

use super::embedding::{Embedder, Embedding};
use super::kmer::{gather_rows, KmerModelConfig, KmerTables};
use super::sequence_prep::padded_kmers;

pub struct Word2VecEmbedder {
    config: KmerModelConfig,
    tables: KmerTables,
}

impl Word2VecEmbedder {
    /// Load from a k-mer model directory (vocab.json, model.safetensors, optional config.json).
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let config = KmerModelConfig::load(model_dir)?;
        let tables = KmerTables::load(model_dir, &Device::Cpu)?;

        log::info!(
            "Loaded word2vec model from {}: vocab={}, dims={}, k={}",
            model_dir.display(),
            tables.vocab.len(),
            tables.dims,
            config.kmer_size,
        );

        Ok(Self { config, tables })
    }

    pub fn vocab_size(&self) -> usize {
        self.tables.vocab.len()
    }
}

impl Embedder for Word2VecEmbedder {
    fn name(&self) -> &str {
        "word2vec"
    }

    fn dims(&self) -> usize {
        self.tables.dims
    }

    fn embed(&self, sequence: &str) -> anyhow::Result<Embedding> {
        let ids: Vec<Option<u32>> = padded_kmers(sequence, self.config.kmer_size, self.config.pad)
            .iter()
            .map(|kmer| self.tables.vocab.get(kmer).copied())
            .collect();
        Embedding::new(gather_rows(&self.tables.vectors, &ids)?)
    }
}
