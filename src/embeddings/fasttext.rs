// fasttext.rs — FastText k-mer backend.
//
// Known k-mers use their trained vector. Unknown k-mers are composed from
// character n-grams: "<kmer>" is cut into n-grams of min_n..=max_n chars,
// each hashed (FNV-1a, signed-char variant) into one of B buckets, and the
// bucket vectors are averaged.

use std::path::Path;

use anyhow::Context;
use candle_core::{Device, Tensor};

use super::embedding::{Embedder, Embedding};
use super::kmer::{gather_rows, KmerModelConfig, KmerTables};
use super::sequence_prep::padded_kmers;
use crate::config;

pub struct FastTextEmbedder {
    config: KmerModelConfig,
    tables: KmerTables,
    buckets: usize,
}

impl FastTextEmbedder {
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let config = KmerModelConfig::load(model_dir)?;
        let tables = KmerTables::load(model_dir, &Device::Cpu)?;
        let buckets = match &tables.ngrams {
            Some(ngrams) => ngrams.dims2()?.0,
            None => {
                log::warn!(
                    "FastText model at {} has no n-gram table; unknown k-mers will be zero",
                    model_dir.display()
                );
                0
            }
        };

        log::info!(
            "Loaded fasttext model from {}: vocab={}, buckets={}, dims={}, n={}..={}",
            model_dir.display(),
            tables.vocab.len(),
            buckets,
            tables.dims,
            config.min_n,
            config.max_n,
        );

        Ok(Self {
            config,
            tables,
            buckets,
        })
    }

    /// Vector for a single k-mer, composing it from n-grams if it is out of vocabulary.
    fn kmer_vector(&self, kmer: &str) -> anyhow::Result<Tensor> {
        if let Some(&id) = self.tables.vocab.get(kmer) {
            return Ok(self.tables.vectors.get(id as usize)?);
        }

        let ngrams = match &self.tables.ngrams {
            Some(t) => t,
            None => return Ok(Tensor::zeros(self.tables.dims, candle_core::DType::F32, &Device::Cpu)?),
        };
        let buckets = ngram_buckets(kmer, self.config.min_n, self.config.max_n, self.buckets);
        if buckets.is_empty() {
            return Ok(Tensor::zeros(self.tables.dims, candle_core::DType::F32, &Device::Cpu)?);
        }

        let ids: Vec<Option<u32>> = buckets.into_iter().map(Some).collect();
        let rows = gather_rows(ngrams, &ids)?;
        Ok(rows.mean(0)?)
    }
}

impl Embedder for FastTextEmbedder {
    fn name(&self) -> &str {
        "fasttext"
    }

    fn dims(&self) -> usize {
        self.tables.dims
    }

    fn embed(&self, sequence: &str) -> anyhow::Result<Embedding> {
        let kmers = padded_kmers(sequence, self.config.kmer_size, self.config.pad);
        if kmers.is_empty() {
            return Embedding::new(Tensor::zeros((0, self.tables.dims), candle_core::DType::F32, &Device::Cpu)?);
        }
        let rows = kmers
            .iter()
            .map(|kmer| self.kmer_vector(kmer).with_context(|| format!("embed k-mer {kmer:?}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Embedding::new(Tensor::stack(&rows, 0)?)
    }
}

/// FastText's 32-bit FNV-1a over bytes interpreted as signed chars.
pub fn ft_hash(bytes: &[u8]) -> u32 {
    let mut h = config::kmer::FNV_OFFSET_BASIS;
    for &b in bytes {
        h ^= b as i8 as u32;
        h = h.wrapping_mul(config::kmer::FNV_PRIME);
    }
    h
}

/// Bucket ids of all character n-grams of `<word>` with length in `min_n..=max_n`.
///
/// n counts characters; each n-gram is hashed over its UTF-8 bytes.
pub fn ngram_buckets(word: &str, min_n: usize, max_n: usize, buckets: usize) -> Vec<u32> {
    if buckets == 0 {
        return Vec::new();
    }
    let extended = format!("<{word}>");
    // Byte offset of every char start, plus the end of the string.
    let bounds: Vec<usize> = extended
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(extended.len()))
        .collect();
    let chars = bounds.len() - 1;

    let mut out = Vec::new();
    for n in min_n..=max_n.min(chars) {
        for start in 0..=chars - n {
            let ngram = &extended.as_bytes()[bounds[start]..bounds[start + n]];
            let bucket = ft_hash(ngram) as usize % buckets;
            out.push(bucket as u32);
        }
    }
    out
}
