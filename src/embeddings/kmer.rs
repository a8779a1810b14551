// kmer.rs — Shared loading for k-mer lookup-table backends (Word2Vec, FastText).
//
// Model directory layout:
//   config.json        { "kmer_size": 3, "pad": "-", "min_n": 3, "max_n": 6 }  (all optional)
//   vocab.json         ["-AC", "ACD", ...]   position i == row i of `vectors`
//   model.safetensors  vectors [V, D] f32, optionally ngrams [B, D] f32

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context};
use candle_core::{DType, Device, Tensor};
use safetensors::SafeTensors;
use serde::Deserialize;

use crate::config;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KmerModelConfig {
    pub kmer_size: usize,
    pub pad: char,
    pub min_n: usize,
    pub max_n: usize,
}

impl Default for KmerModelConfig {
    fn default() -> Self {
        Self {
            kmer_size: config::kmer::DEFAULT_KMER_SIZE,
            pad: config::kmer::DEFAULT_PAD,
            min_n: config::kmer::DEFAULT_MIN_N,
            max_n: config::kmer::DEFAULT_MAX_N,
        }
    }
}

impl KmerModelConfig {
    /// Read `config.json` from the model directory; a missing file means defaults.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let path = model_dir.join(config::model_files::CONFIG_JSON);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.kmer_size == 0 {
            bail!("kmer_size must be at least 1");
        }
        if self.min_n == 0 || self.min_n > self.max_n {
            bail!("invalid n-gram range {}..={}", self.min_n, self.max_n);
        }
        Ok(())
    }
}

/// Vocabulary plus its vector table, and the optional n-gram bucket table.
pub struct KmerTables {
    pub vocab: HashMap<String, u32>,
    pub vectors: Tensor,
    pub ngrams: Option<Tensor>,
    pub dims: usize,
}

impl KmerTables {
    pub fn load(model_dir: &Path, device: &Device) -> anyhow::Result<Self> {
        let vocab_path = model_dir.join(config::model_files::VOCAB_JSON);
        let vocab_str = std::fs::read_to_string(&vocab_path)
            .with_context(|| format!("read {}", vocab_path.display()))?;
        let words: Vec<String> = serde_json::from_str(&vocab_str)
            .with_context(|| format!("parse {}", vocab_path.display()))?;

        let weights_path = model_dir.join(config::model_files::WEIGHTS);
        let bytes = std::fs::read(&weights_path)
            .with_context(|| format!("read {}", weights_path.display()))?;
        let st = SafeTensors::deserialize(&bytes)
            .with_context(|| format!("parse safetensors {}", weights_path.display()))?;

        let vectors = read_matrix(&st, config::kmer::VECTORS_TENSOR, device)?
            .with_context(|| format!("{} has no `{}` tensor", weights_path.display(), config::kmer::VECTORS_TENSOR))?;
        let (rows, dims) = vectors.dims2()?;
        if rows != words.len() {
            bail!("vocab has {} entries but vector table has {} rows", words.len(), rows);
        }

        let ngrams = read_matrix(&st, config::kmer::NGRAMS_TENSOR, device)?;
        if let Some(ngrams) = &ngrams {
            let (_, width) = ngrams.dims2()?;
            if width != dims {
                bail!("n-gram table width {} does not match vector width {}", width, dims);
            }
        }

        let mut vocab = HashMap::with_capacity(words.len());
        for (i, word) in words.into_iter().enumerate() {
            let id = u32::try_from(i).context("vocabulary too large")?;
            if vocab.insert(word.clone(), id).is_some() {
                bail!("duplicate k-mer in vocabulary: {word}");
            }
        }

        Ok(Self {
            vocab,
            vectors,
            ngrams,
            dims,
        })
    }
}

/// Load an f32 rank-2 tensor by name; `Ok(None)` if absent.
fn read_matrix(st: &SafeTensors<'_>, name: &str, device: &Device) -> anyhow::Result<Option<Tensor>> {
    let view = match st.tensor(name) {
        Ok(view) => view,
        Err(safetensors::SafeTensorError::TensorNotFound(_)) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read tensor `{name}`")),
    };
    if view.dtype() != safetensors::Dtype::F32 {
        bail!("tensor `{}` must be F32, got {:?}", name, view.dtype());
    }
    if view.shape().len() != 2 {
        bail!("tensor `{}` must be rank 2, got shape {:?}", name, view.shape());
    }
    let tensor = Tensor::from_raw_buffer(view.data(), DType::F32, view.shape(), device)
        .with_context(|| format!("build tensor `{name}`"))?;
    Ok(Some(tensor))
}

/// Gather rows of `table` for `ids`; `None` ids become zero rows.
pub fn gather_rows(table: &Tensor, ids: &[Option<u32>]) -> anyhow::Result<Tensor> {
    let device = table.device();
    let index: Vec<u32> = ids.iter().map(|id| id.unwrap_or(0)).collect();
    let mask: Vec<f32> = ids.iter().map(|id| if id.is_some() { 1.0 } else { 0.0 }).collect();

    let index_t = Tensor::new(index.as_slice(), device)?;
    let mask_t = Tensor::new(mask.as_slice(), device)?.unsqueeze(1)?;

    let rows = table.index_select(&index_t, 0)?;
    Ok(rows.broadcast_mul(&mask_t)?)
}
