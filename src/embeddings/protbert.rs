// protbert.rs — Candle BERT protein language model backend.
//
// Loads a ProtBert-style encoder from safetensors and returns the last hidden
// state per residue. The tokenizer adds [CLS] and [SEP]; those rows are
// dropped so the matrix has exactly one row per residue.

use std::path::Path;

use anyhow::{bail, Context};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use super::embedding::{Embedder, Embedding};
use super::sequence_prep::prepare_protbert_text;
use crate::config;

/// Holds the loaded encoder and tokenizer.
pub struct ProtBertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    max_residues: usize,
}

impl ProtBertEmbedder {
    /// Load the model from a local directory containing model.safetensors,
    /// tokenizer.json, and config.json.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let device = Device::Cpu;

        let config_path = model_dir.join(config::model_files::CONFIG_JSON);
        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("read {}", config_path.display()))?;
        let bert_config: BertConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("parse {}", config_path.display()))?;

        // BertConfig keeps its fields private; read the two we need from the raw JSON.
        let raw: serde_json::Value = serde_json::from_str(&config_str)?;
        let hidden_size = json_usize(&raw, "hidden_size")?;
        let max_positions = json_usize(&raw, "max_position_embeddings")?;

        log::info!(
            "Loading protein language model: hidden_size={}, max_positions={}",
            hidden_size,
            max_positions,
        );

        let weights_path = model_dir.join(config::model_files::WEIGHTS);
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
                .with_context(|| format!("load weights from {}", weights_path.display()))?
        };

        let model = BertModel::load(vb, &bert_config).context("load BERT model")?;

        let tokenizer_path = model_dir.join(config::model_files::TOKENIZER_JSON);
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        log::info!("Protein language model loaded (dims={})", hidden_size);

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size,
            max_residues: max_positions.saturating_sub(config::protbert::SPECIAL_TOKENS),
        })
    }

    pub fn max_residues(&self) -> usize {
        self.max_residues
    }
}

impl Embedder for ProtBertEmbedder {
    fn name(&self) -> &str {
        "protbert"
    }

    fn dims(&self) -> usize {
        self.hidden_size
    }

    fn embed(&self, sequence: &str) -> anyhow::Result<Embedding> {
        let residues = sequence.chars().count();
        // Truncating would silently break the one-row-per-residue contract.
        if residues > self.max_residues {
            bail!(
                "sequence of {} residues exceeds model limit of {}",
                residues,
                self.max_residues
            );
        }

        let text = prepare_protbert_text(sequence);
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let token_ids = encoding.get_ids();
        let attention_mask = encoding.get_attention_mask();

        // Create tensors [1, seq_len]
        let token_ids_t = Tensor::new(
            token_ids.iter().map(|&id| id as i64).collect::<Vec<_>>().as_slice(),
            &self.device,
        )?
        .unsqueeze(0)?;

        let attention_mask_t = Tensor::new(
            attention_mask.iter().map(|&m| m as i64).collect::<Vec<_>>().as_slice(),
            &self.device,
        )?
        .unsqueeze(0)?;

        let token_type_ids = token_ids_t.zeros_like()?;

        // Forward pass → [1, seq_len, hidden_size]
        let output = self
            .model
            .forward(&token_ids_t, &token_type_ids, Some(&attention_mask_t))?;

        let hidden = output.squeeze(0)?;
        let tokens = hidden.dim(0)?;
        if tokens < config::protbert::SPECIAL_TOKENS {
            bail!("tokenizer produced {} tokens, expected at least [CLS] and [SEP]", tokens);
        }

        // Drop [CLS] (first) and [SEP] (last) → [residues, hidden_size]
        let per_residue = hidden.narrow(0, 1, tokens - config::protbert::SPECIAL_TOKENS)?;
        Embedding::new(per_residue)
    }
}

fn json_usize(v: &serde_json::Value, key: &str) -> anyhow::Result<usize> {
    let n = v
        .get(key)
        .and_then(|x| x.as_u64())
        .with_context(|| format!("config.json missing numeric `{key}`"))?;
    usize::try_from(n).with_context(|| format!("`{key}` out of range"))
}
