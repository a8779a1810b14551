// backend.rs — Backend selection at initialization.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use super::embedding::Embedder;
use super::fasttext::FastTextEmbedder;
use super::protbert::ProtBertEmbedder;
use super::word2vec::Word2VecEmbedder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Word2Vec,
    FastText,
    ProtBert,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Word2Vec => "word2vec",
            BackendKind::FastText => "fasttext",
            BackendKind::ProtBert => "protbert",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "word2vec" => Ok(BackendKind::Word2Vec),
            "fasttext" => Ok(BackendKind::FastText),
            "protbert" => Ok(BackendKind::ProtBert),
            other => bail!("unknown embedding backend: {other}"),
        }
    }
}

/// Load the chosen backend from its model directory.
pub fn load_backend(kind: BackendKind, model_dir: &Path) -> anyhow::Result<Box<dyn Embedder>> {
    log::info!("Loading {} backend from {}", kind, model_dir.display());
    let embedder: Box<dyn Embedder> = match kind {
        BackendKind::Word2Vec => Box::new(Word2VecEmbedder::load(model_dir)?),
        BackendKind::FastText => Box::new(FastTextEmbedder::load(model_dir)?),
        BackendKind::ProtBert => Box::new(ProtBertEmbedder::load(model_dir)?),
    };
    Ok(embedder)
}
