// IMPORTANT:
// Keep ALL numeric values centralized here (no hardcoded numeric values scattered around).

// NOTE: VERSION must stay in sync with the `version` field in Cargo.toml.
pub const VERSION: &str = "0.1.0";

pub mod logging {
    pub const LOG_DIR_REL: &str = ".seqfeat/logs";
    pub const LOG_FILE_NAME: &str = "seqfeat";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;
}

pub mod model_files {
    // Shared by every backend directory layout.
    pub const CONFIG_JSON: &str = "config.json";
    pub const WEIGHTS: &str = "model.safetensors";

    // k-mer backends (Word2Vec, FastText)
    pub const VOCAB_JSON: &str = "vocab.json";

    // BERT backends
    pub const TOKENIZER_JSON: &str = "tokenizer.json";
}

pub mod kmer {
    // One k-mer per residue, centred on it: "-ACD-" -> "-AC", "ACD", "CD-".
    pub const DEFAULT_KMER_SIZE: usize = 3;
    pub const DEFAULT_PAD: char = '-';

    // FastText character n-gram range, applied to "<kmer>".
    pub const DEFAULT_MIN_N: usize = 3;
    pub const DEFAULT_MAX_N: usize = 6;

    pub const VECTORS_TENSOR: &str = "vectors";
    pub const NGRAMS_TENSOR: &str = "ngrams";

    // 32-bit FNV-1a, as used by FastText bucket hashing.
    pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
    pub const FNV_PRIME: u32 = 16_777_619;
}

pub mod protbert {
    // Rare / ambiguous amino acids collapsed to X before tokenization.
    pub const RARE_RESIDUES: &[char] = &['U', 'Z', 'O', 'B'];
    pub const UNKNOWN_RESIDUE: char = 'X';

    // [CLS] prefix + [SEP] suffix added by the tokenizer.
    pub const SPECIAL_TOKENS: usize = 2;
}

pub mod download {
    pub const MODELS_DIR_REL: &str = ".seqfeat/models";
    pub const TIMEOUT_SECS: u64 = 90;
    pub const TMP_EXTENSION: &str = "tmp";
    pub const HTTP_OK: u16 = 200;
}
