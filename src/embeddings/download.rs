// download.rs — Model file download with SHA256 verification.
//
// Model weights are fetched once and cached under ~/.seqfeat/models/<name>/.
// The caller supplies a JSON manifest naming every file and its SHA256;
// nothing is written to its final path before the hash matches.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelFile {
    pub name: String,
    pub sha256: String,
}

/// Where a model's files come from and what they must hash to.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSource {
    pub name: String,
    pub base_url: String,
    pub files: Vec<ModelFile>,
}

impl ModelSource {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let source: Self =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        if source.files.is_empty() {
            bail!("model manifest {} lists no files", path.display());
        }
        check_plain_name("model name", &source.name)?;
        for f in &source.files {
            check_plain_name("model file name", &f.name)?;
        }
        Ok(source)
    }
}

// Names are joined onto the models root, so they must not carry path parts.
fn check_plain_name(what: &str, name: &str) -> anyhow::Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        bail!("{what} must be a plain name: {name:?}");
    }
    Ok(())
}

/// `$HOME/.seqfeat/models`.
pub fn default_models_root() -> anyhow::Result<PathBuf> {
    let home = crate::logging::home_dir()
        .context("cannot determine home directory (neither HOME nor USERPROFILE is set)")?;
    Ok(home.join(config::download::MODELS_DIR_REL))
}

/// Local directory for one model under `root`.
pub fn model_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

/// Check if all files listed by `source` exist locally.
pub fn model_files_exist(source: &ModelSource, root: &Path) -> bool {
    let dir = model_dir(root, &source.name);
    source.files.iter().all(|f| dir.join(&f.name).exists())
}

/// Download all missing model files. Returns the model directory path.
pub fn ensure_model_files(source: &ModelSource, root: &Path) -> anyhow::Result<PathBuf> {
    let dir = model_dir(root, &source.name);

    if model_files_exist(source, root) {
        log::info!("Model files already cached at {}", dir.display());
        return Ok(dir);
    }

    log::info!("Downloading {} model to {}", source.name, dir.display());
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create model dir {}", dir.display()))?;

    let base = source.base_url.trim_end_matches('/');
    for file in &source.files {
        let dest = dir.join(&file.name);
        if dest.exists() {
            continue;
        }
        download_and_verify(&format!("{base}/{}", file.name), &dest, &file.sha256)?;
    }

    log::info!("Model download complete");
    Ok(dir)
}

/// Download a file from URL and verify its SHA256 hash.
fn download_and_verify(url: &str, dest: &Path, expected_sha256: &str) -> anyhow::Result<()> {
    let filename = dest.file_name().unwrap_or_default().to_string_lossy();
    log::info!("Downloading {} from {}", filename, url);

    let resp = ureq::get(url)
        .timeout(std::time::Duration::from_secs(config::download::TIMEOUT_SECS))
        .call()
        .with_context(|| format!("failed to download {url}"))?;

    let status = resp.status();
    if status != config::download::HTTP_OK {
        bail!("HTTP {status} downloading {url}");
    }

    let mut body = Vec::new();
    resp.into_reader()
        .read_to_end(&mut body)
        .with_context(|| format!("failed to read response body for {url}"))?;

    let actual_hash = verify_sha256(&body, expected_sha256)
        .with_context(|| format!("integrity check failed for {filename}"))?;
    log::info!("SHA256 verified for {} ({})", filename, &actual_hash[..12]);

    write_atomically(dest, &body)
}

/// Hash `bytes` and compare with `expected_sha256` (hex, case-insensitive).
/// Returns the actual lower-case hex digest.
pub fn verify_sha256(bytes: &[u8], expected_sha256: &str) -> anyhow::Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let actual_hash = hex::encode(hasher.finalize());

    if !actual_hash.eq_ignore_ascii_case(expected_sha256.trim()) {
        bail!(
            "SHA256 mismatch: expected {}, got {}",
            expected_sha256,
            actual_hash
        );
    }
    Ok(actual_hash)
}

// Write to <dest>.tmp, then rename.
fn write_atomically(dest: &Path, body: &[u8]) -> anyhow::Result<()> {
    let mut tmp_name = dest.file_name().context("destination has no file name")?.to_os_string();
    tmp_name.push(".");
    tmp_name.push(config::download::TMP_EXTENSION);
    let tmp_path = dest.with_file_name(tmp_name);
    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    file.write_all(body)?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, dest)
        .with_context(|| format!("failed to rename {} -> {}", tmp_path.display(), dest.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn manifest(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("manifest.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_verify_sha256() {
        assert_eq!(verify_sha256(b"abc", ABC_SHA256).unwrap(), ABC_SHA256);
        assert!(verify_sha256(b"abc", &ABC_SHA256.to_uppercase()).is_ok());
        let err = verify_sha256(b"abd", ABC_SHA256).unwrap_err();
        assert!(err.to_string().contains("SHA256 mismatch"));
    }

    #[test]
    fn test_manifest_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest(
            dir.path(),
            r#"{ "name": "word2vec", "base_url": "https://example.org/models/word2vec/",
                 "files": [ { "name": "vocab.json", "sha256": "00" },
                            { "name": "model.safetensors", "sha256": "11" } ] }"#,
        );
        let source = ModelSource::from_json_file(&path).unwrap();
        assert_eq!(source.name, "word2vec");
        assert_eq!(source.files.len(), 2);
    }

    #[test]
    fn test_manifest_rejects_paths_and_empty_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest(
            dir.path(),
            r#"{ "name": "m", "base_url": "https://example.org", "files": [ { "name": "../x", "sha256": "00" } ] }"#,
        );
        assert!(ModelSource::from_json_file(&path).is_err());

        let path = manifest(dir.path(), r#"{ "name": "m", "base_url": "https://example.org", "files": [] }"#);
        assert!(ModelSource::from_json_file(&path).is_err());
    }

    #[test]
    fn test_manifest_rejects_model_names_leaving_root() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["/tmp/escape", "../..", "..", ".", "", "a/b", "a\\\\b"] {
            let body = format!(
                r#"{{ "name": "{name}", "base_url": "https://example.org", "files": [ {{ "name": "vocab.json", "sha256": "00" }} ] }}"#
            );
            let path = manifest(dir.path(), &body);
            let err = ModelSource::from_json_file(&path).unwrap_err();
            assert!(err.to_string().contains("model name"), "{name:?}: {err}");
        }
    }

    #[test]
    fn test_cached_files_skip_download() {
        let root = tempfile::tempdir().unwrap();
        let source = ModelSource {
            name: "word2vec".to_string(),
            // Nothing listens here; a download attempt would fail the test.
            base_url: "http://127.0.0.1:9".to_string(),
            files: vec![ModelFile {
                name: "vocab.json".to_string(),
                sha256: ABC_SHA256.to_string(),
            }],
        };
        assert!(!model_files_exist(&source, root.path()));

        let dir = model_dir(root.path(), "word2vec");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("vocab.json"), "abc").unwrap();

        assert!(model_files_exist(&source, root.path()));
        assert_eq!(ensure_model_files(&source, root.path()).unwrap(), dir);
    }

    #[test]
    fn test_write_atomically_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("model.safetensors");
        write_atomically(&dest, b"weights").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"weights");
        assert!(!dir.path().join("model.safetensors.tmp").exists());
    }

    #[test]
    fn test_write_atomically_replaces_stale_tmp_of_same_file() {
        let dir = tempfile::tempdir().unwrap();
        // A leftover from an interrupted download of another file must survive.
        fs::write(dir.path().join("model.tmp"), b"other").unwrap();
        fs::write(dir.path().join("model.safetensors.tmp"), b"stale").unwrap();

        let dest = dir.path().join("model.safetensors");
        write_atomically(&dest, b"weights").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"weights");
        assert!(!dir.path().join("model.safetensors.tmp").exists());
        assert_eq!(fs::read(dir.path().join("model.tmp")).unwrap(), b"other");
    }
}
