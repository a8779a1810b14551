// embedding.rs — Per-residue embedding matrix and the backend capability.
//
// An Embedding is a [residues, width] f32 matrix held as a candle Tensor.
// Every backend (k-mer tables, BERT encoders, test doubles) implements
// `Embedder` and is injected into the feature extractor.

use anyhow::{bail, Context};
use candle_core::{DType, Device, Tensor};

/// Dense per-residue matrix: one row per residue, fixed column width per backend.
#[derive(Debug, Clone)]
pub struct Embedding {
    tensor: Tensor,
}

impl Embedding {
    /// Wrap a rank-2 tensor, converting it to F32 if needed.
    pub fn new(tensor: Tensor) -> anyhow::Result<Self> {
        if tensor.rank() != 2 {
            bail!("embedding must be a rank-2 matrix, got shape {:?}", tensor.dims());
        }
        let tensor = if tensor.dtype() == DType::F32 {
            tensor
        } else {
            tensor.to_dtype(DType::F32).context("convert embedding to f32")?
        };
        Ok(Self { tensor })
    }

    /// Build from explicit rows. All rows must share one width.
    pub fn from_rows(rows: &[Vec<f32>]) -> anyhow::Result<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            bail!("ragged embedding: row {} has width {}, expected {}", i, row.len(), width);
        }
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        let tensor = Tensor::from_vec(flat, (rows.len(), width), &Device::Cpu)?;
        Ok(Self { tensor })
    }

    /// Number of rows (residues).
    pub fn rows(&self) -> usize {
        self.tensor.dims()[0]
    }

    /// Number of columns (backend width).
    pub fn width(&self) -> usize {
        self.tensor.dims()[1]
    }

    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    pub fn to_rows(&self) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(self.tensor.to_vec2::<f32>()?)
    }

    /// Column-wise arithmetic mean over all rows.
    ///
    /// The result length equals `width()` regardless of the row count.
    pub fn mean_pool(&self) -> anyhow::Result<Vec<f32>> {
        if self.rows() == 0 {
            bail!("cannot mean-pool an embedding with zero rows");
        }
        let pooled = self.tensor.mean(0).context("mean over residue axis")?;
        Ok(pooled.to_vec1::<f32>()?)
    }
}

/// A pretrained per-residue embedding backend.
pub trait Embedder {
    /// Short backend identifier for logs.
    fn name(&self) -> &str;

    /// Column width of every embedding this backend returns.
    fn dims(&self) -> usize;

    /// Embed one sequence. Well-behaved backends return one row per residue.
    fn embed(&self, sequence: &str) -> anyhow::Result<Embedding>;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dims(&self) -> usize {
        (**self).dims()
    }

    fn embed(&self, sequence: &str) -> anyhow::Result<Embedding> {
        (**self).embed(sequence)
    }
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dims(&self) -> usize {
        (**self).dims()
    }

    fn embed(&self, sequence: &str) -> anyhow::Result<Embedding> {
        (**self).embed(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_pool_is_column_wise() {
        let emb = Embedding::from_rows(&[
            vec![1.0, 2.0, 3.0, 4.0],
            vec![3.0, 4.0, 5.0, 6.0],
            vec![5.0, 6.0, 7.0, 8.0],
        ])
        .unwrap();
        assert_eq!(emb.rows(), 3);
        assert_eq!(emb.width(), 4);
        assert_eq!(emb.mean_pool().unwrap(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_mean_pool_single_row_is_identity() {
        let emb = Embedding::from_rows(&[vec![0.5, -1.5]]).unwrap();
        assert_eq!(emb.mean_pool().unwrap(), vec![0.5, -1.5]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Embedding::from_rows(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(err.to_string().contains("ragged"));
    }

    #[test]
    fn test_non_matrix_tensor_rejected() {
        let t = Tensor::new(&[1.0f32, 2.0, 3.0], &Device::Cpu).unwrap();
        assert!(Embedding::new(t).is_err());
    }

    #[test]
    fn test_new_converts_to_f32() {
        let t = Tensor::new(&[[1.0f64, 3.0], [3.0, 5.0]], &Device::Cpu).unwrap();
        let emb = Embedding::new(t).unwrap();
        assert_eq!(emb.tensor().dtype(), DType::F32);
        assert_eq!(emb.mean_pool().unwrap(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_zero_rows_cannot_be_pooled() {
        let emb = Embedding::from_rows(&[]).unwrap();
        assert_eq!(emb.rows(), 0);
        assert!(emb.mean_pool().is_err());
    }
}
