//! Lazy sentence-embedding store

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use ndarray::{Array1, Array2};
use safetensors::SafeTensors;

use super::f32_values;
use crate::error::{Error, Result};

/// Tensor name the training split stores its embedding matrix under
pub const DEFAULT_EMBEDDING_TENSOR: &str = "vectors_";

/// Read-only, randomly-indexable view over a persisted N×D embedding matrix.
///
/// `open` performs no I/O; the full matrix materializes on the first call to
/// [`len`](Self::len), [`dim`](Self::dim) or [`row`](Self::row) and stays in
/// memory for the store's lifetime. Negative sampling needs O(1) indexed
/// reads, so the matrix is held whole rather than streamed.
///
/// # Example
///
/// ```no_run
/// use emparejar::store::EmbeddingStore;
///
/// let store = EmbeddingStore::open("train/vectors.safetensors");
/// let n = store.len().expect("failed to load embedding store");
/// println!("{n} embeddings");
/// ```
pub struct EmbeddingStore {
    path: PathBuf,
    tensor_name: String,
    matrix: OnceLock<Array2<f32>>,
    load_gate: Mutex<()>,
}

impl EmbeddingStore {
    /// Create a handle without touching the backing file
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tensor_name: DEFAULT_EMBEDDING_TENSOR.to_string(),
            matrix: OnceLock::new(),
            load_gate: Mutex::new(()),
        }
    }

    /// Override the tensor name the matrix is stored under
    /// (e.g. `"val_vectors_"` for the validation split)
    #[must_use]
    pub fn with_tensor_name(mut self, name: impl Into<String>) -> Self {
        self.tensor_name = name.into();
        self
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of embedding rows, materializing the matrix on first call
    pub fn len(&self) -> Result<usize> {
        Ok(self.matrix()?.nrows())
    }

    /// Whether the store holds no rows
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Embedding dimension D
    pub fn dim(&self) -> Result<usize> {
        Ok(self.matrix()?.ncols())
    }

    /// Copy of the embedding at `index`; bounds error if `index >= len`
    pub fn row(&self, index: usize) -> Result<Array1<f32>> {
        let matrix = self.matrix()?;
        if index >= matrix.nrows() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: matrix.nrows(),
            });
        }
        Ok(matrix.row(index).to_owned())
    }

    /// Owned copy of the full matrix, for eager consumers
    pub fn to_matrix(&self) -> Result<Array2<f32>> {
        Ok(self.matrix()?.clone())
    }

    /// One-time materialization gate. Double-checked so concurrent first
    /// access cannot double-load or observe a partially-populated matrix.
    fn matrix(&self) -> Result<&Array2<f32>> {
        if let Some(matrix) = self.matrix.get() {
            return Ok(matrix);
        }
        let _gate = self.load_gate.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(matrix) = self.matrix.get() {
            return Ok(matrix);
        }
        let loaded = self.load()?;
        Ok(self.matrix.get_or_init(|| loaded))
    }

    fn load(&self) -> Result<Array2<f32>> {
        let data = std::fs::read(&self.path).map_err(|e| {
            Error::Corruption(format!(
                "failed to read embedding store {}: {e}",
                self.path.display()
            ))
        })?;
        let container = SafeTensors::deserialize(&data).map_err(|e| {
            Error::Corruption(format!(
                "malformed embedding store {}: {e}",
                self.path.display()
            ))
        })?;
        let view = container.tensor(&self.tensor_name).map_err(|e| {
            Error::Corruption(format!(
                "embedding store {} has no tensor '{}': {e}",
                self.path.display(),
                self.tensor_name
            ))
        })?;

        let shape = view.shape();
        if shape.len() != 2 {
            return Err(Error::Corruption(format!(
                "embedding tensor '{}' must be 2-D, got shape {shape:?}",
                self.tensor_name
            )));
        }
        let (rows, cols) = (shape[0], shape[1]);
        let values = f32_values(&view, "embedding matrix")?;

        Array2::from_shape_vec((rows, cols), values).map_err(|e| {
            Error::Corruption(format!("embedding tensor '{}': {e}", self.tensor_name))
        })
    }
}
