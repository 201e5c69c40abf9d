//! Persisted embedding and identifier stores
//!
//! Both stores read safetensors containers: self-describing binaries holding
//! named arrays. The embedding matrix is a single F32 tensor; the identifier
//! table is a ragged layout of U32 character codes plus U64 row offsets.

mod embeddings;
mod identifiers;

pub use embeddings::{EmbeddingStore, DEFAULT_EMBEDDING_TENSOR};
pub use identifiers::{IdentifierTable, DEFAULT_CODES_TENSOR, DEFAULT_OFFSETS_TENSOR};

use safetensors::tensor::{Dtype, TensorView};

use crate::error::{Error, Result};

/// Decode an F32 tensor's little-endian payload
pub(crate) fn f32_values(view: &TensorView<'_>, context: &str) -> Result<Vec<f32>> {
    if view.dtype() != Dtype::F32 {
        return Err(Error::Corruption(format!(
            "{context}: expected F32 tensor, got {:?}",
            view.dtype()
        )));
    }
    Ok(view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Decode a U32 tensor's little-endian payload
pub(crate) fn u32_values(view: &TensorView<'_>, context: &str) -> Result<Vec<u32>> {
    if view.dtype() != Dtype::U32 {
        return Err(Error::Corruption(format!(
            "{context}: expected U32 tensor, got {:?}",
            view.dtype()
        )));
    }
    Ok(view
        .data()
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Decode a U64 tensor's little-endian payload
pub(crate) fn u64_values(view: &TensorView<'_>, context: &str) -> Result<Vec<u64>> {
    if view.dtype() != Dtype::U64 {
        return Err(Error::Corruption(format!(
            "{context}: expected U64 tensor, got {:?}",
            view.dtype()
        )));
    }
    Ok(view
        .data()
        .chunks_exact(8)
        .map(|b| u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
        .collect())
}
