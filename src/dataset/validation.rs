//! Eager validation-split loader

use ndarray::{Array2, Array4};

use super::config::DatasetConfig;
use crate::corpus::{ChannelPolicy, ImagePreprocessor, ImageResolver};
use crate::error::{Error, Result};
use crate::store::{EmbeddingStore, IdentifierTable};

/// Resolution the validation split is materialized at, matching the input
/// size of the pretrained feature extractor
pub const VAL_IMAGE_SIZE: u32 = 224;

/// A whole validation split held in memory: every image resolved, broadcast
/// to RGB and laid out channel-first as (N, 3, 224, 224), alongside the
/// (N, D) embedding matrix.
///
/// Loading is eager and all-or-nothing: a length mismatch or any single
/// resolution failure propagates and leaves no partial corpus. The
/// channel-first layout is fixed here (the downstream extractor expects it)
/// and does not follow the config's channel policy.
pub struct ValidationCorpus {
    /// Images as (N, 3, 224, 224), f32 in 0..255
    pub images: Array4<f32>,
    /// Sentence embeddings as (N, D)
    pub embeddings: Array2<f32>,
}

impl ValidationCorpus {
    /// Materialize the split described by `config`. The config's
    /// `embedding_tensor` should name the validation matrix
    /// (e.g. `"val_vectors_"`).
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        let store = EmbeddingStore::open(&config.embedding_file)
            .with_tensor_name(&config.embedding_tensor);
        let table = IdentifierTable::load(&config.identifier_file)?;

        let rows = store.len()?;
        if table.len() != rows {
            return Err(Error::Corruption(format!(
                "identifier table holds {} ids but embedding matrix has {rows} rows",
                table.len()
            )));
        }

        let resolver = ImageResolver::new(&config.image_dir, config.variant)
            .with_target_size(VAL_IMAGE_SIZE);
        let preprocessor = ImagePreprocessor::new(ChannelPolicy::BroadcastRgb);

        let side = VAL_IMAGE_SIZE as usize;
        let mut flat = Vec::with_capacity(rows * 3 * side * side);
        for id in table.iter() {
            let image = resolver.resolve(id)?;
            flat.extend(preprocessor.normalize(&image).iter());
        }

        let images = Array4::from_shape_vec((rows, 3, side, side), flat)
            .map_err(|e| Error::InvalidShape(format!("validation image stack: {e}")))?;
        Ok(Self {
            images,
            embeddings: store.to_matrix()?,
        })
    }

    /// Number of validation samples
    pub fn len(&self) -> usize {
        self.images.shape()[0]
    }

    /// Whether the split is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
