//! Declarative dataset configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::sampler::{MAX_ATTEMPTS, MIN_GAP};
use crate::corpus::{ChannelPolicy, CorpusVariant, TRAIN_IMAGE_SIZE};
use crate::store::DEFAULT_EMBEDDING_TENSOR;

/// Everything needed to assemble a [`PairedSampleDataset`](super::PairedSampleDataset)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Safetensors container holding the embedding matrix
    pub embedding_file: PathBuf,

    /// Tensor name the matrix is stored under
    #[serde(default = "default_embedding_tensor")]
    pub embedding_tensor: String,

    /// Safetensors container holding the identifier table
    pub identifier_file: PathBuf,

    /// Directory of image files addressed by identifier-derived names
    pub image_dir: PathBuf,

    /// Image corpus variant
    #[serde(default)]
    pub variant: CorpusVariant,

    /// Square resolution images are resized to
    #[serde(default = "default_image_size")]
    pub image_size: u32,

    /// Channel policy applied after decoding
    #[serde(default)]
    pub channel_policy: ChannelPolicy,

    /// Minimum index distance for the mismatched sample
    #[serde(default = "default_min_gap")]
    pub min_gap: usize,

    /// Retry budget for one mismatch draw
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_embedding_tensor() -> String {
    DEFAULT_EMBEDDING_TENSOR.to_string()
}

fn default_image_size() -> u32 {
    TRAIN_IMAGE_SIZE
}

fn default_min_gap() -> usize {
    MIN_GAP
}

fn default_max_attempts() -> usize {
    MAX_ATTEMPTS
}

impl DatasetConfig {
    /// Config for a corpus laid out as
    /// `{embedding_file, identifier_file, image_dir}` with every knob at its
    /// default
    pub fn new(
        embedding_file: impl Into<PathBuf>,
        identifier_file: impl Into<PathBuf>,
        image_dir: impl Into<PathBuf>,
        variant: CorpusVariant,
    ) -> Self {
        Self {
            embedding_file: embedding_file.into(),
            embedding_tensor: default_embedding_tensor(),
            identifier_file: identifier_file.into(),
            image_dir: image_dir.into(),
            variant,
            image_size: default_image_size(),
            channel_policy: ChannelPolicy::default(),
            min_gap: default_min_gap(),
            max_attempts: default_max_attempts(),
        }
    }
}
