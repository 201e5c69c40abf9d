//! Extractor-output shaping
//!
//! The pretrained feature extractor is an external capability; this module
//! only reshapes what it returns.

use ndarray::{Array2, ArrayD};

use crate::error::{Error, Result};

/// Flatten a batched feature map `(B, d1, d2, ...)` into `(B, d1*d2*...)`,
/// e.g. a (B, 512, 7, 7) convolutional map into (B, 25088) descriptors.
pub fn flatten_features(features: &ArrayD<f32>) -> Result<Array2<f32>> {
    let shape = features.shape();
    if shape.is_empty() {
        return Err(Error::InvalidShape(
            "feature tensor must have a batch dimension".to_string(),
        ));
    }
    let batch = shape[0];
    let flat_len: usize = shape[1..].iter().product();

    let values: Vec<f32> = features.iter().copied().collect();
    Array2::from_shape_vec((batch, flat_len), values)
        .map_err(|e| Error::InvalidShape(format!("feature tensor: {e}")))
}
