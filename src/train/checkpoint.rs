//! Checkpoint persistence
//!
//! A checkpoint is two independent state blobs per label, at deterministic
//! paths `<dir>/<subdir>/disc_<label>.safetensors` and
//! `<dir>/<subdir>/gen_<label>.safetensors`. Saving with the same label
//! overwrites both files; the target directory is created if absent.

use std::fmt;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, IxDyn};
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;

use crate::error::{Error, Result};

/// Named-parameter state of one trainable network
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkState {
    parameters: Vec<(String, ArrayD<f32>)>,
}

impl NetworkState {
    /// Empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named parameter tensor
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, tensor: ArrayD<f32>) -> Self {
        self.parameters.push((name.into(), tensor));
        self
    }

    /// Add a named parameter tensor in place
    pub fn insert(&mut self, name: impl Into<String>, tensor: ArrayD<f32>) {
        self.parameters.push((name.into(), tensor));
    }

    /// Parameter tensor by name
    pub fn get(&self, name: &str) -> Option<&ArrayD<f32>> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the state holds no parameters
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// All parameters in insertion order
    pub fn parameters(&self) -> &[(String, ArrayD<f32>)] {
        &self.parameters
    }
}

/// Deterministic blob paths for a label: (discriminator, generator)
pub fn checkpoint_paths(
    dir: impl AsRef<Path>,
    subdir: &str,
    label: impl fmt::Display,
) -> (PathBuf, PathBuf) {
    let base = dir.as_ref().join(subdir);
    (
        base.join(format!("disc_{label}.safetensors")),
        base.join(format!("gen_{label}.safetensors")),
    )
}

/// Persist both network states under `dir/subdir` for `label`.
///
/// The directory is created if absent (already existing is not an error);
/// existing blobs for the same label are overwritten. Returns the two paths
/// written, discriminator first.
pub fn save_checkpoint(
    discriminator: &NetworkState,
    generator: &NetworkState,
    dir: impl AsRef<Path>,
    subdir: &str,
    label: impl fmt::Display,
) -> Result<(PathBuf, PathBuf)> {
    let base = dir.as_ref().join(subdir);
    std::fs::create_dir_all(&base)?;

    let (disc_path, gen_path) = checkpoint_paths(dir, subdir, label);
    write_state(discriminator, &disc_path)?;
    write_state(generator, &gen_path)?;
    Ok((disc_path, gen_path))
}

/// Load both network states saved under `dir/subdir` for `label`,
/// discriminator first
pub fn load_checkpoint(
    dir: impl AsRef<Path>,
    subdir: &str,
    label: impl fmt::Display,
) -> Result<(NetworkState, NetworkState)> {
    let (disc_path, gen_path) = checkpoint_paths(dir, subdir, label);
    Ok((read_state(&disc_path)?, read_state(&gen_path)?))
}

fn write_state(state: &NetworkState, path: &Path) -> Result<()> {
    let buffers: Vec<(&str, Vec<usize>, Vec<u8>)> = state
        .parameters
        .iter()
        .map(|(name, tensor)| {
            let bytes: Vec<u8> = tensor.iter().flat_map(|v| v.to_le_bytes()).collect();
            (name.as_str(), tensor.shape().to_vec(), bytes)
        })
        .collect();

    let views: Vec<(&str, TensorView<'_>)> = buffers
        .iter()
        .map(|(name, shape, bytes)| {
            TensorView::new(Dtype::F32, shape.clone(), bytes)
                .map(|view| (*name, view))
                .map_err(|e| Error::Serialization(format!("checkpoint tensor '{name}': {e}")))
        })
        .collect::<Result<_>>()?;

    safetensors::serialize_to_file(views, &None, path).map_err(|e| {
        Error::Serialization(format!("failed to write checkpoint {}: {e}", path.display()))
    })
}

fn read_state(path: &Path) -> Result<NetworkState> {
    let data = std::fs::read(path)?;
    let container = SafeTensors::deserialize(&data).map_err(|e| {
        Error::Serialization(format!("malformed checkpoint {}: {e}", path.display()))
    })?;

    let mut state = NetworkState::new();
    for (name, view) in container.tensors() {
        if view.dtype() != Dtype::F32 {
            return Err(Error::Serialization(format!(
                "checkpoint tensor '{name}' has dtype {:?}, expected F32",
                view.dtype()
            )));
        }
        let values: Vec<f32> = view
            .data()
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        let tensor = ArrayD::from_shape_vec(IxDyn(view.shape()), values)
            .map_err(|e| Error::Serialization(format!("checkpoint tensor '{name}': {e}")))?;
        state.insert(name, tensor);
    }
    Ok(state)
}
