//! Result persistence

use std::io::Write;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use ndarray::Array2;
use safetensors::tensor::{Dtype, TensorView};

use crate::error::{Error, Result};

/// Tensor name a result matrix is stored under
const RESULTS_TENSOR: &str = "results";

/// Persist a result matrix twice: a safetensors blob at `bin_path` and a
/// plain-text copy at `txt_path`, one whitespace-separated row per line.
/// Existing files at either path are overwritten.
pub fn save_results(
    results: &Array2<f32>,
    bin_path: impl AsRef<Path>,
    txt_path: impl AsRef<Path>,
) -> Result<()> {
    let bin_path = bin_path.as_ref();
    let bytes: Vec<u8> = results.iter().flat_map(|v| v.to_le_bytes()).collect();
    let view = TensorView::new(Dtype::F32, results.shape().to_vec(), &bytes)
        .map_err(|e| Error::Serialization(format!("result matrix: {e}")))?;
    safetensors::serialize_to_file(vec![(RESULTS_TENSOR, view)], &None, bin_path).map_err(
        |e| Error::Serialization(format!("failed to write {}: {e}", bin_path.display())),
    )?;

    let mut text = Vec::new();
    for row in results.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.6e}")).collect();
        writeln!(text, "{}", line.join(" "))?;
    }
    std::fs::write(txt_path, text)?;
    Ok(())
}

/// Persist decoded images under `dir` as `<prefix>_<index>.png`, creating
/// the directory if absent. Returns the paths written, in input order.
pub fn save_images(
    images: &[DynamicImage],
    dir: impl AsRef<Path>,
    prefix: &str,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let path = dir.join(format!("{prefix}_{index}.png"));
        image
            .save(&path)
            .map_err(|e| Error::Image(format!("failed to encode {}: {e}", path.display())))?;
        paths.push(path);
    }
    Ok(paths)
}
