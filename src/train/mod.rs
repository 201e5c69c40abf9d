//! Stateless training-support utilities
//!
//! Consumed by the external training-loop driver: label smoothing,
//! per-layer-kind weight initialization, similarity metrics, checkpoint
//! persistence, feature shaping and result persistence.

mod checkpoint;
mod features;
mod init;
mod labels;
mod results;
mod similarity;

pub use checkpoint::{checkpoint_paths, load_checkpoint, save_checkpoint, NetworkState};
pub use features::flatten_features;
pub use init::{InitSpec, LayerKind, NetworkRole, WeightInit};
pub use labels::smooth_label;
pub use results::{save_images, save_results};
pub use similarity::{cosine_similarity, norm_ratio_distance};
