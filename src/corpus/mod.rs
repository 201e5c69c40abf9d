//! Image corpus access: variant dispatch, resolution, preprocessing

mod preprocess;
mod resolver;
mod variant;

pub use preprocess::{ChannelPolicy, ImagePreprocessor};
pub use resolver::{ImageResolver, TRAIN_IMAGE_SIZE};
pub use variant::CorpusVariant;
