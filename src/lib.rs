//! emparejar — paired text/image sampling for conditional adversarial training
//!
//! Training a text-conditional image generator needs, for every step, a
//! sentence embedding, the image it describes, and a deliberately mismatched
//! image. This crate is that pairing layer: it joins three positionally
//! aligned data sources — a persisted embedding matrix, an identifier table,
//! and an on-disk image corpus — and draws negatives by rejection sampling
//! outside a paraphrase window.
//!
//! # Architecture
//!
//! ```text
//! embedding store ──┐
//! identifier table ─┼─► PairedSampleDataset::get(i) ─► {embedding,
//! image corpus ─────┘        │                          matched image,
//!                            └─ mismatch draw (|j−i| ≥ gap, bounded retries)
//!                                                       mismatched image}
//! ```
//!
//! # Example
//!
//! ```no_run
//! use emparejar::{CorpusVariant, DatasetConfig, PairedSampleDataset};
//!
//! let config = DatasetConfig::new(
//!     "train/vectors.safetensors",
//!     "train/image_ids.safetensors",
//!     "images",
//!     CorpusVariant::Flickr8k,
//! );
//! let dataset = PairedSampleDataset::new(&config);
//!
//! let sample = dataset.get(0).expect("failed to pair sample 0");
//! println!("embedding dim: {}", sample.embedding.len());
//! ```
//!
//! The `train` module carries the stateless helpers the external training
//! loop consumes: label smoothing, per-layer-kind weight-init tables,
//! similarity metrics, and checkpoint persistence.

pub mod corpus;
pub mod dataset;
pub mod error;
pub mod store;
pub mod train;

pub use corpus::{ChannelPolicy, CorpusVariant, ImagePreprocessor, ImageResolver};
pub use dataset::{DatasetConfig, PairedSample, PairedSampleDataset, ValidationCorpus};
pub use error::{Error, Result};
pub use store::{EmbeddingStore, IdentifierTable};
