//! Paired sample dataset
//!
//! Composes the embedding store, identifier table, resolver and preprocessor
//! to answer `get(i)` with {embedding, matched image, mismatched image}.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

use ndarray::{Array1, Array3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::DatasetConfig;
use super::sampler::draw_mismatch_index;
use crate::corpus::{ImagePreprocessor, ImageResolver};
use crate::error::{Error, Result};
use crate::store::{EmbeddingStore, IdentifierTable};

/// One training unit: a sentence embedding, the image it describes, and a
/// deliberately mismatched image drawn from outside the paraphrase window
#[derive(Debug, Clone)]
pub struct PairedSample {
    /// Sentence embedding for row i
    pub embedding: Array1<f32>,
    /// Image matching the embedding
    pub matched: Array3<f32>,
    /// Image for a row at least `min_gap` away
    pub mismatched: Array3<f32>,
}

/// Lazily-loading dataset over a positionally-joined corpus.
///
/// One instance serves many concurrent `get` callers; the identifier table
/// and embedding matrix materialize exactly once behind an initialization
/// gate, and the embedding/identifier length cross-check runs there. The
/// mismatch draw uses an internal RNG seeded from the OS by default; use
/// [`with_seed`](Self::with_seed) for reproducible draws.
pub struct PairedSampleDataset {
    embeddings: EmbeddingStore,
    identifier_file: PathBuf,
    resolver: ImageResolver,
    preprocessor: ImagePreprocessor,
    min_gap: usize,
    max_attempts: usize,
    identifiers: OnceLock<IdentifierTable>,
    load_gate: Mutex<()>,
    rng: Mutex<StdRng>,
}

impl PairedSampleDataset {
    /// Assemble a dataset from its configuration; no I/O happens here
    pub fn new(config: &DatasetConfig) -> Self {
        Self::build(config, StdRng::from_os_rng())
    }

    /// Assemble with a seeded RNG for reproducible mismatch draws
    pub fn with_seed(config: &DatasetConfig, seed: u64) -> Self {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: &DatasetConfig, rng: StdRng) -> Self {
        let embeddings = EmbeddingStore::open(&config.embedding_file)
            .with_tensor_name(&config.embedding_tensor);
        let resolver = ImageResolver::new(&config.image_dir, config.variant)
            .with_target_size(config.image_size);
        Self {
            embeddings,
            identifier_file: config.identifier_file.clone(),
            resolver,
            preprocessor: ImagePreprocessor::new(config.channel_policy),
            min_gap: config.min_gap,
            max_attempts: config.max_attempts,
            identifiers: OnceLock::new(),
            load_gate: Mutex::new(()),
            rng: Mutex::new(rng),
        }
    }

    /// Corpus length N; the first call triggers the dependent loads and the
    /// length cross-check, later calls are free
    pub fn len(&self) -> Result<usize> {
        Ok(self.identifiers()?.len())
    }

    /// Whether the corpus holds no rows
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Produce the paired sample for `index`
    pub fn get(&self, index: usize) -> Result<PairedSample> {
        let identifiers = self.identifiers()?;
        let len = identifiers.len();
        let matched_id = identifiers
            .get(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;

        let embedding = self.embeddings.row(index)?;
        let matched = self.resolver.resolve(matched_id)?;

        let mismatch_index = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            draw_mismatch_index(&mut *rng, len, index, self.min_gap, self.max_attempts)?
        };
        let mismatched_id = identifiers.get(mismatch_index).ok_or(Error::IndexOutOfBounds {
            index: mismatch_index,
            len,
        })?;
        let mismatched = self.resolver.resolve(mismatched_id)?;

        Ok(PairedSample {
            embedding,
            matched: self.preprocessor.normalize(&matched),
            mismatched: self.preprocessor.normalize(&mismatched),
        })
    }

    /// One-time load of the identifier table plus the positional-join
    /// invariant check against the embedding row count
    fn identifiers(&self) -> Result<&IdentifierTable> {
        if let Some(table) = self.identifiers.get() {
            return Ok(table);
        }
        let _gate = self.load_gate.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = self.identifiers.get() {
            return Ok(table);
        }

        let table = IdentifierTable::load(&self.identifier_file)?;
        let rows = self.embeddings.len()?;
        if table.len() != rows {
            return Err(Error::Corruption(format!(
                "identifier table holds {} ids but embedding matrix has {rows} rows",
                table.len()
            )));
        }
        Ok(self.identifiers.get_or_init(|| table))
    }
}
