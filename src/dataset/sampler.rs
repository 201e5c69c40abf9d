//! Mismatch index sampling

use rand::Rng;

use crate::error::{Error, Result};

/// Minimum index distance between a sample and its mismatch. Adjacent corpus
/// rows are typically paraphrases of the same caption, so a near neighbor
/// would make the negative example nearly identical to the positive.
pub const MIN_GAP: usize = 10;

/// Retry budget for one mismatch draw
pub const MAX_ATTEMPTS: usize = 1000;

/// Draw a mismatched row for `index` by uniform rejection sampling over
/// `[0, len)`, accepting the first candidate at least `min_gap` away
/// (which also rules out `index` itself).
///
/// The draw is capped at `max_attempts`; a corpus too small for the window
/// (`len <= 2 * min_gap + 1` in the worst position) fails with
/// [`Error::SamplingExhausted`] instead of looping forever.
pub fn draw_mismatch_index<R: Rng>(
    rng: &mut R,
    len: usize,
    index: usize,
    min_gap: usize,
    max_attempts: usize,
) -> Result<usize> {
    if len > 0 {
        for _ in 0..max_attempts {
            let candidate = rng.random_range(0..len);
            if candidate.abs_diff(index) >= min_gap {
                return Ok(candidate);
            }
        }
    }
    Err(Error::SamplingExhausted {
        attempts: max_attempts,
        len,
        min_gap,
    })
}
