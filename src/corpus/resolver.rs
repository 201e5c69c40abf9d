//! Identifier-to-image resolution

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;

use super::variant::CorpusVariant;
use crate::error::{Error, Result};

/// Resolution every training image is resized to
pub const TRAIN_IMAGE_SIZE: u32 = 64;

/// Maps an identifier to a decoded image at a resolution fixed at
/// construction. Images are resolved fresh per access and never cached.
///
/// Flickr8k identifiers are file names. Flickr30k and MSCOCO identifiers are
/// caption-scoped: several identifiers share one underlying image, so
/// resolution goes through a group lookup with a fixed contract — strip any
/// trailing `#<n>` caption suffix, list directory entries whose name starts
/// with the remaining key, and resolve the lexicographically first.
pub struct ImageResolver {
    image_dir: PathBuf,
    variant: CorpusVariant,
    target_size: u32,
}

impl ImageResolver {
    /// Create a resolver over `image_dir` at the training resolution
    pub fn new(image_dir: impl Into<PathBuf>, variant: CorpusVariant) -> Self {
        Self {
            image_dir: image_dir.into(),
            variant,
            target_size: TRAIN_IMAGE_SIZE,
        }
    }

    /// Override the target resolution (square, pixels)
    #[must_use]
    pub fn with_target_size(mut self, pixels: u32) -> Self {
        self.target_size = pixels;
        self
    }

    /// Corpus variant this resolver dispatches on
    pub fn variant(&self) -> CorpusVariant {
        self.variant
    }

    /// Target resolution in pixels
    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Resolve an identifier to a decoded image at the target resolution
    pub fn resolve(&self, identifier: &str) -> Result<DynamicImage> {
        if self.variant.caption_grouped() {
            self.resolve_group(identifier)
        } else {
            self.open_sized(&self.image_dir.join(identifier))
        }
    }

    /// Group lookup for caption-scoped identifiers
    fn resolve_group(&self, identifier: &str) -> Result<DynamicImage> {
        let key = group_key(identifier);
        let entries = std::fs::read_dir(&self.image_dir)?;

        let mut candidates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(key))
            .collect();
        candidates.sort();

        match candidates.first() {
            Some(name) => self.open_sized(&self.image_dir.join(name)),
            None => Err(Error::ImageResolve(format!(
                "no image for identifier '{identifier}' (group key '{key}') in {}",
                self.image_dir.display()
            ))),
        }
    }

    fn open_sized(&self, path: &Path) -> Result<DynamicImage> {
        let image = image::open(path)
            .map_err(|e| Error::Image(format!("failed to decode {}: {e}", path.display())))?;
        Ok(image.resize_exact(self.target_size, self.target_size, FilterType::Triangle))
    }
}

/// Strip a trailing `#<n>` caption suffix, if present
fn group_key(identifier: &str) -> &str {
    match identifier.rsplit_once('#') {
        Some((stem, suffix))
            if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) =>
        {
            stem
        }
        _ => identifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, shade: u8) {
        RgbImage::from_pixel(8, 8, Rgb([shade, shade, shade]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_group_key_strips_caption_suffix() {
        assert_eq!(group_key("12345.jpg#2"), "12345.jpg");
        assert_eq!(group_key("12345.jpg#10"), "12345.jpg");
        assert_eq!(group_key("12345.jpg"), "12345.jpg");
        // non-numeric suffixes are part of the identifier
        assert_eq!(group_key("odd#name.jpg"), "odd#name.jpg");
        assert_eq!(group_key("trailing#"), "trailing#");
    }

    #[test]
    fn test_flickr8k_resolves_single_file() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 10);

        let resolver = ImageResolver::new(dir.path(), CorpusVariant::Flickr8k);
        let image = resolver.resolve("a.png").unwrap();
        assert_eq!(image.width(), TRAIN_IMAGE_SIZE);
        assert_eq!(image.height(), TRAIN_IMAGE_SIZE);
    }

    #[test]
    fn test_flickr8k_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ImageResolver::new(dir.path(), CorpusVariant::Flickr8k);
        assert!(matches!(resolver.resolve("gone.png"), Err(Error::Image(_))));
    }

    #[test]
    fn test_grouped_resolution_picks_first_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "777_b.png", 20);
        write_png(dir.path(), "777_a.png", 30);
        write_png(dir.path(), "888_a.png", 40);

        let resolver = ImageResolver::new(dir.path(), CorpusVariant::Flickr30k);
        let first = resolver.resolve("777#0").unwrap();
        let again = resolver.resolve("777#4").unwrap();

        // both caption-scoped identifiers resolve the same group member
        assert_eq!(first.to_rgb8().get_pixel(0, 0), again.to_rgb8().get_pixel(0, 0));
        assert_eq!(first.to_rgb8().get_pixel(0, 0)[0], 30);
    }

    #[test]
    fn test_grouped_empty_group_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "777_a.png", 20);

        let resolver = ImageResolver::new(dir.path(), CorpusVariant::Mscoco);
        let err = resolver.resolve("999#0").unwrap_err();
        assert!(matches!(err, Error::ImageResolve(ref msg) if msg.contains("999")));
    }

    #[test]
    fn test_custom_target_size() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 10);

        let resolver =
            ImageResolver::new(dir.path(), CorpusVariant::Flickr8k).with_target_size(224);
        let image = resolver.resolve("a.png").unwrap();
        assert_eq!(image.width(), 224);
        assert_eq!(image.height(), 224);
    }
}
