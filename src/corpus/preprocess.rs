//! Decoded-image normalization

use image::{ColorType, DynamicImage, GenericImageView};
use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Channel handling applied by [`ImagePreprocessor`].
///
/// The policy is all-or-nothing: a single-channel input either comes back
/// unchanged or fully broadcast, never a mixed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPolicy {
    /// Upcast only. Grayscale stays (H, W, 1), color stays (H, W, 3).
    #[default]
    PassThrough,
    /// Broadcast single-channel input to three identical channels, then lay
    /// every image out channel-first as (3, H, W).
    BroadcastRgb,
}

/// Normalizes a decoded image into an f32 tensor.
///
/// Pixels are upcast to f32 in the 0..255 range. Alpha channels are
/// discarded. The default policy is [`ChannelPolicy::PassThrough`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePreprocessor {
    policy: ChannelPolicy,
}

impl ImagePreprocessor {
    /// Create a preprocessor with the given channel policy
    pub fn new(policy: ChannelPolicy) -> Self {
        Self { policy }
    }

    /// Configured channel policy
    pub fn policy(&self) -> ChannelPolicy {
        self.policy
    }

    /// Normalize a decoded image according to the channel policy
    pub fn normalize(&self, image: &DynamicImage) -> Array3<f32> {
        match self.policy {
            ChannelPolicy::PassThrough => self.pass_through(image),
            ChannelPolicy::BroadcastRgb => self.broadcast_rgb(image),
        }
    }

    fn pass_through(&self, image: &DynamicImage) -> Array3<f32> {
        let (w, h) = image.dimensions();
        let (w, h) = (w as usize, h as usize);
        if is_single_channel(image.color()) {
            let luma = image.to_luma8();
            Array3::from_shape_fn((h, w, 1), |(y, x, _)| {
                f32::from(luma.get_pixel(x as u32, y as u32)[0])
            })
        } else {
            let rgb = image.to_rgb8();
            Array3::from_shape_fn((h, w, 3), |(y, x, c)| {
                f32::from(rgb.get_pixel(x as u32, y as u32)[c])
            })
        }
    }

    fn broadcast_rgb(&self, image: &DynamicImage) -> Array3<f32> {
        let (w, h) = image.dimensions();
        let (w, h) = (w as usize, h as usize);
        if is_single_channel(image.color()) {
            let luma = image.to_luma8();
            Array3::from_shape_fn((3, h, w), |(_, y, x)| {
                f32::from(luma.get_pixel(x as u32, y as u32)[0])
            })
        } else {
            let rgb = image.to_rgb8();
            Array3::from_shape_fn((3, h, w), |(c, y, x)| {
                f32::from(rgb.get_pixel(x as u32, y as u32)[c])
            })
        }
    }
}

fn is_single_channel(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16
    )
}
