//! Visual comparison rendering for image/depth pairs.
//!
//! Renders a depth map as a false-color heatmap and blends it over the
//! corresponding camera image, for eyeballing whether an exported depth
//! actually lines up with the scene. Configuration is explicit per call;
//! outputs are plain RGB buffers the caller can save as PNG.

use image::{GrayImage, Rgb, RgbImage};

use crate::depth::DepthMap;
use crate::error::{Error, Result};

/// Configuration for heatmap and overlay rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Heatmap weight in the overlay blend (the camera image gets
    /// `1 - alpha`).
    pub alpha: f32,

    /// Map near depths to bright colors. Matches the usual convention
    /// where close surfaces glow and the background stays dark.
    pub invert: bool,

    /// Lower normalization bound override. Defaults to the smallest
    /// strictly positive sample (zeros are missing data).
    pub min_depth: Option<f32>,

    /// Upper normalization bound override. Defaults to the largest sample.
    pub max_depth: Option<f32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            invert: true,
            min_depth: None,
            max_depth: None,
        }
    }
}

/// Normalize the first channel of a depth map to `[0, 1]`.
///
/// The lower bound is the minimum over strictly positive samples so that
/// zero-valued holes do not stretch the range; samples below the bound
/// clamp to 0.
///
/// # Errors
///
/// Returns [`Error::Render`] when the depth range is empty (no positive
/// samples, or a constant field).
pub fn normalize(depth: &DepthMap, config: &RenderConfig) -> Result<Vec<f32>> {
    let min = config
        .min_depth
        .or_else(|| depth.min_positive())
        .ok_or_else(|| Error::Render("depth map has no positive samples".to_string()))?;
    let max = config
        .max_depth
        .or_else(|| depth.max_sample())
        .ok_or_else(|| Error::Render("depth map is empty".to_string()))?;

    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Err(Error::Render(format!(
            "depth range [{min}, {max}] is empty"
        )));
    }

    let plane = (0..depth.height())
        .flat_map(|y| (0..depth.width()).map(move |x| (x, y)))
        .map(|(x, y)| ((depth.sample(x, y, 0) - min) / range).clamp(0.0, 1.0))
        .collect();
    Ok(plane)
}

/// Render a depth map as an inferno-style false-color heatmap.
pub fn heatmap(depth: &DepthMap, config: &RenderConfig) -> Result<RgbImage> {
    let plane = normalize(depth, config)?;
    let width = depth.width() as u32;
    let height = depth.height() as u32;

    let mut out = RgbImage::new(width, height);
    for (i, &t) in plane.iter().enumerate() {
        let t = if config.invert { 1.0 - t } else { t };
        let x = (i as u32) % width;
        let y = (i as u32) / width;
        out.put_pixel(x, y, Rgb(inferno(t)));
    }
    Ok(out)
}

/// Blend a heatmap over a grayscale camera image.
///
/// The heatmap is resized to the camera image's dimensions when they
/// differ. `alpha` is the heatmap weight.
#[must_use]
pub fn overlay(base: &GrayImage, heat: &RgbImage, alpha: f32) -> RgbImage {
    let (width, height) = base.dimensions();

    let heat = if heat.dimensions() == (width, height) {
        heat.clone()
    } else {
        image::imageops::resize(heat, width, height, image::imageops::FilterType::Triangle)
    };

    let alpha = alpha.clamp(0.0, 1.0);
    let mut out = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let g = f32::from(base.get_pixel(x, y)[0]);
            let h = heat.get_pixel(x, y);
            let blend = |c: u8| (g * (1.0 - alpha) + f32::from(c) * alpha).round() as u8;
            out.put_pixel(x, y, Rgb([blend(h[0]), blend(h[1]), blend(h[2])]));
        }
    }
    out
}

/// Render both outputs for an image/depth pair loaded from disk.
///
/// The camera image is loaded as grayscale; the depth map at native bit
/// depth. Returns `(heatmap, overlay)`.
pub fn render_comparison(
    image_path: &std::path::Path,
    depth_path: &std::path::Path,
    config: &RenderConfig,
) -> Result<(RgbImage, RgbImage)> {
    let base = image::open(image_path)
        .map_err(|e| Error::ImageLoad {
            path: image_path.to_path_buf(),
            reason: e.to_string(),
        })?
        .into_luma8();
    let depth = crate::decode::decode_depth(depth_path)?;

    let heat = heatmap(&depth, config)?;
    let blended = overlay(&base, &heat, config.alpha);
    Ok((heat, blended))
}

/// Inferno-style colormap lookup for `t` in `[0, 1]`.
///
/// Linear interpolation over a compact anchor table; dark violet at 0,
/// bright yellow at 1.
#[must_use]
pub fn inferno(t: f32) -> [u8; 3] {
    const ANCHORS: [[f32; 3]; 9] = [
        [0.0, 0.0, 4.0],
        [27.0, 12.0, 65.0],
        [74.0, 12.0, 107.0],
        [120.0, 28.0, 109.0],
        [165.0, 44.0, 96.0],
        [207.0, 68.0, 70.0],
        [237.0, 105.0, 37.0],
        [251.0, 155.0, 6.0],
        [252.0, 255.0, 164.0],
    ];

    let t = t.clamp(0.0, 1.0) * (ANCHORS.len() - 1) as f32;
    let lo = (t as usize).min(ANCHORS.len() - 2);
    let frac = t - lo as f32;

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let v = ANCHORS[lo][i] + (ANCHORS[lo + 1][i] - ANCHORS[lo][i]) * frac;
        *channel = v.round() as u8;
    }
    rgb
}
