//! Dimension reconciliation for prediction/ground-truth pairs.
//!
//! Exported depth maps frequently differ from the prediction resolution
//! (undistortion crops, decimated renders). Before metric computation both
//! arrays are brought to the smaller per-axis extent, so metrics are always
//! computed over real samples instead of extrapolated ones.

use serde::{Deserialize, Serialize};

use crate::depth::DepthMap;
use crate::error::{Error, Result};

/// Resampling filter used when shrinking a depth map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Nearest-neighbor sampling. Keeps exact source values.
    Nearest,
    /// Bilinear interpolation. Matches the usual resize default for
    /// continuous depth data.
    #[default]
    Bilinear,
}

/// Resize both maps to their common (per-axis minimum) extent.
///
/// Inputs already at the target size are returned unchanged. Channel
/// counts must match.
///
/// # Errors
///
/// Returns [`Error::ChannelMismatch`] when the two maps carry different
/// numbers of channels.
pub fn resize_to_common(
    a: &DepthMap,
    b: &DepthMap,
    filter: ResampleFilter,
) -> Result<(DepthMap, DepthMap)> {
    if a.channels() != b.channels() {
        return Err(Error::ChannelMismatch {
            expected: a.channels(),
            actual: b.channels(),
        });
    }

    let width = a.width().min(b.width());
    let height = a.height().min(b.height());

    Ok((resize(a, width, height, filter), resize(b, width, height, filter)))
}

/// Resize a single map to `width` x `height`.
///
/// Returns a clone when the map is already at the target size.
#[must_use]
pub fn resize(map: &DepthMap, width: usize, height: usize, filter: ResampleFilter) -> DepthMap {
    if map.shape() == (width, height) {
        return map.clone();
    }

    let channels = map.channels();
    let mut data = Vec::with_capacity(width * height * channels);

    let x_scale = map.width() as f32 / width as f32;
    let y_scale = map.height() as f32 / height as f32;

    for y in 0..height {
        for x in 0..width {
            match filter {
                ResampleFilter::Nearest => {
                    let sx = nearest_index(x, x_scale, map.width());
                    let sy = nearest_index(y, y_scale, map.height());
                    for c in 0..channels {
                        data.push(map.sample(sx, sy, c));
                    }
                }
                ResampleFilter::Bilinear => {
                    let (x0, x1, fx) = bilinear_coords(x, x_scale, map.width());
                    let (y0, y1, fy) = bilinear_coords(y, y_scale, map.height());
                    for c in 0..channels {
                        let top = lerp(map.sample(x0, y0, c), map.sample(x1, y0, c), fx);
                        let bottom = lerp(map.sample(x0, y1, c), map.sample(x1, y1, c), fx);
                        data.push(lerp(top, bottom, fy));
                    }
                }
            }
        }
    }

    DepthMap::new(data, width, height, channels)
}

/// Source index for nearest-neighbor sampling, center-aligned.
fn nearest_index(target: usize, scale: f32, source_len: usize) -> usize {
    let src = (target as f32 + 0.5) * scale;
    (src as usize).min(source_len - 1)
}

/// Neighboring source indices and interpolation fraction, center-aligned
/// with edge clamping.
fn bilinear_coords(target: usize, scale: f32, source_len: usize) -> (usize, usize, f32) {
    let src = ((target as f32 + 0.5) * scale - 0.5).max(0.0);
    let lo = (src as usize).min(source_len - 1);
    let hi = (lo + 1).min(source_len - 1);
    (lo, hi, src - lo as f32)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_map(width: usize, height: usize, value: f32) -> DepthMap {
        DepthMap::new(vec![value; width * height], width, height, 1)
    }

    #[test]
    fn test_resize_to_common_picks_per_axis_minimum() {
        let a = constant_map(120, 100, 1.0);
        let b = constant_map(100, 100, 2.0);

        let (ra, rb) = resize_to_common(&a, &b, ResampleFilter::Bilinear).unwrap();
        assert_eq!(ra.shape(), (100, 100));
        assert_eq!(rb.shape(), (100, 100));
        assert_eq!(ra.len(), 10_000);
    }

    #[test]
    fn test_matching_shapes_pass_through() {
        let a = constant_map(8, 8, 3.0);
        let b = constant_map(8, 8, 4.0);

        let (ra, rb) = resize_to_common(&a, &b, ResampleFilter::Bilinear).unwrap();
        assert_eq!(ra, a);
        assert_eq!(rb, b);
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let a = DepthMap::new(vec![1.0; 4], 2, 2, 1);
        let b = DepthMap::new(vec![1.0; 12], 2, 2, 3);

        let result = resize_to_common(&a, &b, ResampleFilter::Bilinear);
        assert!(matches!(result, Err(Error::ChannelMismatch { .. })));
    }

    #[test]
    fn test_bilinear_downscale_averages() {
        let map = DepthMap::new(vec![0.0, 2.0, 4.0, 6.0], 2, 2, 1);
        let out = resize(&map, 1, 1, ResampleFilter::Bilinear);
        assert_eq!(out.sample(0, 0, 0), 3.0);
    }

    #[test]
    fn test_nearest_keeps_source_values() {
        let map = DepthMap::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], 3, 3, 1);
        let out = resize(&map, 2, 2, ResampleFilter::Nearest);
        for y in 0..2 {
            for x in 0..2 {
                assert!(map.samples().contains(&out.sample(x, y, 0)));
            }
        }
    }

    #[test]
    fn test_constant_field_survives_bilinear() {
        let map = constant_map(7, 5, 4.25);
        let out = resize(&map, 4, 3, ResampleFilter::Bilinear);
        assert!(out.samples().iter().all(|&v| (v - 4.25).abs() < 1e-6));
    }
}
