//! Raster decoding that preserves native pixel depth.
//!
//! Depth datasets mix 8/16-bit PNG renders with floating-point TIFF
//! exports, and metric values are only meaningful on the raw stored
//! samples. Decoding therefore never normalizes: a 16-bit source yields
//! values in 0-65535 and a float TIFF keeps its native range.
//!
//! # Example
//!
//! ```ignore
//! use depth_eval::decode::decode_depth;
//!
//! let depth = decode_depth(Path::new("exported_depth/frame_0042.tif"))?;
//! println!("{}x{}, {} channel(s)", depth.width(), depth.height(), depth.channels());
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::DynamicImage;

use crate::depth::DepthMap;
use crate::error::{Error, Result};

/// Decode a depth image from disk, preserving native bit depth.
///
/// TIFF files go through the raw `tiff` decoder so that 32-bit float
/// samples survive untouched; other formats (PNG, JPEG, BMP) go through
/// the `image` crate. The channel layout of the source is preserved.
///
/// # Errors
///
/// Returns [`Error::ImageLoad`] when the file cannot be decoded and
/// [`Error::UnsupportedFormat`] for sample formats the evaluator cannot
/// compare (signed-integer TIFF, palette images).
pub fn decode_depth(path: &Path) -> Result<DepthMap> {
    let is_tiff = path
        .extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff")
        });

    if is_tiff {
        decode_tiff(path)
    } else {
        let img = image::open(path).map_err(|e| Error::ImageLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        dynamic_to_depth(img)
    }
}

/// Convert a decoded `image` buffer to raw-valued samples.
fn dynamic_to_depth(img: DynamicImage) -> Result<DepthMap> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let (data, channels): (Vec<f32>, usize) = match img {
        DynamicImage::ImageLuma8(buf) => (buf.into_raw().iter().map(|&v| f32::from(v)).collect(), 1),
        DynamicImage::ImageLumaA8(buf) => {
            (buf.into_raw().iter().map(|&v| f32::from(v)).collect(), 2)
        }
        DynamicImage::ImageRgb8(buf) => (buf.into_raw().iter().map(|&v| f32::from(v)).collect(), 3),
        DynamicImage::ImageRgba8(buf) => {
            (buf.into_raw().iter().map(|&v| f32::from(v)).collect(), 4)
        }
        DynamicImage::ImageLuma16(buf) => {
            (buf.into_raw().iter().map(|&v| f32::from(v)).collect(), 1)
        }
        DynamicImage::ImageLumaA16(buf) => {
            (buf.into_raw().iter().map(|&v| f32::from(v)).collect(), 2)
        }
        DynamicImage::ImageRgb16(buf) => {
            (buf.into_raw().iter().map(|&v| f32::from(v)).collect(), 3)
        }
        DynamicImage::ImageRgba16(buf) => {
            (buf.into_raw().iter().map(|&v| f32::from(v)).collect(), 4)
        }
        DynamicImage::ImageRgb32F(buf) => (buf.into_raw(), 3),
        DynamicImage::ImageRgba32F(buf) => (buf.into_raw(), 4),
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "pixel layout {:?}",
                other.color()
            )));
        }
    };

    Ok(DepthMap::new(data, width, height, channels))
}

/// Decode a TIFF file through the raw `tiff` decoder.
fn decode_tiff(path: &Path) -> Result<DepthMap> {
    use tiff::decoder::{Decoder, DecodingResult, Limits};

    let file = File::open(path).map_err(|e| Error::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let load_err = |e: tiff::TiffError| Error::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(load_err)?
        .with_limits(Limits::default());

    let (width, height) = decoder.dimensions().map_err(load_err)?;
    let color_type = decoder.colortype().map_err(load_err)?;

    let channels = match color_type {
        tiff::ColorType::Gray(_) => 1,
        tiff::ColorType::GrayA(_) => 2,
        tiff::ColorType::RGB(_) => 3,
        tiff::ColorType::RGBA(_) => 4,
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "TIFF color type {other:?}"
            )));
        }
    };

    let data: Vec<f32> = match decoder.read_image().map_err(load_err)? {
        DecodingResult::U8(buf) => buf.iter().map(|&v| f32::from(v)).collect(),
        DecodingResult::U16(buf) => buf.iter().map(|&v| f32::from(v)).collect(),
        DecodingResult::U32(buf) => buf.iter().map(|&v| v as f32).collect(),
        DecodingResult::U64(buf) => buf.iter().map(|&v| v as f32).collect(),
        DecodingResult::F32(buf) => buf,
        DecodingResult::F64(buf) => buf.iter().map(|&v| v as f32).collect(),
        _ => {
            return Err(Error::UnsupportedFormat(
                "unsupported TIFF sample type".to_string(),
            ));
        }
    };

    Ok(DepthMap::new(
        data,
        width as usize,
        height as usize,
        channels,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};
    use tiff::encoder::{colortype, TiffEncoder};

    #[test]
    fn test_decode_png_u8_keeps_raw_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth.png");

        let buf: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_fn(4, 2, |x, y| Luma([(x + y * 4) as u8 * 10]));
        buf.save(&path).unwrap();

        let depth = decode_depth(&path).unwrap();
        assert_eq!(depth.shape(), (4, 2));
        assert_eq!(depth.channels(), 1);
        assert_eq!(depth.sample(0, 0, 0), 0.0);
        assert_eq!(depth.sample(3, 1, 0), 70.0);
    }

    #[test]
    fn test_decode_png_u16_keeps_raw_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth16.png");

        let buf: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_fn(2, 2, |x, y| Luma([1000 * (1 + x + y * 2) as u16]));
        buf.save(&path).unwrap();

        let depth = decode_depth(&path).unwrap();
        // No 1/65535 scaling: stored values come back verbatim.
        assert_eq!(depth.sample(0, 0, 0), 1000.0);
        assert_eq!(depth.sample(1, 1, 0), 4000.0);
    }

    #[test]
    fn test_decode_tiff_f32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth.tif");

        let samples: Vec<f32> = vec![0.5, 1.25, 2.75, 3.0, 4.5, 6.0];
        let file = File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder
            .write_image::<colortype::Gray32Float>(3, 2, &samples)
            .unwrap();

        let depth = decode_depth(&path).unwrap();
        assert_eq!(depth.shape(), (3, 2));
        assert_eq!(depth.channels(), 1);
        assert_eq!(depth.samples(), samples.as_slice());
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let result = decode_depth(Path::new("/nonexistent/depth.png"));
        assert!(matches!(result, Err(Error::ImageLoad { .. })));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_an_image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(decode_depth(&path).is_err());
    }
}
