//! Image loading and layout conversion.
//!
//! Converts decoded images into the planar float buffers the predictor
//! consumes. Values stay in the 0-255 range; mean subtraction happens in
//! the predictor.

use crate::core::config::ConfigError;
use crate::core::errors::{PredError, PredResult};
use image::{DynamicImage, ImageBuffer, Pixel, RgbImage, imageops::FilterType};
use ndarray::Array3;

/// Converts a DynamicImage to RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// Returns `PredError::ImageLoad` if the image cannot be opened or decoded.
pub fn load_image(path: &std::path::Path) -> PredResult<RgbImage> {
    let img = image::open(path).map_err(PredError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Resizes `img` to `width x height` and lays it out as `(channels, height,
/// width)` floats.
///
/// `channels` selects the colour layout: 1 for luma, 3 for RGB. Images
/// already at the target size are not resampled.
///
/// # Errors
///
/// `PredError::Config` for any other channel count.
pub fn image_to_chw(
    img: &DynamicImage,
    width: u32,
    height: u32,
    channels: u32,
) -> PredResult<Array3<f32>> {
    let shape = (channels as usize, height as usize, width as usize);
    match channels {
        1 => {
            let luma = resize_to(img.to_luma8(), width, height);
            Ok(Array3::from_shape_fn(shape, |(_, y, x)| {
                f32::from(luma.get_pixel(x as u32, y as u32)[0])
            }))
        }
        3 => {
            let rgb = resize_to(img.to_rgb8(), width, height);
            Ok(Array3::from_shape_fn(shape, |(c, y, x)| {
                f32::from(rgb.get_pixel(x as u32, y as u32)[c])
            }))
        }
        other => Err(ConfigError::InvalidGeometry {
            message: format!("image preprocessing supports 1 or 3 channels, got {other}"),
        }
        .into()),
    }
}

fn resize_to<P>(img: ImageBuffer<P, Vec<u8>>, width: u32, height: u32) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    if img.dimensions() == (width, height) {
        img
    } else {
        image::imageops::resize(&img, width, height, FilterType::Triangle)
    }
}

/// Flattens a CHW array into the contiguous buffer `predict` expects.
pub fn flatten_chw(chw: Array3<f32>) -> Vec<f32> {
    if chw.is_standard_layout() {
        chw.into_raw_vec_and_offset().0
    } else {
        chw.iter().copied().collect()
    }
}

/// Loads `path` and returns a flat CHW buffer of `channels * width * height`
/// values.
pub fn load_image_buffer(
    path: &std::path::Path,
    width: u32,
    height: u32,
    channels: u32,
) -> PredResult<Vec<f32>> {
    let img = image::open(path).map_err(PredError::ImageLoad)?;
    Ok(flatten_chw(image_to_chw(&img, width, height, channels)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};

    #[test]
    fn test_image_to_chw_layout() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(1, 0, Rgb([40, 50, 60]));

        let chw = image_to_chw(&DynamicImage::ImageRgb8(img), 2, 1, 3).unwrap();
        assert_eq!(chw.shape(), &[3, 1, 2]);
        assert_eq!(
            flatten_chw(chw),
            vec![10.0, 40.0, 20.0, 50.0, 30.0, 60.0]
        );
    }

    #[test]
    fn test_image_to_chw_resizes() {
        let img = RgbImage::from_pixel(8, 4, Rgb([7, 7, 7]));
        let chw = image_to_chw(&DynamicImage::ImageRgb8(img), 4, 2, 3).unwrap();
        assert_eq!(chw.shape(), &[3, 2, 4]);
        assert!(chw.iter().all(|&v| (v - 7.0).abs() < 1e-6));
    }

    #[test]
    fn test_image_to_chw_single_channel() {
        let img = GrayImage::from_pixel(2, 2, Luma([9]));
        let chw = image_to_chw(&DynamicImage::ImageLuma8(img), 2, 2, 1).unwrap();
        assert_eq!(chw.shape(), &[1, 2, 2]);
        assert_eq!(flatten_chw(chw), vec![9.0; 4]);
    }

    #[test]
    fn test_image_to_chw_unsupported_channels() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let result = image_to_chw(&img, 2, 2, 4);
        assert!(matches!(result, Err(PredError::Config(_))));
    }

    #[test]
    fn test_load_image_buffer_matches_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        RgbImage::from_pixel(2, 2, Rgb([30, 60, 90])).save(&path).unwrap();

        let gray = load_image_buffer(&path, 2, 2, 1).unwrap();
        assert_eq!(gray.len(), 4);
        let rgb = load_image_buffer(&path, 2, 2, 3).unwrap();
        assert_eq!(rgb.len(), 12);
        assert_eq!(&rgb[..4], &[30.0; 4]);
    }

    #[test]
    fn test_load_missing_image() {
        let result = load_image(std::path::Path::new("/nonexistent/cat.jpg"));
        assert!(matches!(result, Err(PredError::ImageLoad(_))));
    }
}
