//! Luminance reduction ahead of the frequency transform.

use fast_image_resize::{FilterType as FirFilter, ResizeAlg, ResizeOptions, Resizer};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GrayImage};
use ndarray::Array2;

/// Flattens `image` to luminance and resamples it to `size`×`size` with Lanczos3.
///
/// `fast_image_resize` does the work; if it refuses the input the `image` crate's
/// resampler is used instead.
pub(crate) fn reduce_luma(image: &DynamicImage, size: u32) -> GrayImage {
    let gray = DynamicImage::ImageLuma8(image.to_luma8());

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FirFilter::Lanczos3));

    let mut reduced = DynamicImage::new(size, size, ColorType::L8);
    if let Err(err) = resizer.resize(&gray, &mut reduced, &options) {
        log::warn!("Failed to use `fast_image_resize` ({err}). Falling back.");
        return image::imageops::resize(&gray.to_luma8(), size, size, FilterType::Lanczos3);
    }
    reduced.into_luma8()
}

/// Pixel grid as `f64`, indexed `[row, column]`.
pub(crate) fn to_matrix(gray: &GrayImage) -> Array2<f64> {
    let (w, h) = gray.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(y, x)| gray.get_pixel(x as u32, y as u32).0[0] as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn reduces_any_size_to_square() {
        for (w, h) in [(1, 1), (7, 300), (640, 480), (32, 32)] {
            let img = DynamicImage::from(RgbImage::from_pixel(w, h, Rgb([10, 200, 30])));
            let reduced = reduce_luma(&img, 32);
            assert_eq!(reduced.dimensions(), (32, 32));
        }
    }

    #[test]
    fn solid_input_stays_solid() {
        let img = DynamicImage::from(GrayImage::from_pixel(100, 60, Luma([123])));
        let reduced = reduce_luma(&img, 32);
        assert!(reduced.pixels().all(|p| p.0[0] == 123));
    }

    #[test]
    fn matrix_is_row_major() {
        let mut gray = GrayImage::new(3, 2);
        gray.put_pixel(2, 0, Luma([9]));
        let m = to_matrix(&gray);
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m[[0, 2]], 9.0);
    }
}
