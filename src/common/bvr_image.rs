use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use crate::error::HashError;

/// Decoded image handed to the hasher, in whatever color mode it arrived.
#[derive(Debug, Clone)]
pub struct BvrImage {
    pub image: DynamicImage,
    pub img_width: u32,
    pub img_height: u32,
}

impl From<DynamicImage> for BvrImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl From<GrayImage> for BvrImage {
    fn from(image: GrayImage) -> Self {
        Self::new(DynamicImage::from(image))
    }
}

impl From<GrayAlphaImage> for BvrImage {
    fn from(image: GrayAlphaImage) -> Self {
        Self::new(DynamicImage::from(image))
    }
}

impl From<RgbImage> for BvrImage {
    fn from(image: RgbImage) -> Self {
        Self::new(DynamicImage::from(image))
    }
}

impl From<RgbaImage> for BvrImage {
    fn from(image: RgbaImage) -> Self {
        Self::new(DynamicImage::from(image))
    }
}

impl BvrImage {
    pub fn new(image: DynamicImage) -> Self {
        let (img_width, img_height) = (image.width(), image.height());
        Self {
            image,
            img_width,
            img_height,
        }
    }

    /// Decodes an encoded image (PNG, JPEG, ...) with format sniffing.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(image))
    }

    pub fn is_empty(&self) -> bool {
        self.img_width == 0 || self.img_height == 0
    }
}
