mod utils;
pub mod common;
pub mod data;
pub mod detection_processing;
pub mod error;
pub mod hashing;
pub mod send_channels;
pub mod workers;

use std::time::Instant;
use image::DynamicImage;
use rayon::prelude::*;
use crate::common::{BvrBox, Fingerprint, PostProcessConfig};
use crate::detection_processing::PostProcessor;
use crate::hashing::PerceptualHasher;

pub use crate::error::{BvrError, ConfigError, GeometryError, HashError};

pub type Result<T, E = BvrError> = std::result::Result<T, E>;

/// Runs the full post-processing pipeline over one detector output.
pub fn postprocess(boxes: &[BvrBox], config: &PostProcessConfig) -> Vec<BvrBox> {
    PostProcessor::new(config.clone()).process(boxes)
}

/// [`postprocess`] over many frames in parallel. Output order follows `batches`.
pub fn postprocess_batch(batches: &[Vec<BvrBox>], config: &PostProcessConfig) -> Vec<Vec<BvrBox>> {
    let now = Instant::now();
    let processor = PostProcessor::new(config.clone());
    let out: Vec<Vec<BvrBox>> = batches.par_iter().map(|boxes| processor.process(boxes)).collect();
    log::debug!("Post-processed {} frames in {:?}", batches.len(), now.elapsed());
    out
}

pub fn generate_phash(image: &DynamicImage) -> Result<Fingerprint> {
    Ok(PerceptualHasher::new().hash(image)?)
}

/// Decodes `bytes` (any format the `image` crate sniffs) and hashes the result.
pub fn generate_phash_from_bytes(bytes: &[u8]) -> Result<Fingerprint> {
    Ok(PerceptualHasher::new().hash_bytes(bytes)?)
}
