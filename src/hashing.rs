//! Perceptual hashing for near-duplicate detection.
//!
//! Pipeline: luminance → 32×32 Lanczos3 resample → orthonormal 2-D DCT-II → 8×8
//! lowest-frequency block (row-major, vertical frequency major) → split on the
//! median of the 63 AC coefficients. Bit 0 belongs to the DC term and is always `0`,
//! which makes the fingerprint insensitive to uniform brightness changes.

pub mod dct;
mod image_ops;

use std::time::Instant;
use image::DynamicImage;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::common::{BvrImage, Fingerprint, FINGERPRINT_BITS};
use crate::error::HashError;
use crate::utils;
use self::dct::DctBasis;

pub const HASH_RESAMPLE_SIZE: u32 = 32;
pub const HASH_BLOCK_SIZE: usize = 8;

/// Coefficients smaller than this are treated as exactly zero.
const FLUSH_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct PerceptualHasher {
    basis: DctBasis,
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PerceptualHasher {
    pub fn new() -> Self {
        Self {
            basis: DctBasis::new(HASH_RESAMPLE_SIZE as usize, HASH_BLOCK_SIZE),
        }
    }

    pub fn hash(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(HashError::EmptyImage { width, height });
        }

        let start = Instant::now();
        let mut elapsed = start.elapsed();

        let reduced = image_ops::reduce_luma(image, HASH_RESAMPLE_SIZE);
        elapsed = utils::trace("PHASH", "Reduce", start, elapsed);

        let coeffs = self.basis.low_frequencies(&image_ops::to_matrix(&reduced));
        let fingerprint = median_split(&coeffs);
        utils::trace("PHASH", "DCT", start, elapsed);

        Ok(fingerprint)
    }

    pub fn hash_bvr_image(&self, image: &BvrImage) -> Result<Fingerprint, HashError> {
        if image.is_empty() {
            return Err(HashError::EmptyImage { width: image.img_width, height: image.img_height });
        }
        self.hash(&image.image)
    }

    /// Decodes an encoded image and hashes it.
    pub fn hash_bytes(&self, bytes: &[u8]) -> Result<Fingerprint, HashError> {
        let image = BvrImage::from_bytes(bytes)?;
        self.hash_bvr_image(&image)
    }

    /// Hashes every image in parallel. Results line up with `images`.
    pub fn hash_batch(&self, images: &[DynamicImage]) -> Vec<Result<Fingerprint, HashError>> {
        let results: Vec<_> = images.par_iter().map(|img| self.hash(img)).collect();
        log::debug!(
            "Hashed {} images ({} failed)",
            images.len(),
            results.iter().filter(|r| r.is_err()).count()
        );
        results
    }
}

fn median_split(coeffs: &Array2<f64>) -> Fingerprint {
    let flat: Vec<f64> = coeffs
        .iter()
        .map(|&c| if c.abs() < FLUSH_EPSILON { 0.0 } else { c })
        .collect();

    let mut ac: Vec<f64> = flat.iter().skip(1).copied().collect();
    ac.sort_by(|a, b| a.total_cmp(b));
    let median = ac.get(ac.len() / 2).copied().unwrap_or(0.0);

    let mut bits = [false; FINGERPRINT_BITS];
    for (bit, &c) in bits.iter_mut().zip(flat.iter()).skip(1) {
        *bit = c > median;
    }
    Fingerprint::from_bits(&bits)
}

/// Bitwise distance between two `'0'`/`'1'` strings of equal length.
pub fn hamming_distance(h1: &str, h2: &str) -> Result<u32, HashError> {
    check_bit_string(h1)?;
    check_bit_string(h2)?;
    if h1.len() != h2.len() {
        return Err(HashError::LengthMismatch { left: h1.len(), right: h2.len() });
    }
    Ok(h1.bytes().zip(h2.bytes()).filter(|(a, b)| a != b).count() as u32)
}

fn check_bit_string(h: &str) -> Result<(), HashError> {
    match h.char_indices().find(|(_, c)| !matches!(c, '0' | '1')) {
        Some((offset, c)) => Err(HashError::InvalidFingerprint(format!(
            "unexpected character {c:?} at byte {offset}"
        ))),
        None => Ok(()),
    }
}

pub fn is_similar(h1: &str, h2: &str, threshold: u32) -> Result<bool, HashError> {
    Ok(hamming_distance(h1, h2)? <= threshold)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarMatch {
    pub index: usize,
    pub distance: u32,
    pub similarity: f32,
}

/// Candidates within `max_distance` of `target`, closest first. Equal distances keep
/// candidate order.
pub fn find_similar(target: &Fingerprint, candidates: &[Fingerprint], max_distance: u32) -> Vec<SimilarMatch> {
    let mut matches: Vec<SimilarMatch> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, fp)| {
            let distance = target.hamming_distance(fp);
            (distance <= max_distance).then(|| SimilarMatch {
                index,
                distance,
                similarity: target.similarity(fp),
            })
        })
        .collect();
    matches.sort_by_key(|m| m.distance);
    matches
}

/// Groups indexes that are linked, directly or through other members, by a distance
/// of at most `max_distance`.
///
/// Singletons are left out. Members are ascending and groups are ordered by their
/// first member.
pub fn group_near_duplicates(fingerprints: &[Fingerprint], max_distance: u32) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..fingerprints.len()).collect();

    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..fingerprints.len() {
        for j in (i + 1)..fingerprints.len() {
            if fingerprints[i].is_similar(&fingerprints[j], max_distance) {
                let (ri, rj) = (root(&mut parent, i), root(&mut parent, j));
                if ri != rj {
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut slot: Vec<Option<usize>> = vec![None; fingerprints.len()];
    for i in 0..fingerprints.len() {
        let r = root(&mut parent, i);
        match slot[r] {
            Some(g) => groups[g].push(i),
            None => {
                slot[r] = Some(groups.len());
                groups.push(vec![i]);
            }
        }
    }
    groups.retain(|g| g.len() > 1);
    groups
}
