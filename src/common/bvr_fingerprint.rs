use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::error::HashError;

pub const FINGERPRINT_BITS: usize = 64;

/// 64-bit perceptual fingerprint.
///
/// Bit `i` of the raster order lives at bit position `63 - i` of the inner `u64`, so
/// both [`Fingerprint::to_bit_string`] and [`Fingerprint::to_hex`] read left to right
/// in raster order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn from_bits(bits: &[bool; FINGERPRINT_BITS]) -> Self {
        let value = bits
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | bit as u64);
        Self(value)
    }

    /// Raster-order bit `i`. Panics if `i >= 64`.
    pub fn bit(&self, i: usize) -> bool {
        assert!(i < FINGERPRINT_BITS, "bit index {i} out of range");
        (self.0 >> (FINGERPRINT_BITS - 1 - i)) & 1 == 1
    }

    pub fn bits(&self) -> [bool; FINGERPRINT_BITS] {
        let mut bits = [false; FINGERPRINT_BITS];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = self.bit(i);
        }
        bits
    }

    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn to_bit_string(&self) -> String {
        format!("{:064b}", self.0)
    }

    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }

    /// Number of differing bits.
    pub fn hamming_distance(&self, other: &Fingerprint) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// `hamming_distance(other) <= threshold`.
    pub fn is_similar(&self, other: &Fingerprint, threshold: u32) -> bool {
        self.hamming_distance(other) <= threshold
    }

    /// `1 - distance / 64`, so identical fingerprints score `1.0`.
    pub fn similarity(&self, other: &Fingerprint) -> f32 {
        1.0 - self.hamming_distance(other) as f32 / FINGERPRINT_BITS as f32
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

impl FromStr for Fingerprint {
    type Err = HashError;

    /// Accepts 64 `'0'`/`'1'` characters or 16 hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.len() {
            FINGERPRINT_BITS => {
                if !s.bytes().all(|c| c == b'0' || c == b'1') {
                    return Err(HashError::InvalidFingerprint(format!("non-binary digit in {s:?}")));
                }
                u64::from_str_radix(s, 2)
                    .map(Self)
                    .map_err(|e| HashError::InvalidFingerprint(e.to_string()))
            }
            16 => {
                if !s.bytes().all(|c| c.is_ascii_hexdigit()) {
                    return Err(HashError::InvalidFingerprint(format!("non-hex digit in {s:?}")));
                }
                u64::from_str_radix(s, 16)
                    .map(Self)
                    .map_err(|e| HashError::InvalidFingerprint(e.to_string()))
            }
            n => Err(HashError::InvalidFingerprint(format!(
                "expected {FINGERPRINT_BITS} bits or 16 hex digits, got {n} characters"
            ))),
        }
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bit_string())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
