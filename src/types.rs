// src/types.rs

use std::str::FromStr;

use serde::Deserialize;

/// Digest algorithm used to fingerprint file contents.
///
/// Every algorithm has a stable numeric id that is persisted next to the
/// cache entries. A store written under one id is discarded as a whole when
/// loaded under another, so two algorithms never mix inside one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha256,
    /// Fast non-cryptographic content hash; the default.
    Blake3,
}

impl HashAlgorithm {
    /// Stable id stored in the fingerprint store.
    pub const fn id(self) -> u8 {
        match self {
            HashAlgorithm::Md5 => 0,
            HashAlgorithm::Sha256 => 1,
            HashAlgorithm::Blake3 => 2,
        }
    }

    /// Inverse of [`HashAlgorithm::id`]; `None` for ids written by a newer
    /// (or corrupted) store.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(HashAlgorithm::Md5),
            1 => Some(HashAlgorithm::Sha256),
            2 => Some(HashAlgorithm::Blake3),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Blake3
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(format!(
                "invalid hash algorithm: {other} (expected \"md5\", \"sha256\" or \"blake3\")"
            )),
        }
    }
}

/// Horizontal alignment of the prefixer's header tag inside its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAlign {
    Left,
    Center,
    Right,
}

impl FromStr for HeaderAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(HeaderAlign::Left),
            "center" | "centre" => Ok(HeaderAlign::Center),
            "right" => Ok(HeaderAlign::Right),
            other => Err(format!(
                "invalid align: {other} (expected \"left\", \"center\" or \"right\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_ids_round_trip() {
        for alg in [HashAlgorithm::Md5, HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            assert_eq!(HashAlgorithm::from_id(alg.id()), Some(alg));
        }
        assert_eq!(HashAlgorithm::from_id(250), None);
    }

    #[test]
    fn algorithm_from_str_accepts_sha_alias() {
        assert_eq!("sha".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert!("crc32".parse::<HashAlgorithm>().is_err());
    }
}
