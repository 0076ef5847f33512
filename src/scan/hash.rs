// src/scan/hash.rs

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use sha2::Sha256;

use crate::fs::FileSystem;
use crate::types::HashAlgorithm;

/// Block size for streaming reads. Files are never materialized whole.
pub const BLOCK_SIZE: usize = 64 * 1024;

/// Compute the digest of a single file with the given algorithm.
///
/// Digests are raw bytes; nothing in the scan path ever needs a hex form.
/// An open or read error is returned to the caller, which treats the file
/// as unreadable for this pass rather than aborting the scan.
pub fn digest_file(
    fs: &dyn FileSystem,
    path: &Path,
    algorithm: HashAlgorithm,
) -> Result<Vec<u8>> {
    let mut reader = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;

    let digest = match algorithm {
        HashAlgorithm::Md5 => digest_reader::<Md5>(&mut reader),
        HashAlgorithm::Sha256 => digest_reader::<Sha256>(&mut reader),
        HashAlgorithm::Blake3 => digest_reader_blake3(&mut reader),
    };

    digest.with_context(|| format!("reading file for hashing: {:?}", path))
}

fn digest_reader<D: Digest>(reader: &mut dyn Read) -> std::io::Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; BLOCK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_vec())
}

fn digest_reader_blake3(reader: &mut dyn Read) -> std::io::Result<Vec<u8>> {
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; BLOCK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::PathBuf;

    fn mock_with(content: &[u8]) -> (MockFileSystem, PathBuf) {
        let fs = MockFileSystem::new();
        let path = PathBuf::from("/data/file.bin");
        fs.add_file(&path, content);
        (fs, path)
    }

    #[test]
    fn digest_is_stable_for_same_content() {
        let (fs, path) = mock_with(b"hello world");
        let a = digest_file(&fs, &path, HashAlgorithm::Blake3).unwrap();
        let b = digest_file(&fs, &path, HashAlgorithm::Blake3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn digest_differs_across_algorithms() {
        let (fs, path) = mock_with(b"hello world");
        let md5 = digest_file(&fs, &path, HashAlgorithm::Md5).unwrap();
        let sha = digest_file(&fs, &path, HashAlgorithm::Sha256).unwrap();
        let b3 = digest_file(&fs, &path, HashAlgorithm::Blake3).unwrap();
        assert_eq!(md5.len(), 16);
        assert_eq!(sha.len(), 32);
        assert_eq!(b3.len(), 32);
        assert_ne!(sha, b3);
    }

    #[test]
    fn digest_streams_past_one_block() {
        // Content larger than one read block must hash the same as the
        // equivalent single-shot digest.
        let content = vec![0xabu8; BLOCK_SIZE * 2 + 17];
        let (fs, path) = mock_with(&content);

        let streamed = digest_file(&fs, &path, HashAlgorithm::Blake3).unwrap();
        let direct = blake3::hash(&content);
        assert_eq!(streamed, direct.as_bytes().to_vec());
    }

    #[test]
    fn empty_file_digests_fine() {
        let (fs, path) = mock_with(b"");
        let digest = digest_file(&fs, &path, HashAlgorithm::Md5).unwrap();
        assert_eq!(digest.len(), 16);
    }

    #[test]
    fn missing_file_is_an_error() {
        let fs = MockFileSystem::new();
        assert!(digest_file(&fs, Path::new("/gone"), HashAlgorithm::Blake3).is_err());
    }
}
