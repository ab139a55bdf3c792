//! Digest Algorithm Value Object
//!
//! Selects the SHA-2 variant used to fingerprint file content.

use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::error::ConfigError;

/// Read size used when streaming file content
pub const CHUNK_SIZE: usize = 8192;

/// Supported content digests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha224 => "sha224",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }

    /// Hex digest of everything readable from `reader`, in fixed-size chunks
    pub fn digest_reader<R: Read>(self, reader: R) -> io::Result<String> {
        match self {
            DigestAlgorithm::Sha224 => stream::<Sha224, R>(reader),
            DigestAlgorithm::Sha256 => stream::<Sha256, R>(reader),
            DigestAlgorithm::Sha384 => stream::<Sha384, R>(reader),
            DigestAlgorithm::Sha512 => stream::<Sha512, R>(reader),
        }
    }

    pub fn digest_bytes(self, bytes: &[u8]) -> String {
        // Reading from a slice can't fail
        self.digest_reader(bytes).unwrap_or_default()
    }
}

fn stream<D: Digest, R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect())
}

impl FromStr for DigestAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "").as_str() {
            "sha224" => Ok(DigestAlgorithm::Sha224),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha384" => Ok(DigestAlgorithm::Sha384),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(ConfigError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sha256() {
        assert_eq!(DigestAlgorithm::default(), DigestAlgorithm::Sha256);
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            DigestAlgorithm::Sha256.digest_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn digest_lengths() {
        assert_eq!(DigestAlgorithm::Sha224.digest_bytes(b"x").len(), 56);
        assert_eq!(DigestAlgorithm::Sha384.digest_bytes(b"x").len(), 96);
        assert_eq!(DigestAlgorithm::Sha512.digest_bytes(b"x").len(), 128);
    }

    #[test]
    fn streaming_matches_one_shot_across_chunks() {
        let content = vec![7u8; CHUNK_SIZE * 3 + 11];
        let streamed = DigestAlgorithm::Sha256
            .digest_reader(std::io::Cursor::new(content.clone()))
            .unwrap();
        let mut hasher = Sha256::new();
        hasher.update(&content);
        assert_eq!(streamed, format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn every_variant_streams_to_lowercase_hex() {
        for algorithm in [
            DigestAlgorithm::Sha224,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            let hex = algorithm.digest_reader(std::io::Cursor::new(b"abc")).unwrap();
            assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
        assert_eq!(
            DigestAlgorithm::Sha224.digest_bytes(b"abc"),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
    }

    #[test]
    fn parse_accepts_dashed_names() {
        assert_eq!("SHA-512".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha512);
        assert!("md5".parse::<DigestAlgorithm>().is_err());
    }
}
