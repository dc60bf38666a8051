//! Order-sensitive digests over id sequences.
//!
//! A digest is the lowercase hex hash of the compact JSON array text of the
//! ids, e.g. `[3,5]` or `[]`. This is exactly what a browser produces with
//! `crypto.subtle.digest(alg, JSON.stringify(ids))`, so both ends of the
//! protocol agree without a shared library.

use crate::error::CoreError;
use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use std::fmt::{self, Write};
use std::str::FromStr;

/// Hash function used for digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    /// SHA-1, 40 hex characters.
    #[default]
    Sha1,
    /// SHA-256, 64 hex characters.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the short name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }

    /// Digests a sequence of ids.
    pub fn digest<I>(&self, ids: I) -> Digest
    where
        I: IntoIterator<Item = ItemId>,
    {
        match self {
            DigestAlgorithm::Sha1 => hash_json_array(sha1::Sha1::new(), ids),
            DigestAlgorithm::Sha256 => hash_json_array(sha2::Sha256::new(), ids),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            _ => Err(CoreError::UnknownDigestAlgorithm(s.to_string())),
        }
    }
}

/// Streams `[id,id,...]` into the hasher without building the text.
fn hash_json_array<H, I>(mut hasher: H, ids: I) -> Digest
where
    H: sha2::Digest,
    I: IntoIterator<Item = ItemId>,
{
    let mut buf = String::with_capacity(20);
    hasher.update(b"[");
    for (i, id) in ids.into_iter().enumerate() {
        if i > 0 {
            hasher.update(b",");
        }
        buf.clear();
        let _ = write!(buf, "{id}");
        hasher.update(buf.as_bytes());
    }
    hasher.update(b"]");
    Digest(hex::encode(hasher.finalize()))
}

/// Fingerprint of an ordered id sequence, as lowercase hex.
///
/// Digests received from clients are normalized to lowercase, so
/// comparison is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Returns the hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Digest {
    fn from(mut hex: String) -> Self {
        hex.make_ascii_lowercase();
        Digest(hex)
    }
}

impl From<&str> for Digest {
    fn from(hex: &str) -> Self {
        Digest::from(hex.to_string())
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        // sha1("[]") and sha1("[1,2,3]")
        assert_eq!(
            DigestAlgorithm::Sha1.digest(std::iter::empty()).as_str(),
            "97d170e1550eee4afc0af065b78cda302a97674c"
        );
        assert_eq!(
            DigestAlgorithm::Sha1.digest([1, 2, 3]).as_str(),
            "9ef50cc82ae474279fb8e82896142702bccbb33a"
        );
    }

    #[test]
    fn deterministic() {
        let ids = vec![5u64, 3, 1_000_000];
        for algorithm in [DigestAlgorithm::Sha1, DigestAlgorithm::Sha256] {
            assert_eq!(
                algorithm.digest(ids.iter().copied()),
                algorithm.digest(ids.iter().copied())
            );
        }
    }

    #[test]
    fn sensitive_to_order_insertion_and_removal() {
        let algorithm = DigestAlgorithm::Sha1;
        let base = algorithm.digest([1, 2, 3]);

        assert_ne!(base, algorithm.digest([3, 2, 1]));
        assert_ne!(base, algorithm.digest([1, 2, 3, 4]));
        assert_ne!(base, algorithm.digest([1, 3]));
        // Separators keep [12] and [1,2] apart.
        assert_ne!(algorithm.digest([12]), algorithm.digest([1, 2]));
    }

    #[test]
    fn digest_lengths() {
        assert_eq!(DigestAlgorithm::Sha1.digest([1]).as_str().len(), 40);
        assert_eq!(DigestAlgorithm::Sha256.digest([1]).as_str().len(), 64);
    }

    #[test]
    fn client_digest_is_case_insensitive() {
        let ours = DigestAlgorithm::Sha1.digest([7]);
        let theirs = Digest::from(ours.as_str().to_ascii_uppercase());
        assert_eq!(ours, theirs);
    }

    #[test]
    fn serde_as_plain_string() {
        let digest = Digest::from("ABCDEF");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, "\"abcdef\"");
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn algorithm_parsing() {
        assert_eq!(
            "SHA-256".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha256
        );
        assert_eq!("sha1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        assert!("md5".parse::<DigestAlgorithm>().is_err());
    }
}
