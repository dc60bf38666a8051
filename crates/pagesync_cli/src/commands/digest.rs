//! Digest command implementation.

use pagesync_core::{DigestAlgorithm, ItemId};

/// Prints the digest of `ids` in the given order.
pub fn run(algorithm: DigestAlgorithm, ids: &[ItemId]) {
    let digest = algorithm.digest(ids.iter().copied());
    println!("{digest}");
}
