//! Digest-based reconciliation of cached pages.
//!
//! A viewer holding a sparse set of cached pages first sends a prefix check
//! (how many items it holds, and their digest). On a match nothing else
//! happens. On a mismatch it checks each cached page; only pages whose
//! digest differs come back with fresh content.

use crate::config::CoreConfig;
use crate::digest::{Digest, DigestAlgorithm};
use crate::store::Store;
use crate::types::{ItemId, Side};
use crate::view::{page_count, ViewProjector};

/// Outcome of a prefix check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixCheck {
    /// The caller's prefix digest equals the server's.
    pub matches: bool,
    /// Size of the current filtered projection.
    pub total_count: usize,
    /// Pages needed for `total_count` at the configured page size.
    pub page_count: usize,
}

/// Compares client digests against the committed projection.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    page_size: usize,
    algorithm: DigestAlgorithm,
}

impl Reconciler {
    /// Creates a reconciler with the page size and algorithm from `config`.
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            page_size: config.page_size,
            algorithm: config.digest_algorithm,
        }
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the digest algorithm.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Digests an id sequence.
    pub fn digest<I>(&self, ids: I) -> Digest
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.algorithm.digest(ids)
    }

    /// Returns one page of the filtered projection.
    pub fn page(&self, store: &Store, side: Side, search: &str, page: usize) -> Vec<ItemId> {
        ViewProjector::new(store).page(side, search, page, self.page_size)
    }

    /// Compares the digest of the first `client_count` items of the
    /// projection with `client_digest`.
    ///
    /// Makes a single pass over the projection and computes no per-page diff.
    pub fn check_prefix(
        &self,
        store: &Store,
        side: Side,
        search: &str,
        client_count: usize,
        client_digest: &Digest,
    ) -> PrefixCheck {
        let view = ViewProjector::new(store);
        let mut items = view.iter(side, search);

        let mut taken = 0usize;
        let digest = self.digest(items.by_ref().take(client_count).inspect(|_| taken += 1));
        let total_count = taken + items.count();

        PrefixCheck {
            matches: digest == *client_digest,
            total_count,
            page_count: page_count(total_count, self.page_size),
        }
    }

    /// Returns the fresh page content if its digest differs from
    /// `client_digest`, or `None` if the caller's copy is current.
    pub fn check_page(
        &self,
        store: &Store,
        side: Side,
        search: &str,
        page: usize,
        client_digest: &Digest,
    ) -> Option<Vec<ItemId>> {
        let items = self.page(store, side, search, page);
        if self.digest(items.iter().copied()) == *client_digest {
            None
        } else {
            Some(items)
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(&CoreConfig::default())
    }
}
