//! Deterministic filtered and paginated views.

use crate::store::Store;
use crate::types::{ItemId, Side};
use std::fmt::Write;

/// Substring filter over the decimal form of an id.
///
/// An empty needle matches everything.
#[derive(Debug, Clone)]
pub struct SearchFilter<'s> {
    needle: &'s str,
    buf: String,
}

impl<'s> SearchFilter<'s> {
    /// Creates a filter for `needle`.
    pub fn new(needle: &'s str) -> Self {
        Self {
            needle,
            buf: String::with_capacity(20),
        }
    }

    /// Returns true if the decimal form of `id` contains the needle.
    pub fn matches(&mut self, id: ItemId) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        self.buf.clear();
        // Writing to a String cannot fail.
        let _ = write!(self.buf, "{id}");
        self.buf.contains(self.needle)
    }
}

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Computes views of one committed store state.
///
/// Views are never stored. For a given state and `(side, search)` the output
/// is identical on every call:
/// - `Side::Universe` enumerates unselected universe ids in insertion order
/// - `Side::Selected` enumerates the selection sequence
#[derive(Debug, Clone, Copy)]
pub struct ViewProjector<'a> {
    store: &'a Store,
}

impl<'a> ViewProjector<'a> {
    /// Creates a projector over `store`.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Iterates the filtered projection of `side`.
    pub fn iter<'s>(&self, side: Side, search: &'s str) -> Box<dyn Iterator<Item = ItemId> + 's>
    where
        'a: 's,
    {
        let mut filter = SearchFilter::new(search);
        let store = self.store;
        match side {
            Side::Universe => {
                let selection = store.selection();
                Box::new(
                    store
                        .universe()
                        .iter()
                        .filter(move |id| !selection.contains(*id) && filter.matches(*id)),
                )
            }
            Side::Selected => Box::new(
                store
                    .selection()
                    .iter()
                    .filter(move |id| filter.matches(*id)),
            ),
        }
    }

    /// Returns the whole filtered projection of `side`.
    pub fn list(&self, side: Side, search: &str) -> Vec<ItemId> {
        self.iter(side, search).collect()
    }

    /// Returns the number of items in the filtered projection.
    pub fn count(&self, side: Side, search: &str) -> usize {
        self.iter(side, search).count()
    }

    /// Returns items `[page * page_size, page * page_size + page_size)` of
    /// the filtered projection. Out-of-range pages are empty.
    pub fn page(&self, side: Side, search: &str, page: usize, page_size: usize) -> Vec<ItemId> {
        if page_size == 0 {
            return Vec::new();
        }
        let Some(start) = page.checked_mul(page_size) else {
            return Vec::new();
        };
        self.iter(side, search).skip(start).take(page_size).collect()
    }
}
