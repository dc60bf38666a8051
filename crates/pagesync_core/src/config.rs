//! Core configuration.

use crate::digest::DigestAlgorithm;
use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// How a reorder treats selected ids that the new order omits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReorderPolicy {
    /// Omitted ids stay selected and are appended after the given order,
    /// keeping their previous relative order.
    #[default]
    AppendOmitted,
    /// Omitted ids are dropped from the sequence and the membership set.
    Truncate,
}

impl ReorderPolicy {
    /// Returns the short name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReorderPolicy::AppendOmitted => "append",
            ReorderPolicy::Truncate => "truncate",
        }
    }
}

impl fmt::Display for ReorderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReorderPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "append" | "append-omitted" => Ok(ReorderPolicy::AppendOmitted),
            "truncate" => Ok(ReorderPolicy::Truncate),
            _ => Err(CoreError::UnknownReorderPolicy(s.to_string())),
        }
    }
}

/// Configuration for the synchronization core.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Number of items per page.
    pub page_size: usize,
    /// Hash used for page and prefix digests.
    pub digest_algorithm: DigestAlgorithm,
    /// Treatment of omitted ids on reorder.
    pub reorder_policy: ReorderPolicy,
    /// Maximum distinct pending actions per queue (`None` = unbounded).
    pub max_pending: Option<usize>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            digest_algorithm: DigestAlgorithm::Sha1,
            reorder_policy: ReorderPolicy::AppendOmitted,
            max_pending: None,
        }
    }
}

impl CoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the digest algorithm.
    #[must_use]
    pub fn with_digest_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.digest_algorithm = algorithm;
        self
    }

    /// Sets the reorder policy.
    #[must_use]
    pub fn with_reorder_policy(mut self, policy: ReorderPolicy) -> Self {
        self.reorder_policy = policy;
        self
    }

    /// Caps the number of distinct pending actions per queue.
    #[must_use]
    pub fn with_max_pending(mut self, max: usize) -> Self {
        self.max_pending = Some(max);
        self
    }

    /// Checks that all values are usable.
    pub fn validate(&self) -> CoreResult<()> {
        if self.page_size == 0 {
            return Err(CoreError::invalid_config(
                "page_size must be greater than zero",
            ));
        }
        if self.max_pending == Some(0) {
            return Err(CoreError::invalid_config(
                "max_pending must be greater than zero when set",
            ));
        }
        Ok(())
    }
}
