//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and scheduling.
///
/// Lookups and inserts never fail; a missing key is reported as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// LRU capacity must be at least one entry
    #[error("Invalid configuration: capacity must be greater than zero")]
    InvalidCapacity,

    /// TTL duration must be non-zero
    #[error("Invalid configuration: ttl must be greater than zero")]
    InvalidTtl,

    /// Background sweep interval must be non-zero
    #[error("Invalid configuration: cleanup interval must be greater than zero")]
    InvalidInterval,

    /// Background sweep requested outside of a tokio runtime
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;
