//! Oxidns Cache Layer
//!
//! Memoization layer of the iterative resolver: stores previously-obtained
//! DNS records so repeated resolutions and delegation walks avoid redundant
//! network queries. Shared by all resolution workers, defends against
//! off-path poisoning, and expires records lazily by TTL.

pub mod cache;
pub mod config;
pub mod entry;
pub mod key;
pub mod stats;
pub mod store;

pub use cache::{Cache, Section};
pub use config::{CacheConfig, CacheConfigError};
pub use entry::{AnswerIdentity, CachedEntry, TimedAnswer};
pub use key::CacheKey;
pub use stats::{CacheStatistics, CacheStatsReport};
pub use store::ShardedStore;
