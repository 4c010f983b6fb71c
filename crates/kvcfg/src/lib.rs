//! # kvcfg
//!
//! Flat `key = value` configuration engine.
//!
//! ## Architecture
//! - **Parser**: two passes over the source, counting then filling entries
//! - **Identity**: keys and values are compared by a 32-bit hash
//! - **Cache**: fixed-size move-to-front slots in front of the linear scan
//!
//! ```
//! use kvcfg::ConfigStore;
//!
//! let mut store = ConfigStore::new(None)?;
//! store.parse_buffer("host = localhost\nport=5432\n# comment\n")?;
//!
//! assert_eq!(store.get("host")?, Some("localhost"));
//! assert_eq!(store.get_i64("port", 10)?, 5432);
//! # Ok::<(), kvcfg::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod entry;
mod error;
mod escape;
mod hash;
mod loader;
mod numeric;
mod parser;
mod shared;
mod stats;
mod store;

pub use cache::{LookupCache, Slot};
pub use entry::Entry;
pub use error::{Error, Result};
pub use escape::{unescape, unescape_in_place};
pub use hash::{hash, hash_bytes, HASH_SEED};
pub use loader::load_file;
pub use numeric::{is_valid_base, parse_f64, parse_i64, parse_u64};
pub use shared::SharedConfigStore;
pub use stats::CacheStats;
pub use store::{ConfigStore, DEFAULT_CACHE_CAPACITY};
