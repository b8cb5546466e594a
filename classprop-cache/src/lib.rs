//! # classprop Cache
//!
//! Cached class properties: a value computed once per class (Rust type)
//! and served from memory afterwards, with optional time-based expiry and
//! manual reset.
//!
//! Each type that reads the property gets its own entry. A type built on
//! top of another never inherits its cached value.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use classprop_cache::{CacheConfig, ClassValueCache};
//!
//! struct Model;
//! struct Subclass;
//!
//! let table_name = ClassValueCache::with_config(
//!     CacheConfig::named("table_name").with_timeout(Duration::from_secs(60)),
//!     |class| class.short_name().to_lowercase(),
//! );
//!
//! assert_eq!(table_name.value::<Model>(), "model");
//! assert_eq!(table_name.value::<Subclass>(), "subclass");
//!
//! table_name.reset::<Model>();
//! assert!(!table_name.is_cached::<Model>());
//! assert!(table_name.is_cached::<Subclass>());
//! assert!(table_name.set::<Model>("other".into()).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod config;
mod entry;

pub use cache::{CacheStats, ClassValueCache};
pub use config::CacheConfig;

pub use classprop_core::{ClassKey, ClassPropError, Clock, ManualClock, SystemClock, WriteOp};
