//! # classprop Core
//!
//! Core types, errors, and traits for per-class cached properties.
//!
//! This crate provides the building blocks used by `classprop-cache`:
//!
//! - **Types**: `ClassKey`, the identity of a class (a Rust type)
//! - **Errors**: `ClassPropError` for rejected writes and bad configuration
//! - **Clock**: wall-clock and manually driven time sources
//! - **Constants**: defaults and environment variable names
//!
//! ## Example
//!
//! ```rust
//! use classprop_core::ClassKey;
//!
//! struct Base;
//! struct Derived;
//!
//! assert_ne!(ClassKey::of::<Base>(), ClassKey::of::<Derived>());
//! assert_eq!(ClassKey::of::<Base>().short_name(), "Base");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use clock::{ManualClock, SystemClock};
pub use constants::*;
pub use error::{ClassPropError, Result, WriteOp};
pub use traits::*;
pub use types::*;
