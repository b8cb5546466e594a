//! Domain types for classprop.
//!
//! - [`ClassKey`]: Identity of a class (a Rust type) used to key cache entries

mod class;

pub use class::*;
