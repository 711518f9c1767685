//! Utility functions and helpers

pub mod hash;
pub mod parse;

use std::fmt::Display;

/// Serialize any value through its `Display` form (addresses, hashes)
pub fn serialize_display<T: Display, S: serde::Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}
