//! dtf-json - an order-preserving JSON document model.
//!
//! JSON text is parsed by a recursive descent parser into a [`Value`] tree
//! whose objects are stored in an [`OrderedMap`], then written back out by a
//! deterministic, tab-indented pretty printer.
//!
//! # Architecture
//!
//! - [`map`] - hash map with separate chaining that iterates in insertion order
//! - [`json`] - value types, parser and serializer
//! - [`error`] - parser error codes
//!
//! The supported JSON subset has no negative numbers, no exponents and no
//! `\u` escapes. Member order and duplicate keys survive a parse/serialize
//! round trip.

// Library code must report failures through `ErrorCode`, never panic.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod error;
pub mod json;
pub mod map;

// Re-export commonly used types
pub use error::{ErrorCode, ParseResult};
pub use json::{parse, parse_with_limits, Array, Kind, Limits, Object, Parser, Value};
pub use map::OrderedMap;
