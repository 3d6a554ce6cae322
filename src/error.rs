//! Parser error codes.
//!
//! The `ErrorCode` enum is generated by `build.rs` from `errors.json` so the
//! numeric codes, names and messages live in one place and the CLI can report
//! them verbatim.
//!
//! Container lookups never fail with an `ErrorCode`; they return `Option` or
//! `bool` instead.

include!(concat!(env!("OUT_DIR"), "/error_generated.rs"));
