//! JSON document model, parser and serializer.
//!
//! # Architecture
//!
//! - [`types`] - `Value`, `Object` and `Array`
//! - [`limits`] - parser limits and options
//! - [`lexer`] - byte cursor with string/number readers
//! - [`parser`] - recursive descent parser
//! - [`serialize`] - tab-indented pretty printer
//!
//! # Example
//!
//! ```
//! use dtf_json::json::{object_to_string, parse, Value};
//!
//! let object = parse(r#"{"b": [1, 2], "a": 3.50}"#).unwrap();
//! assert_eq!(object.get("a"), Some(&Value::Number(3.5)));
//!
//! // Members keep their source order.
//! assert_eq!(object_to_string(&object), "{\n\t\"b\": [ 1, 2 ],\n\t\"a\": 3.5\n}");
//! ```

pub mod lexer;
pub mod limits;
pub mod parser;
pub mod serialize;
pub mod types;

// Re-export commonly used items
pub use limits::{Limits, MAX_NESTING_DEPTH};
pub use parser::{parse, parse_with_limits, Parser};
pub use serialize::{array_to_string, object_to_string, to_string, to_string_at};
pub use types::{Array, Kind, Object, Value};
