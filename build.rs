// Build script that generates the parser error enum from `errors.json`.
// Build scripts are not part of the library, so we allow expect() and panic().
#![allow(clippy::expect_used)]
//
// Consumes `errors.json` and generates `error_generated.rs` in OUT_DIR with
// the `ErrorCode` enum, its `code()`/`name()` accessors and `ParseResult`.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Metadata {
    version: String,
    errors: Vec<ErrorInfo>,
}

#[derive(Debug, Deserialize)]
struct ErrorInfo {
    name: String,
    code: u32,
    message: String,
    params: Vec<String>,
}

fn main() {
    println!("cargo:rerun-if-changed=errors.json");
    println!("cargo:rerun-if-changed=build.rs");

    let metadata_path = Path::new("errors.json");
    let metadata_content = fs::read_to_string(metadata_path).expect("Failed to read errors.json");
    let metadata: Metadata =
        serde_json::from_str(&metadata_content).expect("Failed to parse errors.json");

    if metadata.version != "1" {
        panic!(
            "Unexpected errors.json version '{}', expected '1'",
            metadata.version
        );
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    generate_error_rs(Path::new(&out_dir), &metadata.errors);
}

fn generate_error_rs(out_path: &Path, errors: &[ErrorInfo]) {
    let mut code = String::new();

    // Use outer doc comments for include!() compatibility
    code.push_str(
        r#"// Error codes generated from errors.json.
//
// DO NOT EDIT - This file is generated by build.rs

use thiserror::Error;

/// Every way a parse can fail.
///
/// The first error encountered aborts the parse; there is no recovery and no
/// partial document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
"#,
    );

    for error in errors {
        code.push_str(&format!(
            "    /// {} (code {})\n",
            describe(error),
            error.code
        ));

        if error.params.is_empty() {
            code.push_str(&format!(
                "    #[error(\"{}\")]\n    {},\n\n",
                error.message, error.name
            ));
        } else {
            let params: Vec<String> = error
                .params
                .iter()
                .map(|p| format!("/* {} */ {}", p, param_type(p)))
                .collect();
            code.push_str(&format!(
                "    #[error(\"{message}\")]\n    {name}({params}),\n\n",
                message = error.message,
                name = error.name,
                params = params.join(", ")
            ));
        }
    }

    code.push_str("}\n\n");

    code.push_str(
        r#"impl ErrorCode {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
"#,
    );

    for error in errors {
        code.push_str(&format!(
            "            ErrorCode::{}{} => {},\n",
            error.name,
            wildcards(error),
            error.code
        ));
    }

    code.push_str(
        r#"        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
"#,
    );

    for error in errors {
        code.push_str(&format!(
            "            ErrorCode::{}{} => \"{}\",\n",
            error.name,
            wildcards(error),
            error.name
        ));
    }

    code.push_str(
        r#"        }
    }
}

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ErrorCode>;
"#,
    );

    fs::write(out_path.join("error_generated.rs"), code)
        .expect("Failed to write error_generated.rs");
}

/// The message with each placeholder replaced by its parameter name.
fn describe(error: &ErrorInfo) -> String {
    let mut text = error.message.clone();
    for (i, param) in error.params.iter().enumerate() {
        for placeholder in [format!("{{{i}}}"), format!("{{{i}:?}}")] {
            text = text.replace(&placeholder, &format!("`{param}`"));
        }
    }
    text
}

fn wildcards(error: &ErrorInfo) -> String {
    if error.params.is_empty() {
        String::new()
    } else {
        format!("({})", vec!["_"; error.params.len()].join(", "))
    }
}

fn param_type(param_name: &str) -> &'static str {
    match param_name {
        "found" => "char",
        "key" => "String",
        // offset, size, limit, depth
        _ => "u64",
    }
}
