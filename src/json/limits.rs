//! Parser configuration.
//!
//! `Limits` bounds how much work a single parse may do and selects the few
//! behaviors that are deliberately configurable: key unescaping and the
//! duplicate-key policy.

/// Largest input accepted by [`Limits::standard`], in bytes.
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 16 * 1024 * 1024;

/// Deepest object/array nesting accepted by [`Limits::standard`].
pub const DEFAULT_MAX_NESTING_DEPTH: u64 = 128;

/// Hard ceiling on nesting depth, whatever `max_nesting_depth` says.
///
/// Descent is recursive; this bound keeps a parse inside a 2 MiB thread
/// stack in unoptimized builds.
pub const MAX_NESTING_DEPTH: u64 = 192;

/// Parser limits and options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum total input size in bytes (E110)
    pub max_input_size: u64,
    /// Maximum nesting depth for objects and arrays, root included (E111).
    /// Values above [`MAX_NESTING_DEPTH`] are treated as that ceiling.
    pub max_nesting_depth: u64,
    /// Translate escape sequences in object keys as well as in string values
    pub escape_keys: bool,
    /// Fail with E112 when an object repeats a key instead of keeping both
    pub reject_duplicate_keys: bool,
}

impl Limits {
    /// Defaults for ordinary documents.
    ///
    /// Keys are read verbatim and duplicate keys are kept.
    pub const fn standard() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            escape_keys: false,
            reject_duplicate_keys: false,
        }
    }

    /// Generous limits for large or deeply nested documents.
    pub const fn lenient() -> Self {
        Self {
            max_input_size: 1024 * 1024 * 1024, // 1 GiB
            max_nesting_depth: MAX_NESTING_DEPTH,
            ..Self::standard()
        }
    }

    /// The depth limit the parser enforces, capped at [`MAX_NESTING_DEPTH`].
    pub const fn nesting_depth(&self) -> u64 {
        if self.max_nesting_depth < MAX_NESTING_DEPTH {
            self.max_nesting_depth
        } else {
            MAX_NESTING_DEPTH
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::standard()
    }
}
