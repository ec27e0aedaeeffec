//! Compiler configuration.

use serde::Deserialize;

/// Default maximum combinator nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum number of elements in an `in` / `!in` operand.
pub const DEFAULT_MAX_SET_LEN: usize = 1024;

/// Default maximum filter document size accepted as JSON text (64 KiB).
pub const DEFAULT_MAX_INPUT_LEN: usize = 64 * 1024;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_set_len() -> usize {
    DEFAULT_MAX_SET_LEN
}

fn default_max_input_len() -> usize {
    DEFAULT_MAX_INPUT_LEN
}

/// Limits applied while compiling untrusted filter documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompilerConfig {
    /// Maximum combinator nesting depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum elements in a set operand.
    #[serde(default = "default_max_set_len")]
    pub max_set_len: usize,

    /// Maximum JSON text length in bytes.
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_set_len: DEFAULT_MAX_SET_LEN,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }
}

impl CompilerConfig {
    /// Create a configuration with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum set operand length.
    pub fn with_max_set_len(mut self, len: usize) -> Self {
        self.max_set_len = len;
        self
    }

    /// Set the maximum JSON text length.
    pub fn with_max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.max_set_len, 1024);
        assert_eq!(config.max_input_len, 65536);
    }

    #[test]
    fn test_builder() {
        let config = CompilerConfig::new().with_max_depth(4).with_max_set_len(2);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_set_len, 2);
        assert_eq!(config.max_input_len, DEFAULT_MAX_INPUT_LEN);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CompilerConfig = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(config, CompilerConfig::default().with_max_depth(8));

        let config: CompilerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CompilerConfig::default());
    }
}
