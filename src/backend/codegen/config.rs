//! Code generation configuration

/// Code generation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenConfig {
    /// Number of spaces per indentation level in generated C
    pub indent_width: usize,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

impl CodegenConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}
