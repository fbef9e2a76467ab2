use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};

/// Settings for how rendered statements are printed
#[derive(Clone, Debug, Default, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct OutputSettings {
    /// Print a `-- name` comment line above each rendered statement
    /// Default: false
    pub comments: Option<bool>,

    /// Separate rendered statements with an empty line
    /// Default: true
    pub blank_lines: Option<bool>,
}

impl OutputSettings {
    pub fn comments(&self) -> bool {
        self.comments.unwrap_or(false)
    }

    pub fn blank_lines(&self) -> bool {
        self.blank_lines.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults() {
        let output = OutputSettings::default();
        assert!(!output.comments());
        assert!(output.blank_lines());
    }

    #[test]
    fn test_output_from_toml() {
        let output: OutputSettings = toml::from_str("comments = true").unwrap();
        assert!(output.comments());
        assert!(output.blank_lines());
    }
}
