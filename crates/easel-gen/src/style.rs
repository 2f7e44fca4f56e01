//! Shared style guide for generation prompts
//!
//! A style guide carries the art-direction block that is appended verbatim
//! to every prompt in a run, keeping a batch visually consistent.

use easel_core::{EaselError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Style constraints shared by all jobs in a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleGuide {
    /// Style name (e.g., "storybook")
    #[serde(default)]
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Art-direction block appended verbatim to every prompt
    #[serde(default)]
    pub art_direction: Option<String>,
    /// Color palette as hex strings
    #[serde(default)]
    pub palette: Vec<String>,
    /// Things generation should avoid
    #[serde(default)]
    pub avoid: Vec<String>,
}

/// TOML file wrapper
#[derive(Debug, Deserialize)]
struct StyleFile {
    style: StyleGuide,
}

impl StyleGuide {
    /// Load a style guide from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: StyleFile = toml::from_str(&content).map_err(|e| {
            EaselError::StyleError(format!(
                "Failed to parse style guide {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(file.style)
    }

    /// Find and load a style guide by name, searching standard locations
    pub fn find(name: &str) -> Result<Self> {
        let candidates = [
            format!("styles/{}.style.toml", name),
            format!(".easel/styles/{}.style.toml", name),
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(EaselError::StyleError(format!(
            "Style guide '{}' not found (searched: {})",
            name,
            candidates.join(", ")
        )))
    }

    /// The style block appended to every composed prompt. Empty string when
    /// the guide has nothing to say.
    pub fn constraints(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref direction) = self.art_direction {
            parts.push(direction.clone());
        }

        if !self.palette.is_empty() {
            parts.push(format!("Color palette: {}.", self.palette.join(", ")));
        }

        if !self.avoid.is_empty() {
            parts.push(format!("Avoid: {}.", self.avoid.join(", ")));
        }

        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_style(content: &str) -> std::path::PathBuf {
        let dir =
            std::env::temp_dir().join(format!("easel_style_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.style.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_style_guide() {
        let style_str = r##"
[style]
name = "storybook"
description = "Warm children's picture-book aesthetic"
art_direction = "Soft watercolor children's book illustration, rounded shapes, gentle lighting."
palette = ["#F4A261", "#2A9D8F", "#E9C46A"]
avoid = ["photorealism", "text", "watermarks"]
"##;
        let path = temp_style(style_str);
        let style = StyleGuide::load(&path).unwrap();

        assert_eq!(style.name, "storybook");
        assert_eq!(style.palette.len(), 3);
        assert!(style.art_direction.unwrap().contains("watercolor"));

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_constraints_block() {
        let style = StyleGuide {
            name: "test".to_string(),
            description: None,
            art_direction: Some("Flat vector style.".to_string()),
            palette: vec!["#F4A261".to_string()],
            avoid: vec!["text".to_string()],
        };

        let block = style.constraints();
        assert!(block.starts_with("Flat vector style."));
        assert!(block.contains("#F4A261"));
        assert!(block.contains("Avoid: text."));
    }

    #[test]
    fn test_empty_style_has_empty_constraints() {
        assert_eq!(StyleGuide::default().constraints(), "");
    }

    #[test]
    fn test_style_not_found() {
        assert!(StyleGuide::find("nonexistent_style_xyz").is_err());
    }
}
