//! Layered configuration
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `EASEL_OPENAI_API_KEY`, `EASEL_API_URL`
//! 2. Project-local: `.easel/config.toml`
//! 3. Global: `~/.easel/config.toml`

use easel_core::{EaselError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const API_KEY_ENV: &str = "EASEL_OPENAI_API_KEY";
const API_URL_ENV: &str = "EASEL_API_URL";

/// API endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Model tried once when the primary fails with a recoverable error
    #[serde(default)]
    pub fallback_model: Option<String>,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_quality")]
    pub quality: String,
    /// Pause between consecutive generation calls
    #[serde(default = "default_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default)]
    pub style: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            fallback_model: None,
            text_model: default_text_model(),
            size: default_size(),
            quality: default_quality(),
            request_delay_ms: default_delay_ms(),
            style: None,
        }
    }
}

fn default_model() -> String {
    "gpt-image-1.5".to_string()
}
fn default_text_model() -> String {
    "gpt-4.1-mini".to_string()
}
fn default_size() -> String {
    "1024x1024".to_string()
}
fn default_quality() -> String {
    "high".to_string()
}
fn default_delay_ms() -> u64 {
    1000
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EaselConfigFile {
    #[serde(default)]
    api: ApiConfig,
    #[serde(default)]
    generation: GenerationConfig,
}

/// Resolved configuration with environment overrides applied
#[derive(Debug, Clone, Default)]
pub struct EaselConfig {
    pub api: ApiConfig,
    pub generation: GenerationConfig,
}

impl EaselConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = EaselConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".easel/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config);

        Ok(EaselConfig {
            api: config.api,
            generation: config.generation,
        })
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(EaselConfig {
            api: config.api,
            generation: config.generation,
        })
    }

    /// The required credential. Absence is a fatal configuration error,
    /// reported before any job executes.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api.api_key.as_deref().ok_or_else(|| {
            EaselError::ConfigError(format!(
                "Missing API credential. Set {} or add api_key to .easel/config.toml",
                API_KEY_ENV
            ))
        })
    }

    pub fn api_url(&self) -> &str {
        self.api
            .api_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1")
    }

    pub fn model(&self) -> &str {
        &self.generation.model
    }

    pub fn text_model(&self) -> &str {
        &self.generation.text_model
    }

    pub fn fallback_model(&self) -> Option<&str> {
        self.generation.fallback_model.as_deref()
    }

    pub fn default_style(&self) -> Option<&str> {
        self.generation.style.as_deref()
    }

    pub fn request_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.generation.request_delay_ms)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".easel").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<EaselConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: EaselConfigFile = toml::from_str(&content).map_err(|e| {
            EaselError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge_into(base: &mut EaselConfigFile, overlay: EaselConfigFile) {
        if overlay.api.api_key.is_some() {
            base.api.api_key = overlay.api.api_key;
        }
        if overlay.api.api_url.is_some() {
            base.api.api_url = overlay.api.api_url;
        }

        if overlay.generation.model != default_model() {
            base.generation.model = overlay.generation.model;
        }
        if overlay.generation.fallback_model.is_some() {
            base.generation.fallback_model = overlay.generation.fallback_model;
        }
        if overlay.generation.text_model != default_text_model() {
            base.generation.text_model = overlay.generation.text_model;
        }
        if overlay.generation.size != default_size() {
            base.generation.size = overlay.generation.size;
        }
        if overlay.generation.quality != default_quality() {
            base.generation.quality = overlay.generation.quality;
        }
        if overlay.generation.request_delay_ms != default_delay_ms() {
            base.generation.request_delay_ms = overlay.generation.request_delay_ms;
        }
        if overlay.generation.style.is_some() {
            base.generation.style = overlay.generation.style;
        }
    }

    fn apply_env_overrides(config: &mut EaselConfigFile) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.api.api_key = Some(key);
        }
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api.api_url = Some(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("easel_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_config_from_file() {
        std::env::remove_var(API_KEY_ENV);

        let config_str = r#"
[api]
api_key = "test-key-123"
api_url = "https://api.example.com/v1"

[generation]
model = "gpt-image-1.5"
fallback_model = "dall-e-3"
request_delay_ms = 250
style = "storybook"
"#;
        let path = temp_config(config_str);
        let config = EaselConfig::load_from_file(&path).unwrap();

        assert_eq!(config.require_api_key().unwrap(), "test-key-123");
        assert_eq!(config.api_url(), "https://api.example.com/v1");
        assert_eq!(config.fallback_model(), Some("dall-e-3"));
        assert_eq!(config.default_style(), Some("storybook"));
        assert_eq!(config.request_delay().as_millis(), 250);

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = EaselConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, EaselError::ConfigError(_)));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_defaults() {
        let config = EaselConfig::default();
        assert_eq!(config.model(), "gpt-image-1.5");
        assert_eq!(config.generation.size, "1024x1024");
        assert_eq!(config.generation.quality, "high");
        assert_eq!(config.request_delay().as_millis(), 1000);
        assert_eq!(config.fallback_model(), None);
    }
}
