use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use slidesmith_genai::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

use crate::materialize::DEFAULT_PROXY_URL;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub genai: GenAiConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Deserialize)]
pub struct GenAiConfig {
    /// Gemini API key. No default: an empty key fails client construction.
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageConfig {
    pub proxy_url: String,
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist. The API key is
    /// deliberately not ambient: it comes from the file or from
    /// `SLIDESMITH_API_KEY`, and stays empty otherwise so the pipeline can
    /// fail fast with a missing-credential error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SLIDESMITH_API_KEY") {
            self.genai.api_key = v;
        }
        if let Ok(v) = std::env::var("SLIDESMITH_MODEL") {
            self.genai.model = v;
        }
        if let Ok(v) = std::env::var("SLIDESMITH_BASE_URL") {
            self.genai.base_url = v;
        }
        if let Ok(v) = std::env::var("SLIDESMITH_IMAGE_PROXY") {
            self.images.proxy_url = v;
        }
    }

    fn default() -> Self {
        Self {
            genai: GenAiConfig {
                api_key: String::new(),
                model: DEFAULT_MODEL.into(),
                base_url: DEFAULT_BASE_URL.into(),
            },
            images: ImageConfig {
                proxy_url: DEFAULT_PROXY_URL.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    fn clear_env() {
        for key in [
            "SLIDESMITH_API_KEY",
            "SLIDESMITH_MODEL",
            "SLIDESMITH_BASE_URL",
            "SLIDESMITH_IMAGE_PROXY",
        ] {
            // SAFETY: tests touching process env are serialized.
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn defaults_when_file_missing() {
        clear_env();
        let config = Config::load(Path::new("/nonexistent/slidesmith.toml")).unwrap();
        assert!(config.genai.api_key.is_empty());
        assert_eq!(config.genai.model, DEFAULT_MODEL);
        assert_eq!(config.genai.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.images.proxy_url, DEFAULT_PROXY_URL);
    }

    #[test]
    #[serial]
    fn parse_valid_toml() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slidesmith.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"
[genai]
api_key = "k-123"
model = "gemini-2.5-pro"
base_url = "http://custom:1234/v1beta"

[images]
proxy_url = "http://proxy.local/"
"#
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.genai.api_key, "k-123");
        assert_eq!(config.genai.model, "gemini-2.5-pro");
        assert_eq!(config.genai.base_url, "http://custom:1234/v1beta");
        assert_eq!(config.images.proxy_url, "http://proxy.local/");
    }

    #[test]
    #[serial]
    fn env_vars_override_file_values() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slidesmith.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"
[genai]
api_key = "from-file"
model = "gemini-2.5-flash"
base_url = "http://file:1/v1beta"

[images]
proxy_url = "http://file-proxy/"
"#
        )
        .unwrap();

        // SAFETY: tests touching process env are serialized.
        unsafe {
            std::env::set_var("SLIDESMITH_API_KEY", "from-env");
            std::env::set_var("SLIDESMITH_IMAGE_PROXY", "http://env-proxy/");
        }
        let config = Config::load(&path).unwrap();
        clear_env();

        assert_eq!(config.genai.api_key, "from-env");
        assert_eq!(config.genai.model, "gemini-2.5-flash");
        assert_eq!(config.images.proxy_url, "http://env-proxy/");
    }

    #[test]
    #[serial]
    fn invalid_toml_is_an_error() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slidesmith.toml");
        std::fs::write(&path, "not valid toml [[").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
