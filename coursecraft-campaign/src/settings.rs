//! Model settings and the API credential.
//!
//! Command-line flags override values from an optional TOML file, which
//! override the defaults below.
//!
//! ```toml
//! model = "gpt-3.5-turbo-16k"
//! temperature = 0.1
//! max_tokens = 8000
//! base_url = "https://api.openai.com/v1"
//! timeout_secs = 120
//!
//! [headers]
//! OpenAI-Organization = "org-123"
//! ```

use coursecraft_crew::LlmSettings;
use coursecraft_error::{Error, ErrorKind, Result};
use coursecraft_llm::ProviderConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-16k";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: usize = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Never read from the config file; comes from the flag or environment
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout_secs: u64,
    /// Extra HTTP headers for every model request
    pub headers: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: coursecraft_llm::provider::OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            headers: BTreeMap::new(),
        }
    }
}

/// Values given on the command line; `None` leaves the lower layer alone
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text).map_err(|e| {
            Error::new(ErrorKind::ConfigInvalid, format!("invalid config: {}", e.message()))
                .with_operation("settings::from_toml")
                .set_source(e)
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).with_context("path", path.display().to_string()))?;
        Self::from_toml_str(&text).map_err(|e| e.with_context("path", path.display().to_string()))
    }

    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if overrides.api_key.is_some() {
            self.api_key = overrides.api_key;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.max_tokens = max_tokens;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::config_invalid(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            ))
            .with_operation("settings::validate"));
        }
        if self.model.trim().is_empty() {
            return Err(Error::config_invalid("model name is empty").with_operation("settings::validate"));
        }
        if self.max_tokens == 0 {
            return Err(Error::config_invalid("max_tokens must be positive").with_operation("settings::validate"));
        }
        if let Some(name) = self.headers.keys().find(|name| name.eq_ignore_ascii_case("authorization")) {
            return Err(Error::config_invalid("the API key is sent by coursecraft, not as a header")
                .with_operation("settings::validate")
                .with_context("header", name.clone()));
        }
        Ok(())
    }

    /// The credential, or `CredentialMissing` when unset or blank
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::credential_missing(API_KEY_ENV).with_operation("settings::api_key")),
        }
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            model: Some(self.model.clone()),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        }
    }

    /// Provider configuration; fails without a credential
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let api_key = self.require_api_key()?;
        let config = ProviderConfig::openai(api_key)
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(self.timeout_secs);
        Ok(self
            .headers
            .iter()
            .fold(config, |config, (name, value)| config.with_header(name.clone(), value.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_follow_the_form() {
        let settings = Settings::default();
        assert_eq!(settings.model, "gpt-3.5-turbo-16k");
        assert_eq!(settings.temperature, 0.1);
        assert_eq!(settings.max_tokens, 8000);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_missing_or_blank_key() {
        let settings = Settings::default();
        assert_eq!(
            settings.require_api_key().unwrap_err().kind(),
            ErrorKind::CredentialMissing
        );

        let settings = Settings::default()
            .apply(Overrides { api_key: Some("   ".into()), ..Default::default() })
            .unwrap();
        assert_eq!(
            settings.provider_config().unwrap_err().kind(),
            ErrorKind::CredentialMissing
        );
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = Settings::from_toml_str("model = \"gpt-4o-mini\"\ntemperature = 0.5\n").unwrap();
        assert_eq!(file.max_tokens, 8000);

        let settings = file
            .apply(Overrides {
                api_key: Some("sk-test".into()),
                temperature: Some(0.2),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.temperature, 0.2);
        assert_eq!(settings.require_api_key().unwrap(), "sk-test");

        let config = settings.provider_config().unwrap();
        assert_eq!(config.default_model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_invalid_config() {
        let err = Settings::from_toml_str("temperature = 7.0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = Settings::from_toml_str("api_key = \"sk-in-file\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_headers_reach_the_provider() {
        let settings = Settings::from_toml_str("[headers]\nOpenAI-Organization = \"org-123\"\n")
            .unwrap()
            .apply(Overrides { api_key: Some("sk-test".into()), ..Default::default() })
            .unwrap();

        let config = settings.provider_config().unwrap();
        assert_eq!(config.headers.len(), 1);
        assert_eq!(config.headers["OpenAI-Organization"], "org-123");

        let err = Settings::from_toml_str("[headers]\nAuthorization = \"Bearer sk-x\"\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context_value("header"), Some("Authorization"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://localhost:11434/v1\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.base_url, "http://localhost:11434/v1");

        let err = Settings::load(Path::new("/nonexistent/coursecraft.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }
}
