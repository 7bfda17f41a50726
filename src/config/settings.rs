use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PassVaultError, Result};

/// Application-level configuration, loaded from `passvault.toml`.
///
/// Every field has a sensible default so the core works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the backend API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// PBKDF2 iteration count for master-key derivation (default: 600 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_api_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_kdf_iterations() -> u32 {
    600_000
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the app's config directory.
    const FILE_NAME: &'static str = "passvault.toml";

    /// Load settings from `<config_dir>/passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassVaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> crate::crypto::kdf::KdfParams {
        crate::crypto::kdf::KdfParams {
            iterations: self.kdf_iterations,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.api_base_url, "http://localhost:8000/api/v1");
        assert_eq!(s.kdf_iterations, 600_000);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.kdf_iterations, 600_000);
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
api_base_url = "https://vault.example.com/api/v1"
kdf_iterations = 310000
"#;
        fs::write(tmp.path().join("passvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.api_base_url, "https://vault.example.com/api/v1");
        assert_eq!(settings.kdf_iterations, 310_000);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let config = "api_base_url = \"https://vault.example.com\"\n";
        fs::write(tmp.path().join("passvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.api_base_url, "https://vault.example.com");
        // Rest should be defaults
        assert_eq!(settings.kdf_iterations, 600_000);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("passvault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn kdf_params_carries_iterations() {
        let s = Settings {
            api_base_url: default_api_base_url(),
            kdf_iterations: 200_000,
        };
        assert_eq!(s.kdf_params().iterations, 200_000);
    }
}
