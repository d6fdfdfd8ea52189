use crate::config::{AppConfig, MAX_CURRENCY_SCALE};
use anyhow::{ensure, Result};
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use std::path::Path;

const CONFIG_DIR: &str = "config";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging TOML, environment variables, and JSON.
    ///
    /// Missing files are skipped; every field falls back to its default.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source exists but cannot be parsed,
    /// or if the merged settings are out of range.
    pub fn load() -> Result<AppConfig> {
        Self::load_dir(Path::new(CONFIG_DIR), None)
    }

    /// Loads application configuration with a specific profile.
    ///
    /// `config/Config.{profile}.toml` overrides the base file; the environment
    /// and JSON layers still apply on top.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        Self::load_dir(Path::new(CONFIG_DIR), Some(profile))
    }

    /// Loads the layered configuration rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed or a setting is out of range.
    pub fn load_dir(dir: &Path, profile: Option<&str>) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Toml::file(dir.join("Config.toml")));
        if let Some(profile) = profile {
            figment = figment.merge(Toml::file(dir.join(format!("Config.{profile}.toml"))));
        }
        let config: AppConfig = figment
            .merge(Env::prefixed("APP_").split("__"))
            .join(Json::file(dir.join("Config.json")))
            .extract()?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Loads configuration from an explicit TOML path layered under the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &AppConfig) -> Result<()> {
        ensure!(
            config.engine.currency_scale <= MAX_CURRENCY_SCALE,
            "engine.currency_scale must be at most {MAX_CURRENCY_SCALE}, got {}",
            config.engine.currency_scale
        );
        if let Some(min) = config.engine.min_viable_stake {
            ensure!(
                min > rust_decimal::Decimal::ZERO,
                "engine.min_viable_stake must be positive, got {min}"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    fn config_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let config = ConfigLoader::load_from("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.engine.currency_scale, 0);
        assert_eq!(config.engine.history_snapshot_len, 30);
    }

    #[test]
    fn profile_file_overrides_base_file() {
        let dir = config_dir(&[
            (
                "Config.toml",
                "[server]\nport = 9000\n\n[engine]\ncurrency_scale = 2\n",
            ),
            ("Config.staging.toml", "[server]\nport = 9100\n"),
        ]);

        let base = ConfigLoader::load_dir(dir.path(), None).unwrap();
        assert_eq!(base.server.port, 9000);

        let staged = ConfigLoader::load_dir(dir.path(), Some("staging")).unwrap();
        assert_eq!(staged.server.port, 9100);
        // untouched keys still come from the base file
        assert_eq!(staged.engine.currency_scale, 2);
    }

    #[test]
    fn missing_profile_file_keeps_base_values() {
        let dir = config_dir(&[("Config.toml", "[server]\nport = 9000\n")]);
        let config = ConfigLoader::load_dir(dir.path(), Some("absent")).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn json_layer_only_fills_unset_keys() {
        let dir = config_dir(&[
            ("Config.toml", "[server]\nport = 9000\n"),
            (
                "Config.json",
                r#"{"server": {"port": 1234, "host": "127.0.0.1"}, "engine": {"min_viable_stake": 500}}"#,
            ),
        ]);
        let config = ConfigLoader::load_dir(dir.path(), None).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.engine.min_viable_stake, Some(dec!(500)));
    }

    #[test]
    fn rejects_currency_scale_beyond_decimal_precision() {
        let dir = config_dir(&[("Config.toml", "[engine]\ncurrency_scale = 29\n")]);
        let err = ConfigLoader::load_dir(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("currency_scale"));

        let path = dir.path().join("Config.toml");
        assert!(ConfigLoader::load_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn accepts_largest_currency_scale() {
        let dir = config_dir(&[("Config.toml", "[engine]\ncurrency_scale = 28\n")]);
        let config = ConfigLoader::load_dir(dir.path(), None).unwrap();
        assert_eq!(config.engine.currency_unit(), rust_decimal::Decimal::new(1, 28));
    }

    #[test]
    fn rejects_non_positive_min_viable_stake() {
        let dir = config_dir(&[("Config.toml", "[engine]\nmin_viable_stake = 0\n")]);
        assert!(ConfigLoader::load_dir(dir.path(), None).is_err());
    }
}
