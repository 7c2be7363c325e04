use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};

use super::{ConfigOverrides, SweepConfig};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "ZIPSWEEP_";

impl SweepConfig {
    /// Load the full layered configuration
    ///
    /// Priority, lowest first: embedded defaults, user or custom config
    /// file, repository config file, `ZIPSWEEP_` environment variables,
    /// command-line overrides.
    pub fn load_with(custom_config: Option<&str>, overrides: Option<&ConfigOverrides>) -> Result<Self> {
        let config: SweepConfig = Self::figment(custom_config, overrides)
            .extract()
            .context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Assemble the provider stack
    pub fn figment(custom_config: Option<&str>, overrides: Option<&ConfigOverrides>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // If custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            tracing::debug!(path = custom_path, "Using custom config file");
            figment = match custom_path.rsplit('.').next() {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user = Self::user_config_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(&user))
                .merge(Json::file(user.replace(".toml", ".json")))
                .merge(Yaml::file(user.replace(".toml", ".yaml")))
                // Repository config - support multiple formats
                .merge(Toml::file("zipsweep.toml"))
                .merge(Json::file("zipsweep.json"))
                .merge(Yaml::file("zipsweep.yaml"))
                .merge(Yaml::file("zipsweep.yml"));
        }

        // Environment variables: ZIPSWEEP_SEARCH__LENGTH=5 -> search.length
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        // Command-line flags always have highest priority
        if let Some(overrides) = overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        figment
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/zipsweep/config.toml"),
            Err(_) => "~/.config/zipsweep/config.toml".to_string(),
        }
    }
}
