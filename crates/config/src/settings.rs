//! TOML-backed gateway settings.

use crate::error::{ConfigError, ConfigResult};
use crate::network::{NetworkConfig, NetworkRegistry, NetworkType};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

/// How transaction lookups are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Record query against a ledger node through the session.
    Direct,
    /// GET against the mirror REST service.
    #[default]
    Mirror,
}

/// HTTP client settings for the mirror service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MirrorSettings {
    /// Request timeout in milliseconds; unset leaves the client default.
    pub timeout_ms: Option<u64>,
    /// `User-Agent` header value.
    pub user_agent: Option<String>,
}

/// Per-network URL overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NetworkOverride {
    /// Replaces the built-in explorer URL.
    pub explorer_url: Option<String>,
    /// Replaces the built-in mirror URL.
    pub mirror_url: Option<String>,
}

/// Overrides keyed by network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NetworkOverrides {
    /// Mainnet overrides.
    pub main: NetworkOverride,
    /// Testnet overrides.
    pub test: NetworkOverride,
}

/// Top-level gateway settings. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewaySettings {
    /// Lookup strategy for `get_transaction`.
    pub lookup_mode: LookupMode,
    /// Mirror HTTP client settings.
    pub mirror: MirrorSettings,
    /// Explorer and mirror overrides.
    pub networks: NetworkOverrides,
}

impl GatewaySettings {
    /// Reads and validates settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), lookup_mode = ?settings.lookup_mode, "loaded gateway settings");
        Ok(settings)
    }

    /// Parses and validates settings from TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks every configured URL.
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, overrides) in [("main", &self.networks.main), ("test", &self.networks.test)] {
            if let Some(value) = &overrides.explorer_url {
                check_url(&format!("networks.{key}.explorer_url"), value)?;
            }
            if let Some(value) = &overrides.mirror_url {
                check_url(&format!("networks.{key}.mirror_url"), value)?;
            }
        }
        Ok(())
    }

    /// Builds the network registry, applying overrides on top of the built-ins.
    #[must_use]
    pub fn registry(&self) -> NetworkRegistry {
        NetworkRegistry::new(
            apply_override(NetworkType::MainNet, &self.networks.main),
            apply_override(NetworkType::TestNet, &self.networks.test),
        )
    }
}

fn check_url(field: &str, value: &str) -> ConfigResult<()> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::invalid_url(field, value)),
    }
}

fn apply_override(network_type: NetworkType, overrides: &NetworkOverride) -> NetworkConfig {
    let mut config = NetworkConfig::for_network(network_type);
    if let Some(explorer_url) = &overrides.explorer_url {
        config.explorer_url = explorer_url.clone();
    }
    if let Some(mirror_url) = &overrides.mirror_url {
        config.mirror_url = Some(mirror_url.clone());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_settings_use_builtins() {
        let settings = GatewaySettings::from_toml_str("").unwrap();
        assert_eq!(settings.lookup_mode, LookupMode::Mirror);
        assert_eq!(settings.mirror, MirrorSettings::default());
        assert_eq!(settings.registry(), NetworkRegistry::default());
    }

    #[test]
    fn test_overrides_apply_per_network() {
        let settings = GatewaySettings::from_toml_str(
            r#"
lookup_mode = "direct"

[mirror]
timeout_ms = 2500
user_agent = "gateway-test"

[networks.test]
mirror_url = "http://127.0.0.1:5551/api/v1/transactions/"
"#,
        )
        .unwrap();

        assert_eq!(settings.lookup_mode, LookupMode::Direct);
        assert_eq!(settings.mirror.timeout_ms, Some(2500));
        assert_eq!(settings.mirror.user_agent.as_deref(), Some("gateway-test"));

        let registry = settings.registry();
        assert_eq!(
            registry.resolve("test").mirror_url(),
            Some("http://127.0.0.1:5551/api/v1/transactions/")
        );
        assert_eq!(
            registry.resolve("test").explorer_url,
            crate::network::TESTNET_EXPLORER_URL
        );
        assert_eq!(
            registry.resolve("main"),
            &NetworkConfig::for_network(NetworkType::MainNet)
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = GatewaySettings::from_toml_str(
            r#"
[networks.main]
explorer_url = "not a url"
"#,
        )
        .unwrap_err();
        match err {
            ConfigError::InvalidUrl { field, value } => {
                assert_eq!(field, "networks.main.explorer_url");
                assert_eq!(value, "not a url");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(GatewaySettings::from_toml_str(
            "[networks.test]\nmirror_url = \"ftp://mirror.example/\"\n"
        )
        .is_err());
    }

    #[test]
    fn test_unknown_lookup_mode_is_parse_error() {
        let err = GatewaySettings::from_toml_str("lookup_mode = \"cache\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "lookup_mode = \"mirror\"\n[mirror]\ntimeout_ms = 100").unwrap();

        let settings = GatewaySettings::load(file.path()).unwrap();
        assert_eq!(settings.mirror.timeout_ms, Some(100));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GatewaySettings::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
