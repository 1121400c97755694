//! Network selection and gateway settings.
//!
//! [`NetworkRegistry`] maps a caller-supplied network key to one of two fixed
//! [`NetworkConfig`] entries; [`GatewaySettings`] loads optional overrides
//! and the lookup strategy from TOML.

pub mod error;
pub mod network;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use network::{
    NetworkConfig, NetworkRegistry, NetworkType, MAINNET_EXPLORER_URL, MAINNET_MIRROR_URL,
    MAIN_NETWORK_KEY, TESTNET_EXPLORER_URL, TESTNET_MIRROR_URL,
};
pub use settings::{GatewaySettings, LookupMode, MirrorSettings, NetworkOverride, NetworkOverrides};
