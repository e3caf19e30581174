use serde::{Deserialize, Serialize};

/// Typed view over the application-level part of the config file.
///
/// Per-backend tables (`[picbed.<name>]`) are not modelled here; they are
/// read untyped through [`crate::ConfigResolver`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "super::defaults::picbed_settings")]
    pub picbed: PicbedSettings,
    #[serde(default = "super::defaults::transport_settings")]
    pub transport: TransportSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PicbedSettings {
    /// Backend used when none is given explicitly. Empty = unset.
    #[serde(default)]
    pub current: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportSettings {
    #[serde(default = "super::defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "super::defaults::user_agent")]
    pub user_agent: String,
}
