//! Run configuration: VPN interface, API endpoint, request timeout

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Interface name the VPN is expected to come up on.
pub const DEFAULT_INTERFACE: &str = "tun0";

/// Port forwarding assignment endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://www.privateinternetaccess.com/vpninfo/port_forward_assignment";

/// Seconds before the API request is abandoned.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for one forwarding run.
///
/// All three values were hardcoded constants in earlier incarnations of this
/// tool; the CLI exposes them as flags with environment overrides.
#[derive(Debug, Clone)]
pub struct ForwardConfig {
    /// Name of the VPN tunnel interface to verify and read the local address from
    pub interface: String,
    /// URL of the port forwarding API endpoint
    pub endpoint: Url,
    /// Upper bound on the whole HTTP request
    pub timeout: Duration,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            interface: DEFAULT_INTERFACE.to_string(),
            endpoint: Url::parse(DEFAULT_ENDPOINT).unwrap(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Default location of the credentials file when none is given on the
/// command line.
pub fn default_credentials_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("pia-forward")
        .join("credentials.json")
}
