//! The single verification-then-request pass

use crate::{client, interface, Credentials, Error, ForwardConfig, ForwardResponse, Result};
use std::path::Path;

/// Run one full forwarding cycle and return the assigned port.
///
/// Strictly sequential: interface check, credential load, request,
/// classification. The first failure is returned as-is; there is no retry
/// path.
pub fn enable_port_forwarding(config: &ForwardConfig, credentials_path: &Path) -> Result<u16> {
    if !interface::is_connected(&config.interface) {
        return Err(Error::InterfaceNotConnected {
            name: config.interface.clone(),
        });
    }

    let credentials = Credentials::load(credentials_path, &config.interface)?;
    log::debug!("loaded {credentials:?}");

    let client = client::PortForwardClient::new(config)?;
    let response = client.forward(&credentials)?;
    into_port(response)
}

/// Convert an `{"error": ...}` or unrecognized response into its taxonomy
/// error, so callers see a single `Result<u16, Error>`.
fn into_port(response: ForwardResponse) -> Result<u16> {
    match response {
        ForwardResponse::Port(port) => Ok(port),
        ForwardResponse::ApiError(message) => Err(Error::Api { message }),
        ForwardResponse::Unknown(pairs) => {
            let detail = pairs
                .iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect::<Vec<_>>()
                .join("\n");
            Err(Error::UnknownResponse { detail })
        }
    }
}
