//! API credential loading, validation, and client id generation

use crate::{interface, Error, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Bytes of randomness behind a generated client id.
const CLIENT_ID_RANDOM_BYTES: usize = 32;

/// The fully populated credential bundle sent to the forwarding API.
///
/// `user`, `pass`, and `client_id` come from the credentials file; `local_ip`
/// is always taken from the live interface lookup, never from the file.
/// Constructed once per run and immutable afterwards.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
    pub client_id: String,
    pub local_ip: String,
}

// Keep the password out of debug/log output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("local_ip", &self.local_ip)
            .finish()
    }
}

/// On-disk shape of the preferred JSON format.
///
/// Unknown keys are ignored, so a stray `local_ip` in the file never reaches
/// the request; the injected address wins.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    user: String,
    pass: String,
    client_id: String,
}

impl CredentialsFile {
    fn validate(&self, path: &Path) -> Result<()> {
        for (name, value) in [
            ("user", &self.user),
            ("pass", &self.pass),
            ("client_id", &self.client_id),
        ] {
            if value.is_empty() {
                return Err(Error::credentials_malformed(
                    path,
                    format!("field `{name}` is empty"),
                    None,
                ));
            }
        }
        Ok(())
    }
}

impl Credentials {
    /// Load credentials from `path` and inject the local address of
    /// `interface_name`.
    ///
    /// The file is read fresh on every call. An unreadable file is
    /// [`Error::CredentialsUnavailable`], a parse or validation failure is
    /// [`Error::CredentialsMalformed`], and a failed address lookup
    /// propagates as [`Error::Interface`] unchanged.
    pub fn load(path: &Path, interface_name: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::CredentialsUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let file = parse(path, &content)?;
        file.validate(path)?;

        let local_ip = interface::ipv4_address(interface_name)?.to_string();

        Ok(Self {
            user: file.user,
            pass: file.pass,
            client_id: file.client_id,
            local_ip,
        })
    }
}

/// Parse file content in either supported format.
///
/// Detection is explicit: content whose first non-whitespace byte is `{` is
/// the JSON object format, anything else goes through the deprecated
/// line-oriented adapter.
fn parse(path: &Path, content: &str) -> Result<CredentialsFile> {
    if content.trim_start().starts_with('{') {
        serde_json::from_str(content).map_err(|source| {
            Error::credentials_malformed(path, "not a valid credentials JSON object", Some(source))
        })
    } else {
        parse_legacy(path, content)
    }
}

/// Deprecated format: user, password, and client id as three
/// newline-terminated lines, read positionally.
fn parse_legacy(path: &Path, content: &str) -> Result<CredentialsFile> {
    let mut lines = content.lines().map(|line| line.trim_end_matches('\r'));
    let mut field = |name: &str| match lines.next() {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(Error::credentials_malformed(
            path,
            format!("legacy line format is missing the `{name}` line"),
            None,
        )),
    };

    Ok(CredentialsFile {
        user: field("user")?,
        pass: field("pass")?,
        client_id: field("client_id")?,
    })
}

/// Generate a securely random client id, 64 hex characters.
///
/// The forwarding API only needs an id that is stable for the session and
/// hard to guess. New setups can mint one via `--generate-client-id` and
/// store it in the credentials file.
pub fn generate_client_id() -> String {
    let mut bytes = [0u8; CLIENT_ID_RANDOM_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
