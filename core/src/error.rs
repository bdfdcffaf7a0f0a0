//! Error types for the pia-forward-core crate

use std::path::PathBuf;
use thiserror::Error;

/// Every failure mode of a forwarding run, one variant per kind.
///
/// Each variant carries the context of the boundary where it was detected
/// (interface name, file path, endpoint URL) and the underlying cause where
/// one exists. Variants map 1:1 onto process exit codes via [`Error::exit_code`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("VPN interface `{name}` is not connected, connect it first")]
    InterfaceNotConnected { name: String },

    #[error("interface `{name}` has {count} IPv4 addresses bound, expected exactly one")]
    Interface { name: String, count: usize },

    #[error("credentials file `{}` does not exist or cannot be opened", .path.display())]
    CredentialsUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credentials file `{}` is malformed: {detail}", .path.display())]
    CredentialsMalformed {
        path: PathBuf,
        detail: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("request to API endpoint `{url}` failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from `{url}`: {detail}\nresponse text: {body}")]
    MalformedResponse {
        url: String,
        detail: String,
        body: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("API returned an error: {message}")]
    Api { message: String },

    #[error("API returned unknown key/value pair(s):\n{detail}")]
    UnknownResponse { detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn credentials_malformed(
        path: impl Into<PathBuf>,
        detail: impl Into<String>,
        source: Option<serde_json::Error>,
    ) -> Self {
        Error::CredentialsMalformed {
            path: path.into(),
            detail: detail.into(),
            source,
        }
    }

    pub(crate) fn network(url: &url::Url, source: reqwest::Error) -> Self {
        Error::Network {
            url: url.to_string(),
            source,
        }
    }

    /// Process exit code for this error kind.
    ///
    /// The mapping is a scripting contract: callers dispatch on these codes,
    /// so each kind keeps a distinct, stable value. `0` is reserved for
    /// success.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InterfaceNotConnected { .. } => 1,
            Error::Interface { .. } => 2,
            Error::CredentialsUnavailable { .. } => 3,
            Error::CredentialsMalformed { .. } => 4,
            Error::Network { .. } => 5,
            Error::MalformedResponse { .. } => 6,
            Error::Api { .. } => 7,
            Error::UnknownResponse { .. } => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_errors() -> Vec<Error> {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        vec![
            Error::InterfaceNotConnected {
                name: "tun0".into(),
            },
            Error::Interface {
                name: "tun0".into(),
                count: 2,
            },
            Error::CredentialsUnavailable {
                path: "/tmp/creds.json".into(),
                source: io,
            },
            Error::credentials_malformed("/tmp/creds.json", "missing key", Some(json)),
            Error::MalformedResponse {
                url: "http://example.invalid/".into(),
                detail: "body is not a JSON object".into(),
                body: "<html>".into(),
                source: None,
            },
            Error::Api {
                message: "bad client_id".into(),
            },
            Error::UnknownResponse {
                detail: "foo: 1".into(),
            },
        ]
    }

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = sample_errors();
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        // The Network variant needs a live reqwest::Error to build, but its
        // code is part of the same contract.
        codes.push(5);
        assert!(codes.iter().all(|&c| c != 0));
        let mut deduped = codes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), codes.len());
    }

    #[test]
    fn test_display_carries_context() {
        let err = Error::InterfaceNotConnected {
            name: "tun0".into(),
        };
        assert!(err.to_string().contains("tun0"));

        let err = Error::credentials_malformed("/etc/pia/creds.json", "missing key `user`", None);
        assert!(err.to_string().contains("/etc/pia/creds.json"));
        assert!(err.to_string().contains("missing key `user`"));
    }

    #[test]
    fn test_io_cause_is_preserved() {
        use std::error::Error as _;
        let err = Error::CredentialsUnavailable {
            path: "/nope".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().unwrap().to_string().contains("denied"));
    }
}
