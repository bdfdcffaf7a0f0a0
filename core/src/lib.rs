//! PIA Port Forward Core Library
//!
//! This crate provides the contractual behavior of the port forward client:
//! VPN interface probing, credential loading, the forwarding API request,
//! and the error taxonomy that maps every failure mode to a distinct exit
//! code.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod forward;
pub mod interface;

pub use client::{encode_form, ForwardResponse, PortForwardClient};
pub use config::{default_credentials_path, ForwardConfig};
pub use credentials::{generate_client_id, Credentials};
pub use error::{Error, Result};
pub use forward::enable_port_forwarding;
