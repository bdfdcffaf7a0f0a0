//! PIA Port Forward - command line client
//!
//! Thin glue around pia-forward-core: argument parsing, logger setup,
//! result reporting, and the single process exit site.

use clap::{ArgAction, Parser};
use pia_forward_core::{config, credentials, enable_port_forwarding, Error, ForwardConfig};
use std::error::Error as _;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use url::Url;

#[derive(Debug, Parser)]
#[command(
    name = "pia-forward",
    version,
    about = "Enables port forwarding for a Private Internet Access VPN and prints the forwarded port"
)]
struct Args {
    /// Path to the credentials file (JSON object with user/pass/client_id,
    /// or the deprecated three-line format)
    #[arg(value_name = "CREDENTIALS_FILE")]
    credentials: Option<PathBuf>,

    /// VPN tunnel interface name
    #[arg(long, env = "PIA_INTERFACE", default_value = config::DEFAULT_INTERFACE, value_name = "NAME")]
    interface: String,

    /// Port forwarding API endpoint URL
    #[arg(long, env = "PIA_ENDPOINT", default_value = config::DEFAULT_ENDPOINT, value_name = "URL")]
    endpoint: Url,

    /// Seconds before the API request is abandoned
    #[arg(long, env = "PIA_TIMEOUT_SECS", default_value_t = config::DEFAULT_TIMEOUT_SECS, value_name = "SECONDS")]
    timeout_secs: u64,

    /// Print decoded request/response payloads and credential values
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Generate a fresh client id, print it, and exit
    #[arg(long, action = ArgAction::SetTrue)]
    generate_client_id: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if args.generate_client_id {
        println!("{}", credentials::generate_client_id());
        return;
    }

    let config = ForwardConfig {
        interface: args.interface,
        endpoint: args.endpoint,
        timeout: Duration::from_secs(args.timeout_secs),
    };
    let credentials_path = args
        .credentials
        .unwrap_or_else(config::default_credentials_path);

    match enable_port_forwarding(&config, &credentials_path) {
        Ok(port) => {
            println!("Forwarded port: {port}");
            println!("Allow this port in your firewall and point your applications at it.");
        }
        Err(err) => {
            report_failure(&err);
            process::exit(err.exit_code());
        }
    }
}

/// `--debug` routes component diagnostics to stdout at debug level; the
/// default only surfaces warnings.
fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .init();
}

/// Print the error and its cause chain to stderr.
fn report_failure(err: &Error) {
    eprintln!("error: {err}");
    let mut cause = err.source();
    while let Some(source) = cause {
        eprintln!("  caused by: {source}");
        cause = source.source();
    }
    eprintln!("exiting with status {}", err.exit_code());
}
