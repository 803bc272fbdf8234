//! Webhook server configuration.
//!
//! Every setting has a default matching the in-cluster deployment. Values are
//! read from the environment once at startup; unparseable values are logged
//! and replaced by the default.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;

const PORT_ENV: &str = "WEBHOOK_PORT";
const LISTEN_ADDRESS_ENV: &str = "WEBHOOK_LISTEN_ADDRESS";
const CERT_FILE_ENV: &str = "WEBHOOK_TLS_CERT_FILE";
const KEY_FILE_ENV: &str = "WEBHOOK_TLS_PRIVATE_KEY_FILE";

/// Listener and TLS settings of the webhook server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookConfig {
    pub listen_address: IpAddr,
    pub port: u16,
    /// PEM encoded certificate chain
    pub cert_file: PathBuf,
    /// PEM encoded private key
    pub key_file: PathBuf,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            listen_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: WEBHOOK_PORT,
            cert_file: PathBuf::from(WEBHOOK_CERT_PATH),
            key_file: PathBuf::from(WEBHOOK_KEY_PATH),
        }
    }
}

impl WebhookConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            listen_address: parse_or(
                LISTEN_ADDRESS_ENV,
                lookup(LISTEN_ADDRESS_ENV),
                defaults.listen_address,
            ),
            port: parse_or(PORT_ENV, lookup(PORT_ENV), defaults.port),
            cert_file: lookup(CERT_FILE_ENV)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cert_file),
            key_file: lookup(KEY_FILE_ENV)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.key_file),
        }
    }

    /// Socket the server binds to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_address, self.port)
    }

    /// Whether both TLS files exist
    pub fn has_certificates(&self) -> bool {
        self.cert_file.exists() && self.key_file.exists()
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match value {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(variable = key, value = %raw, default = %default, "Invalid value, using default");
                default
            }
        },
    }
}
