use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("linkchecker/", env!("CARGO_PKG_VERSION"));

/// Top-level layout of a TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub checker: CheckerConfig,
}

/// Link checking configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Timeout for a single HTTP request (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Pause after every request before the next one to the same host (seconds)
    #[serde(rename = "wait-secs")]
    pub wait_secs: u64,

    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Skip links that carry no scheme in the page source
    #[serde(rename = "exclude-internal")]
    pub exclude_internal: bool,

    /// File listing hosts whose links are never checked, one per line
    #[serde(rename = "ignore-file")]
    pub ignore_file: Option<PathBuf>,

    /// Oldest TLS version accepted during handshakes
    #[serde(rename = "min-tls")]
    pub min_tls: TlsFloor,

    /// Capacity of a host queue when it is created lazily during dispatch
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,

    /// Upper bound on host workers draining their queues at the same time
    #[serde(rename = "max-concurrent-hosts")]
    pub max_concurrent_hosts: Option<usize>,
}

impl CheckerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            wait_secs: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            exclude_internal: false,
            ignore_file: None,
            min_tls: TlsFloor::default(),
            queue_capacity: 100,
            max_concurrent_hosts: None,
        }
    }
}

/// Minimum TLS protocol version
///
/// Defaults to TLS 1.0 so that legacy servers still complete a handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TlsFloor {
    #[default]
    #[serde(rename = "1.0")]
    Tls10,
    #[serde(rename = "1.1")]
    Tls11,
    #[serde(rename = "1.2")]
    Tls12,
    #[serde(rename = "1.3")]
    Tls13,
}

impl TlsFloor {
    pub fn as_reqwest(self) -> reqwest::tls::Version {
        match self {
            Self::Tls10 => reqwest::tls::Version::TLS_1_0,
            Self::Tls11 => reqwest::tls::Version::TLS_1_1,
            Self::Tls12 => reqwest::tls::Version::TLS_1_2,
            Self::Tls13 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

impl FromStr for TlsFloor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.0" => Ok(Self::Tls10),
            "1.1" => Ok(Self::Tls11),
            "1.2" => Ok(Self::Tls12),
            "1.3" => Ok(Self::Tls13),
            other => Err(format!(
                "unknown TLS version '{}', expected one of 1.0, 1.1, 1.2, 1.3",
                other
            )),
        }
    }
}

impl fmt::Display for TlsFloor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tls10 => "1.0",
            Self::Tls11 => "1.1",
            Self::Tls12 => "1.2",
            Self::Tls13 => "1.3",
        };
        write!(f, "{}", s)
    }
}
