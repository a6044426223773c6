use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use serpbridge_sdk::{SerpBridgeClient, DEFAULT_BASE_URL};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How the server talks to MCP clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// JSON-RPC over stdin/stdout
    #[default]
    Stdio,
    /// Plain HTTP, for reverse proxies and tunnels
    Http,
    /// HTTPS with certificate files or a generated self-signed certificate
    Https,
    /// HTTPS with Let's Encrypt certificates
    Acme,
}

impl TransportMode {
    pub fn default_port(self) -> u16 {
        match self {
            Self::Stdio | Self::Http => 3000,
            Self::Https | Self::Acme => 443,
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "serpbridge")]
#[command(about = "MCP server for SEO and search data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "SERPBRIDGE_CONFIG", default_value = "serpbridge.toml")]
    pub config: PathBuf,

    /// Transport mode
    #[arg(short, long, env = "SERPBRIDGE_MODE", value_enum)]
    pub mode: Option<TransportMode>,

    /// Host to bind to
    #[arg(long, env = "SERPBRIDGE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SERPBRIDGE_PORT")]
    pub port: Option<u16>,

    /// Path of the MCP endpoint
    #[arg(long, env = "SERPBRIDGE_MCP_PATH")]
    pub mcp_path: Option<String>,

    /// Public domain name (certificate subject, required for acme)
    #[arg(long, env = "SERPBRIDGE_DOMAIN")]
    pub domain: Option<String>,

    /// Contact e-mail for Let's Encrypt
    #[arg(long, env = "SERPBRIDGE_ACME_EMAIL")]
    pub acme_email: Option<String>,

    /// Use the Let's Encrypt production directory instead of staging
    #[arg(long, env = "SERPBRIDGE_ACME_PRODUCTION")]
    pub acme_production: bool,

    /// PEM certificate chain
    #[arg(long, env = "SERPBRIDGE_TLS_CERT")]
    pub cert: Option<PathBuf>,

    /// PEM private key
    #[arg(long, env = "SERPBRIDGE_TLS_KEY")]
    pub key: Option<PathBuf>,

    /// Fallback upstream API key for requests without a bearer token
    #[arg(long, env = "SERPBRIDGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream API base URL
    #[arg(long, env = "SERPBRIDGE_API_BASE_URL")]
    pub api_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub mode: TransportMode,

    #[serde(default = "default_host")]
    pub host: String,

    /// Defaults depend on the mode, see [`ServerConfig::port`]
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default = "default_mcp_path")]
    pub mcp_path: String,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub cert_path: Option<PathBuf>,

    #[serde(default)]
    pub key_path: Option<PathBuf>,

    /// Where a generated self-signed certificate is kept
    #[serde(default = "default_cert_dir")]
    pub cert_dir: PathBuf,

    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub acme_email: Option<String>,

    #[serde(default = "default_acme_cache_dir")]
    pub acme_cache_dir: PathBuf,

    #[serde(default)]
    pub acme_production: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_mcp_path() -> String {
    "/mcp".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cert_dir() -> PathBuf {
    PathBuf::from("certs")
}

fn default_acme_cache_dir() -> PathBuf {
    PathBuf::from("acme-cache")
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: None,
            key_path: None,
            cert_dir: default_cert_dir(),
            domain: None,
            acme_email: None,
            acme_cache_dir: default_acme_cache_dir(),
            acme_production: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::default(),
            host: default_host(),
            port: None,
            mcp_path: default_mcp_path(),
            upstream: UpstreamConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// File (if present) < CLI flags and environment
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&cli.config)?;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration file if it exists, otherwise use defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("Configuration file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if cli.port.is_some() {
            self.port = cli.port;
        }
        if let Some(path) = &cli.mcp_path {
            self.mcp_path = path.clone();
        }
        if cli.domain.is_some() {
            self.tls.domain = cli.domain.clone();
        }
        if cli.acme_email.is_some() {
            self.tls.acme_email = cli.acme_email.clone();
        }
        if cli.acme_production {
            self.tls.acme_production = true;
        }
        if cli.cert.is_some() {
            self.tls.cert_path = cli.cert.clone();
        }
        if cli.key.is_some() {
            self.tls.key_path = cli.key.clone();
        }
        if cli.api_key.is_some() {
            self.upstream.api_key = cli.api_key.clone();
        }
        if let Some(url) = &cli.api_base_url {
            self.upstream.base_url = url.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == TransportMode::Acme && self.tls.domain.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::Invalid(
                "acme mode requires a domain (SERPBRIDGE_DOMAIN)".to_string(),
            ));
        }

        if self.tls.cert_path.is_some() != self.tls.key_path.is_some() {
            return Err(ConfigError::Invalid(
                "tls cert_path and key_path must be given together".to_string(),
            ));
        }

        if !self.mcp_path.starts_with('/') || self.mcp_path == "/health" {
            return Err(ConfigError::Invalid(format!(
                "mcp_path must start with '/' and not be /health, got {:?}",
                self.mcp_path
            )));
        }

        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "upstream timeout_secs must be positive".to_string(),
            ));
        }

        let url = url::Url::parse(&self.upstream.base_url).map_err(|e| {
            ConfigError::Invalid(format!("upstream base_url {:?}: {}", self.upstream.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "upstream base_url must be http(s), got {}",
                url.scheme()
            )));
        }

        if self.mode != TransportMode::Stdio {
            self.bind_addr()?;
        }

        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.mode.default_port())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("host must be an IP address, got {:?}", self.host)))?
        };
        Ok(SocketAddr::new(ip, self.port()))
    }

    /// Names the self-signed certificate covers
    pub fn certificate_names(&self) -> Vec<String> {
        let mut names = vec!["localhost".to_string()];
        if let Some(domain) = self.tls.domain.as_deref().filter(|d| !d.is_empty()) {
            names.insert(0, domain.to_string());
        }
        names
    }

    pub fn upstream_client(&self) -> Result<SerpBridgeClient, serpbridge_sdk::SerpBridgeError> {
        let mut builder = SerpBridgeClient::builder()
            .base_url(self.upstream.base_url.clone())
            .timeout(Duration::from_secs(self.upstream.timeout_secs));
        if let Some(key) = &self.upstream.api_key {
            builder = builder.api_key(key.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_cli() -> Cli {
        Cli {
            config: PathBuf::from("does-not-exist.toml"),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load(&base_cli()).unwrap();
        assert_eq!(config.mode, TransportMode::Stdio);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port(), 3000);
        assert_eq!(config.mcp_path, "/mcp");
        assert_eq!(config.upstream.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.tls.cert_dir, PathBuf::from("certs"));
        assert!(!config.tls.acme_production);
    }

    #[test]
    fn test_port_defaults_follow_mode() {
        let mut config = ServerConfig::default();
        config.mode = TransportMode::Https;
        assert_eq!(config.port(), 443);
        config.mode = TransportMode::Http;
        assert_eq!(config.port(), 3000);
        config.port = Some(8443);
        assert_eq!(config.port(), 8443);
    }

    #[test]
    fn test_file_then_cli_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
mode = "http"
port = 8080

[upstream]
base_url = "http://localhost:9000/api/"
api_key = "file-key"

[tls]
domain = "file.example.com"
"#
        )
        .unwrap();

        let from_file = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(from_file.mode, TransportMode::Http);
        assert_eq!(from_file.port(), 8080);
        assert_eq!(from_file.upstream.api_key.as_deref(), Some("file-key"));
        assert_eq!(from_file.upstream.timeout_secs, 30);

        let cli = Cli {
            config: file.path().to_path_buf(),
            port: Some(9090),
            api_key: Some("cli-key".to_string()),
            ..Default::default()
        };
        let config = ServerConfig::load(&cli).unwrap();
        assert_eq!(config.mode, TransportMode::Http);
        assert_eq!(config.port(), 9090);
        assert_eq!(config.upstream.api_key.as_deref(), Some("cli-key"));
        assert_eq!(config.tls.domain.as_deref(), Some("file.example.com"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = [").unwrap();
        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_acme_requires_domain() {
        let cli = Cli {
            mode: Some(TransportMode::Acme),
            ..base_cli()
        };
        assert!(matches!(
            ServerConfig::load(&cli),
            Err(ConfigError::Invalid(_))
        ));

        let cli = Cli {
            mode: Some(TransportMode::Acme),
            domain: Some("mcp.example.com".to_string()),
            ..base_cli()
        };
        let config = ServerConfig::load(&cli).unwrap();
        assert_eq!(config.port(), 443);
    }

    #[test]
    fn test_cert_and_key_come_together() {
        let cli = Cli {
            mode: Some(TransportMode::Https),
            cert: Some(PathBuf::from("cert.pem")),
            ..base_cli()
        };
        assert!(ServerConfig::load(&cli).is_err());
    }

    #[test]
    fn test_rejects_bad_base_url_and_path() {
        let cli = Cli {
            api_base_url: Some("ftp://example.com".to_string()),
            ..base_cli()
        };
        assert!(ServerConfig::load(&cli).is_err());

        let cli = Cli {
            mcp_path: Some("mcp".to_string()),
            ..base_cli()
        };
        assert!(ServerConfig::load(&cli).is_err());
    }

    #[test]
    fn test_bind_addr() {
        let mut config = ServerConfig {
            mode: TransportMode::Http,
            ..Default::default()
        };
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:3000");
        config.host = "localhost".to_string();
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:3000");
        config.host = "my-host".to_string();
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let mut config = ServerConfig::default();
        config.upstream.api_key = Some("sk-secret".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn test_certificate_names() {
        let mut config = ServerConfig::default();
        assert_eq!(config.certificate_names(), ["localhost"]);
        config.tls.domain = Some("mcp.example.com".to_string());
        assert_eq!(config.certificate_names(), ["mcp.example.com", "localhost"]);
    }
}
