use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Monthly minimum wage (R$) used when `APP_MINIMUM_WAGE` is unset.
pub const DEFAULT_MINIMUM_WAGE: f64 = 1412.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub portfolio: PortfolioConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(&var_or("APP_ENV", "development"));
        let server = ServerConfig {
            host: var_or("APP_HOST", "127.0.0.1"),
            port: var_or("APP_PORT", "3000")
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort)?,
        };
        let telemetry = TelemetryConfig {
            log_level: var_or("APP_LOG_LEVEL", "info"),
        };

        let minimum_wage = match env::var("APP_MINIMUM_WAGE") {
            Ok(raw) => parse_minimum_wage(&raw)?,
            Err(_) => DEFAULT_MINIMUM_WAGE,
        };
        let mask_names = match env::var("APP_MASK_NAMES") {
            Ok(raw) => parse_switch(&raw).ok_or(ConfigError::InvalidMaskNames { value: raw })?,
            Err(_) => true,
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            portfolio: PortfolioConfig {
                minimum_wage,
                mask_names,
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Accepts `1518`, `1518.00` or the Brazilian `1.518,00`.
fn parse_minimum_wage(raw: &str) -> Result<f64, ConfigError> {
    let invalid = || ConfigError::InvalidMinimumWage {
        value: raw.to_string(),
    };
    let trimmed = raw.trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    let value = normalized.parse::<f64>().map_err(|_| invalid())?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid())
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "sim" => Some(true),
        "0" | "false" | "no" | "off" | "nao" | "não" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied to every classification batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioConfig {
    pub minimum_wage: f64,
    /// Whether client names are masked in outputs unless a caller opts out.
    pub mask_names: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMinimumWage { value: String },
    InvalidMaskNames { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMinimumWage { value } => write!(
                f,
                "APP_MINIMUM_WAGE must be a positive amount in R$ (got '{}')",
                value
            ),
            ConfigError::InvalidMaskNames { value } => {
                write!(f, "APP_MASK_NAMES must be true or false (got '{}')", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMinimumWage { .. }
            | ConfigError::InvalidMaskNames { .. } => None,
        }
    }
}
