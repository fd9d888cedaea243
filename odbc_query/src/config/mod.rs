//! Driver configuration assembled from a DSN / connection string.
//!
//! Keys are matched case-insensitively. Values may be wrapped in braces,
//! which lets them carry `;` (`DRIVER={Query Driver};`).

use crate::error::{OdbcError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 10800;
pub const DEFAULT_SCHEMA: &str = "PUBLIC";
pub const DEFAULT_PAGE_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub dsn: String,
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub schema: String,
    pub page_size: usize,
    pub distributed_joins: bool,
    pub enforce_join_order: bool,
    pub replicated_only: bool,
    pub collocated: bool,
    pub lazy: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            driver: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            schema: DEFAULT_SCHEMA.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            distributed_joins: false,
            enforce_join_order: false,
            replicated_only: false,
            collocated: false,
            lazy: false,
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Maximum number of parameter rows sent in one batch request.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        let mut config = Self::default();
        for (key, value) in parse_attributes(conn_str)? {
            config.apply_attribute(&key, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn to_connection_string(&self) -> String {
        let mut parts = Vec::new();
        if !self.dsn.is_empty() {
            parts.push(format!("DSN={}", quote_value(&self.dsn)));
        }
        if !self.driver.is_empty() {
            parts.push(format!("DRIVER={}", quote_value(&self.driver)));
        }
        parts.push(format!("ADDRESS={}", self.address()));
        parts.push(format!("SCHEMA={}", quote_value(&self.schema)));
        parts.push(format!("PAGE_SIZE={}", self.page_size));
        parts.push(format!("DISTRIBUTED_JOINS={}", self.distributed_joins));
        parts.push(format!("ENFORCE_JOIN_ORDER={}", self.enforce_join_order));
        parts.push(format!("REPLICATED_ONLY={}", self.replicated_only));
        parts.push(format!("COLLOCATED={}", self.collocated));
        parts.push(format!("LAZY={}", self.lazy));
        let mut out = parts.join(";");
        out.push(';');
        out
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| OdbcError::InvalidConnectionString(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| OdbcError::InternalError(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(OdbcError::InvalidAttribute {
                key: "page_size".to_string(),
                value: "0".to_string(),
            });
        }
        if self.host.is_empty() {
            return Err(OdbcError::InvalidAttribute {
                key: "address".to_string(),
                value: String::new(),
            });
        }
        Ok(())
    }

    fn apply_attribute(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "dsn" => self.dsn = value.to_string(),
            "driver" => self.driver = value.to_string(),
            "address" | "server" => {
                let (host, port) = parse_address(value)?;
                self.host = host;
                if let Some(port) = port {
                    self.port = port;
                }
            }
            "port" => self.port = parse_number(key, value)?,
            "schema" => self.schema = value.to_string(),
            "page_size" => self.page_size = parse_number(key, value)?,
            "distributed_joins" => self.distributed_joins = parse_bool(key, value)?,
            "enforce_join_order" => self.enforce_join_order = parse_bool(key, value)?,
            "replicated_only" => self.replicated_only = parse_bool(key, value)?,
            "collocated" => self.collocated = parse_bool(key, value)?,
            "lazy" => self.lazy = parse_bool(key, value)?,
            _ => log::warn!("Unknown connection string attribute ignored: {}", key),
        }
        Ok(())
    }
}

/// Splits `KEY=VALUE;` pairs. Keys are lower-cased and trimmed.
fn parse_attributes(conn_str: &str) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    let mut rest = conn_str.trim();

    while !rest.is_empty() {
        let eq = rest.find('=').ok_or_else(|| {
            OdbcError::InvalidConnectionString(format!("Missing '=' in \"{}\"", rest))
        })?;
        let key = rest[..eq].trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(OdbcError::InvalidConnectionString(
                "Empty attribute name".to_string(),
            ));
        }
        rest = rest[eq + 1..].trim_start();

        let value;
        if let Some(braced) = rest.strip_prefix('{') {
            let close = braced.find('}').ok_or_else(|| {
                OdbcError::InvalidConnectionString(format!("Unterminated '{{' for '{}'", key))
            })?;
            value = braced[..close].to_string();
            rest = braced[close + 1..].trim_start();
            rest = rest.strip_prefix(';').unwrap_or(rest);
        } else {
            let end = rest.find(';').unwrap_or(rest.len());
            value = rest[..end].trim().to_string();
            rest = rest.get(end + 1..).unwrap_or("");
        }

        out.push((key, value));
        rest = rest.trim_start();
    }

    Ok(out)
}

fn parse_address(value: &str) -> Result<(String, Option<u16>)> {
    let value = value.trim();
    match value.rsplit_once(':') {
        Some((host, port)) => {
            let port = parse_number::<u16>("address", port)?;
            Ok((host.trim().to_string(), Some(port)))
        }
        None => Ok((value.to_string(), None)),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| OdbcError::InvalidAttribute {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(OdbcError::InvalidAttribute {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn quote_value(value: &str) -> String {
    if value.contains(';') || value.contains('=') || value.starts_with('{') {
        format!("{{{}}}", value)
    } else {
        value.to_string()
    }
}
