// sqlrun-core/src/domain/settings.rs
//
// Typed runner settings. Built once (file + flags + env) and passed down
// explicitly; nothing here is global.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

/// SQL engine the scripts run against.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Postgres,
    DuckDB,
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Engine::Postgres),
            "duckdb" => Ok(Engine::DuckDB),
            other => Err(format!(
                "unknown engine '{}' (expected postgres or duckdb)",
                other
            )),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Postgres => f.write_str("postgres"),
            Engine::DuckDB => f.write_str("duckdb"),
        }
    }
}

/// libpq-compatible `sslmode` values.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "allow" => Ok(SslMode::Allow),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" => Ok(SslMode::VerifyCa),
            "verify-full" => Ok(SslMode::VerifyFull),
            other => Err(format!("unknown sslmode '{}'", other)),
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        };
        f.write_str(s)
    }
}

/// How scripts found in a directory are ordered before execution.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScriptOrder {
    /// By file name, byte-wise.
    #[default]
    Lexical,
    /// Whatever order the directory listing returns.
    Listing,
}

impl FromStr for ScriptOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexical" => Ok(ScriptOrder::Lexical),
            "listing" => Ok(ScriptOrder::Listing),
            other => Err(format!(
                "unknown order '{}' (expected lexical or listing)",
                other
            )),
        }
    }
}

/// What a syntax rejection means for the script.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// No syntax check.
    Off,
    /// Rejected scripts fail and are not executed.
    #[default]
    Enforce,
    /// Rejections are recorded as warnings; the script still runs.
    Warn,
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(ValidationPolicy::Off),
            "enforce" => Ok(ValidationPolicy::Enforce),
            "warn" => Ok(ValidationPolicy::Warn),
            other => Err(format!(
                "unknown validation policy '{}' (expected off, enforce or warn)",
                other
            )),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Validate, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionSettings {
    #[validate(length(min = 1, message = "host cannot be empty"))]
    pub host: String,

    #[validate(range(min = 1, message = "port must be >= 1"))]
    pub port: u16,

    #[validate(length(min = 1, message = "username cannot be empty"))]
    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,

    #[validate(length(min = 1, message = "database cannot be empty"))]
    pub database: String,

    pub ssl_mode: SslMode,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            ssl_mode: SslMode::default(),
        }
    }
}

impl ConnectionSettings {
    /// libpq-style description of the target with the password masked, for
    /// logs and connection errors.
    pub fn redacted(&self) -> String {
        format!(
            "host={} port={} user={} password=*** dbname={} sslmode={}",
            self.host, self.port, self.username, self.database, self.ssl_mode
        )
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SourceSettings {
    /// Local scripts directory. Ignored when `repository` is set.
    pub dir: String,

    /// Remote repository to clone instead of reading `dir`.
    pub repository: Option<String>,

    pub branch: Option<String>,

    /// Directory inside the clone that holds the scripts.
    pub subdir: String,

    pub order: ScriptOrder,

    /// Regular expression on file names; only matching scripts run.
    pub select: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            dir: "scripts".to_string(),
            repository: None,
            branch: None,
            subdir: "scripts".to_string(),
            order: ScriptOrder::default(),
            select: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq, Eq)]
#[serde(default)]
pub struct RunnerConfig {
    pub engine: Engine,

    #[validate(nested)]
    pub connection: ConnectionSettings,

    /// DuckDB database file, or `:memory:`.
    pub duckdb_path: String,

    pub source: SourceSettings,

    pub validation: ValidationPolicy,

    /// Per-script execution deadline, in seconds.
    pub timeout_secs: Option<u64>,

    /// Where to write the JSON run report.
    pub report_path: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            connection: ConnectionSettings::default(),
            duckdb_path: ":memory:".to_string(),
            source: SourceSettings::default(),
            validation: ValidationPolicy::default(),
            timeout_secs: None,
            report_path: None,
        }
    }
}

impl RunnerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
