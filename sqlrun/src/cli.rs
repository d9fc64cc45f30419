// sqlrun/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).
// Every flag is optional: when absent, the configuration file (or its
// defaults) decides.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sqlrun_core::domain::settings::{
    Engine, RunnerConfig, ScriptOrder, SourceSettings, SslMode, ValidationPolicy,
};

#[derive(Parser)]
#[command(name = "sqlrun")]
#[command(about = "Runs a folder of SQL scripts against a database and reports every result", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs every script of the batch, in order, and prints their results
    Run(RunArgs),

    /// 🧪 Checks script syntax without connecting to a database
    Validate(ValidateArgs),

    /// ⚡ Executes a raw SQL text (Ad-hoc) and prints its result sets
    Query(QueryArgs),
}

#[derive(Args, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Syntax check before execution: off | enforce | warn
    #[arg(long, env = "SQLRUN_VALIDATION")]
    pub validation: Option<ValidationPolicy>,

    /// Per-script execution deadline, in seconds
    #[arg(long, env = "SQLRUN_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Only print the summary and the failures
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Args, Default)]
pub struct ValidateArgs {
    /// Runner configuration file (default: ./sqlrun.yaml or ./sqlrun.yml)
    #[arg(long, env = "SQLRUN_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQL dialect to check against: postgres | duckdb
    #[arg(long, env = "SQLRUN_ENGINE")]
    pub engine: Option<Engine>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Default)]
pub struct QueryArgs {
    /// SQL text; may hold several statements
    pub query: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Where the scripts run: engine and connection parameters.
#[derive(Args, Default)]
pub struct TargetArgs {
    /// Runner configuration file (default: ./sqlrun.yaml or ./sqlrun.yml)
    #[arg(long, env = "SQLRUN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database engine: postgres | duckdb
    #[arg(long, env = "SQLRUN_ENGINE")]
    pub engine: Option<Engine>,

    #[arg(long, env = "SQLRUN_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "SQLRUN_PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "SQLRUN_USER")]
    pub user: Option<String>,

    #[arg(long, env = "SQLRUN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "SQLRUN_DATABASE")]
    pub database: Option<String>,

    /// libpq sslmode: disable | allow | prefer | require | verify-ca | verify-full
    #[arg(long, env = "SQLRUN_SSLMODE")]
    pub sslmode: Option<SslMode>,

    /// DuckDB database file, or :memory:
    #[arg(long, env = "SQLRUN_DUCKDB_PATH")]
    pub duckdb_path: Option<String>,
}

/// Where the scripts come from.
#[derive(Args, Default)]
pub struct SourceArgs {
    /// Directory holding the .sql files
    #[arg(long, env = "SQLRUN_SCRIPTS_DIR")]
    pub scripts_dir: Option<String>,

    /// Git repository to clone instead of reading a local directory
    #[arg(long, env = "SQLRUN_REPO")]
    pub repo: Option<String>,

    #[arg(long, env = "SQLRUN_BRANCH")]
    pub branch: Option<String>,

    /// Scripts directory inside the repository (default: scripts)
    #[arg(long, env = "SQLRUN_REPO_SUBDIR")]
    pub repo_subdir: Option<String>,

    /// Execution order: lexical | listing
    #[arg(long)]
    pub order: Option<ScriptOrder>,

    /// Only run scripts whose file name matches this regex
    #[arg(long)]
    pub select: Option<String>,
}

impl TargetArgs {
    pub fn apply(&self, config: &mut RunnerConfig) {
        if let Some(engine) = self.engine {
            config.engine = engine;
        }
        let conn = &mut config.connection;
        if let Some(host) = &self.host {
            conn.host = host.clone();
        }
        if let Some(port) = self.port {
            conn.port = port;
        }
        if let Some(user) = &self.user {
            conn.username = user.clone();
        }
        if let Some(password) = &self.password {
            conn.password = password.clone();
        }
        if let Some(database) = &self.database {
            conn.database = database.clone();
        }
        if let Some(sslmode) = self.sslmode {
            conn.ssl_mode = sslmode;
        }
        if let Some(path) = &self.duckdb_path {
            config.duckdb_path = path.clone();
        }
    }
}

impl SourceArgs {
    pub fn apply(&self, source: &mut SourceSettings) {
        if let Some(dir) = &self.scripts_dir {
            source.dir = dir.clone();
        }
        if let Some(repo) = &self.repo {
            source.repository = Some(repo.clone());
        }
        if let Some(branch) = &self.branch {
            source.branch = Some(branch.clone());
        }
        if let Some(subdir) = &self.repo_subdir {
            source.subdir = subdir.clone();
        }
        if let Some(order) = self.order {
            source.order = order;
        }
        if let Some(select) = &self.select {
            source.select = Some(select.clone());
        }
    }
}

impl RunArgs {
    pub fn apply(&self, config: &mut RunnerConfig) {
        self.target.apply(config);
        self.source.apply(&mut config.source);
        if let Some(validation) = self.validation {
            config.validation = validation;
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = Some(timeout);
        }
        if let Some(report) = &self.report {
            config.report_path = Some(report.display().to_string());
        }
    }
}
