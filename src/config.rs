//! Connection configuration and connection-string parsing.
//!
//! A [`Database`](crate::db::Database) is built from a [`ConnectionInput`]: either a URL-style
//! connection string or a structured [`DbConfig`]. Connection strings are matched against an
//! ordered list of parsers by scheme prefix; the first match wins.

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::error::SqlFacadeError;
use crate::types::DatabaseType;

#[cfg(feature = "postgres")]
pub use deadpool_postgres::Config as PgConfig;

/// Options for configuring a `PostgreSQL` pool.
#[cfg(feature = "postgres")]
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub config: PgConfig,
}

#[cfg(feature = "postgres")]
impl PostgresOptions {
    #[must_use]
    pub fn new(config: PgConfig) -> Self {
        Self { config }
    }

    /// Cap the number of pooled connections.
    #[must_use]
    pub fn with_max_connections(mut self, max_size: usize) -> Self {
        self.config.pool = Some(deadpool_postgres::PoolConfig::new(max_size));
        self
    }
}

/// Options for configuring a `SQLite` pool.
#[cfg(feature = "sqlite")]
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub max_connections: Option<usize>,
}

#[cfg(feature = "sqlite")]
impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            max_connections: None,
        }
    }

    /// Cap the number of pooled connections.
    ///
    /// Each connection to `:memory:` is a separate database, so in-memory pools are limited
    /// to 1.
    #[must_use]
    pub fn with_max_connections(mut self, max_size: usize) -> Self {
        self.max_connections = Some(max_size);
        self
    }

    /// Whether the path names a private in-memory database.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path.trim() == ":memory:"
    }

    /// Pool size to use: the configured one, or 1 for `:memory:`, or deadpool's default.
    #[must_use]
    pub fn effective_max_connections(&self) -> Option<usize> {
        self.max_connections
            .or_else(|| self.is_in_memory().then_some(1))
    }
}

/// Structured configuration for one backend.
#[derive(Debug, Clone)]
pub enum DbConfig {
    #[cfg(feature = "postgres")]
    Postgres(PostgresOptions),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOptions),
}

impl DbConfig {
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            DbConfig::Postgres(_) => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            DbConfig::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    /// Parse a connection string with the built-in parsers.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::ConnectionStringParse` if no parser accepts the scheme or the
    /// matched parser rejects the string.
    pub fn from_connection_string(connection_string: &str) -> Result<Self, SqlFacadeError> {
        parse_with(connection_string, DEFAULT_PARSERS)
    }

    /// Check that the fields needed to open a pool are present.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::ConfigError` naming the first missing field.
    pub fn validate(&self) -> Result<(), SqlFacadeError> {
        match self {
            #[cfg(feature = "postgres")]
            DbConfig::Postgres(opts) => {
                let cfg = &opts.config;
                if cfg.dbname.is_none() {
                    return Err(SqlFacadeError::ConfigError("dbname is required".to_string()));
                }
                if cfg.host.is_none() && cfg.hosts.is_none() {
                    return Err(SqlFacadeError::ConfigError("host is required".to_string()));
                }
                if cfg.user.is_none() {
                    return Err(SqlFacadeError::ConfigError("user is required".to_string()));
                }
                Ok(())
            }
            #[cfg(feature = "sqlite")]
            DbConfig::Sqlite(opts) => {
                if opts.db_path.trim().is_empty() {
                    return Err(SqlFacadeError::ConfigError(
                        "sqlite database path is required".to_string(),
                    ));
                }
                if opts.is_in_memory()
                    && let Some(max) = opts.max_connections
                    && max > 1
                {
                    return Err(SqlFacadeError::ConfigError(format!(
                        "an in-memory sqlite database cannot be pooled across {max} connections; use 1"
                    )));
                }
                Ok(())
            }
        }
    }
}

#[cfg(feature = "postgres")]
impl From<PostgresOptions> for DbConfig {
    fn from(opts: PostgresOptions) -> Self {
        DbConfig::Postgres(opts)
    }
}

#[cfg(feature = "postgres")]
impl From<PgConfig> for DbConfig {
    fn from(cfg: PgConfig) -> Self {
        DbConfig::Postgres(PostgresOptions::new(cfg))
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteOptions> for DbConfig {
    fn from(opts: SqliteOptions) -> Self {
        DbConfig::Sqlite(opts)
    }
}

/// What a [`Database`](crate::db::Database) is constructed from.
#[derive(Debug, Clone)]
pub enum ConnectionInput {
    ConnectionString(String),
    Config(DbConfig),
}

impl ConnectionInput {
    /// Resolve into a validated structured configuration.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::ConnectionStringParse` or `SqlFacadeError::ConfigError`.
    pub fn into_config(self) -> Result<DbConfig, SqlFacadeError> {
        let config = match self {
            ConnectionInput::ConnectionString(s) => DbConfig::from_connection_string(&s)?,
            ConnectionInput::Config(config) => config,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<&str> for ConnectionInput {
    fn from(s: &str) -> Self {
        ConnectionInput::ConnectionString(s.to_string())
    }
}

impl From<String> for ConnectionInput {
    fn from(s: String) -> Self {
        ConnectionInput::ConnectionString(s)
    }
}

impl From<DbConfig> for ConnectionInput {
    fn from(config: DbConfig) -> Self {
        ConnectionInput::Config(config)
    }
}

#[cfg(feature = "postgres")]
impl From<PostgresOptions> for ConnectionInput {
    fn from(opts: PostgresOptions) -> Self {
        ConnectionInput::Config(opts.into())
    }
}

#[cfg(feature = "postgres")]
impl From<PgConfig> for ConnectionInput {
    fn from(cfg: PgConfig) -> Self {
        ConnectionInput::Config(cfg.into())
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteOptions> for ConnectionInput {
    fn from(opts: SqliteOptions) -> Self {
        ConnectionInput::Config(opts.into())
    }
}

/// Decides whether a parser handles a connection string (already lowercased).
pub type SchemeMatcher = fn(&str) -> bool;
/// Turns a matched connection string into a structured configuration.
pub type ConnectionStringParser = fn(&str) -> Result<DbConfig, SqlFacadeError>;

/// Built-in parsers, tried in order.
pub const DEFAULT_PARSERS: &[(SchemeMatcher, ConnectionStringParser)] = &[
    #[cfg(feature = "postgres")]
    (is_postgres_url, parse_postgres_url),
    #[cfg(feature = "sqlite")]
    (is_sqlite_url, parse_sqlite_url),
];

/// Parse `connection_string` with the first parser whose matcher accepts it.
///
/// Extra dialects are supported by passing a longer list; existing entries stay untouched.
///
/// # Errors
/// Returns `SqlFacadeError::ConnectionStringParse` if no matcher accepts the string, or the
/// error of the selected parser.
pub fn parse_with(
    connection_string: &str,
    parsers: &[(SchemeMatcher, ConnectionStringParser)],
) -> Result<DbConfig, SqlFacadeError> {
    let trimmed = connection_string.trim();
    let lower = trimmed.to_ascii_lowercase();
    let (_, parser) = parsers
        .iter()
        .find(|(matches, _)| matches(&lower))
        .ok_or_else(|| {
            SqlFacadeError::ConnectionStringParse(format!(
                "no parser for connection string scheme: {}",
                scheme_of(trimmed)
            ))
        })?;
    parser(trimmed)
}

// Never echo the whole string back; it usually carries a password.
fn scheme_of(connection_string: &str) -> &str {
    connection_string
        .split_once(':')
        .map_or("<none>", |(scheme, _)| scheme)
}

/// Pull recognized query options out of the URL, leaving the rest in place.
fn take_options(url: &mut Url, keys: &[&str]) -> HashMap<String, String> {
    let mut opts = HashMap::new();
    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(k, v)| {
            let key_lower = k.to_ascii_lowercase();
            if keys.contains(&key_lower.as_str()) {
                opts.insert(key_lower, v.into_owned());
                None
            } else {
                Some((k.into_owned(), v.into_owned()))
            }
        })
        .collect();

    if remaining.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(remaining);
    }
    opts
}

fn parse_usize_option(
    opts: &HashMap<String, String>,
    key: &str,
) -> Result<Option<usize>, SqlFacadeError> {
    opts.get(key)
        .map(|v| {
            v.parse::<usize>().map_err(|e| {
                SqlFacadeError::ConnectionStringParse(format!("invalid {key} '{v}': {e}"))
            })
        })
        .transpose()
}

fn decode_component(raw: &str, what: &str) -> Result<String, SqlFacadeError> {
    urlencoding::decode(raw)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| SqlFacadeError::ConnectionStringParse(format!("invalid {what}: {e}")))
}

#[cfg(feature = "postgres")]
fn is_postgres_url(lower: &str) -> bool {
    lower.starts_with("postgres://") || lower.starts_with("postgresql://")
}

#[cfg(feature = "postgres")]
fn parse_postgres_url(connection_string: &str) -> Result<DbConfig, SqlFacadeError> {
    const OPTION_KEYS: &[&str] = &["max_connections", "application_name", "connect_timeout"];

    let mut url = Url::parse(connection_string)
        .map_err(|e| SqlFacadeError::ConnectionStringParse(format!("invalid URL: {e}")))?;
    let opts = take_options(&mut url, OPTION_KEYS);

    let mut cfg = PgConfig::new();
    cfg.host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string());
    cfg.port = url.port();
    if !url.username().is_empty() {
        cfg.user = Some(decode_component(url.username(), "user")?);
    }
    if let Some(password) = url.password() {
        cfg.password = Some(decode_component(password, "password")?);
    }
    let dbname = url.path().trim_start_matches('/');
    if !dbname.is_empty() {
        cfg.dbname = Some(decode_component(dbname, "database name")?);
    }
    cfg.application_name = opts.get("application_name").cloned();
    if let Some(secs) = opts.get("connect_timeout") {
        let secs = secs.parse::<u64>().map_err(|e| {
            SqlFacadeError::ConnectionStringParse(format!("invalid connect_timeout '{secs}': {e}"))
        })?;
        cfg.connect_timeout = Some(Duration::from_secs(secs));
    }

    let mut options = PostgresOptions::new(cfg);
    if let Some(max) = parse_usize_option(&opts, "max_connections")? {
        options = options.with_max_connections(max);
    }
    Ok(DbConfig::Postgres(options))
}

#[cfg(feature = "sqlite")]
fn is_sqlite_url(lower: &str) -> bool {
    lower.starts_with("sqlite:")
}

#[cfg(feature = "sqlite")]
fn parse_sqlite_url(connection_string: &str) -> Result<DbConfig, SqlFacadeError> {
    let rest = &connection_string["sqlite:".len()..];
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

    let mut max_connections = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key.eq_ignore_ascii_case("max_connections") {
            let parsed = value.parse::<usize>().map_err(|e| {
                SqlFacadeError::ConnectionStringParse(format!(
                    "invalid max_connections '{value}': {e}"
                ))
            })?;
            max_connections = Some(parsed);
        }
    }

    let path = decode_component(path, "sqlite path")?;
    if path.is_empty() {
        return Err(SqlFacadeError::ConnectionStringParse(
            "sqlite connection string has no database path".to_string(),
        ));
    }

    let mut options = SqliteOptions::new(path);
    options.max_connections = max_connections;
    Ok(DbConfig::Sqlite(options))
}
