//! MySQL connector using sqlx

use crate::database::{sql, Credentials, DatabaseConnector, DatabaseError, DatabaseSession};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::ConnectOptions;
use std::path::{Path, PathBuf};

/// Where to reach the server, parsed from a wp-config style host
///
/// Accepts `host`, `host:port` and `host:/path/to/socket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub host: String,
    pub port: Option<u16>,
    pub socket: Option<PathBuf>,
}

impl HostSpec {
    pub fn parse(raw: &str) -> Self {
        let plain = || HostSpec {
            host: raw.to_string(),
            port: None,
            socket: None,
        };

        let Some((host, rest)) = raw.rsplit_once(':') else {
            return plain();
        };

        if rest.starts_with('/') {
            return HostSpec {
                host: host.to_string(),
                port: None,
                socket: Some(PathBuf::from(rest)),
            };
        }

        match rest.parse::<u16>() {
            Ok(port) => HostSpec {
                host: host.to_string(),
                port: Some(port),
                socket: None,
            },
            Err(_) => plain(),
        }
    }
}

/// Opens privileged MySQL connections
#[derive(Debug, Clone, Default)]
pub struct MySqlConnector {
    /// Socket used when the host does not name one
    socket: Option<PathBuf>,
}

impl MySqlConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_socket(mut self, socket: impl AsRef<Path>) -> Self {
        self.socket = Some(socket.as_ref().to_path_buf());
        self
    }

    fn options(&self, credentials: &Credentials) -> MySqlConnectOptions {
        let spec = HostSpec::parse(&credentials.host);
        let mut options = MySqlConnectOptions::new()
            .host(&spec.host)
            .username(&credentials.user)
            .password(&credentials.password)
            // Statements carry passwords
            .disable_statement_logging();

        if let Some(port) = spec.port {
            options = options.port(port);
        }
        if let Some(socket) = spec.socket.as_ref().or(self.socket.as_ref()) {
            options = options.socket(socket);
        }
        options
    }
}

#[async_trait]
impl DatabaseConnector for MySqlConnector {
    async fn connect(&self, credentials: &Credentials) -> Result<Box<dyn DatabaseSession>, DatabaseError> {
        let conn = self
            .options(credentials)
            .connect()
            .await
            .map_err(|e| DatabaseError::Connect {
                host: credentials.host.clone(),
                user: credentials.user.clone(),
                detail: e.to_string(),
            })?;

        Ok(Box::new(MySqlSession { conn }))
    }
}

struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl DatabaseSession for MySqlSession {
    async fn execute(&mut self, statement: &str) -> Result<(), String> {
        // Text protocol: GRANT and CREATE DATABASE are not all preparable
        sqlx::Executor::execute(&mut self.conn, sqlx::raw_sql(statement))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn quote(&self, value: &str) -> String {
        sql::quote_literal(value)
    }
}
