//! Privileged database provisioning
//!
//! wp-cli writes the configuration but never creates the database or its
//! user; those side effects happen here over a privileged connection.

pub mod error;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod sql;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

pub use error::DatabaseError;
#[cfg(feature = "mysql")]
pub use mysql::MySqlConnector;

/// Operator-supplied credentials for the privileged connection
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"********")
            .finish()
    }
}

/// Opens database sessions
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    async fn connect(&self, credentials: &Credentials) -> Result<Box<dyn DatabaseSession>, DatabaseError>;
}

/// An open database connection
#[async_trait]
pub trait DatabaseSession: Send {
    /// Execute one statement; errors are the driver's message
    async fn execute(&mut self, sql: &str) -> Result<(), String>;

    /// Quote a string literal for this connection
    fn quote(&self, value: &str) -> String;
}

/// Creates the site database and grants the application user access
///
/// The connection is opened on first use and kept until [`close`](Self::close).
pub struct DatabaseProvisioner {
    connector: Arc<dyn DatabaseConnector>,
    credentials: Credentials,
    session: Option<Box<dyn DatabaseSession>>,
}

impl DatabaseProvisioner {
    pub fn new(connector: Arc<dyn DatabaseConnector>, credentials: Credentials) -> Self {
        Self {
            connector,
            credentials,
            session: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Open the connection if it is not open yet
    pub async fn connect(&mut self) -> Result<(), DatabaseError> {
        self.session().await.map(|_| ())
    }

    #[allow(clippy::borrowed_box)]
    async fn session(&mut self) -> Result<&mut Box<dyn DatabaseSession>, DatabaseError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                info!(
                    "Connecting to database server {} as {}",
                    self.credentials.host, self.credentials.user
                );
                self.connector.connect(&self.credentials).await?
            }
        };
        Ok(self.session.insert(session))
    }

    /// Create `name`; the collation clause is added only when non-empty
    pub async fn create_database(
        &mut self,
        name: &str,
        charset: &str,
        collation: &str,
    ) -> Result<(), DatabaseError> {
        let statement = sql::create_database_sql(name, charset, collation);
        debug!("{}", statement);
        self.session()
            .await?
            .execute(&statement)
            .await
            .map_err(|detail| DatabaseError::Create {
                database: name.to_string(),
                detail,
            })
    }

    /// Grant all privileges on `database` to `user`@`localhost`
    ///
    /// A non-empty password is set with the grant, quoted by the connection.
    pub async fn grant_user(
        &mut self,
        database: &str,
        user: &str,
        password: &str,
    ) -> Result<(), DatabaseError> {
        let session = self.session().await?;
        let quoted = (!password.is_empty()).then(|| session.quote(password));
        let statement = sql::grant_sql(database, user, quoted.as_deref());
        debug!("GRANT ALL PRIVILEGES ON {}.* TO {}@localhost", database, user);
        session
            .execute(&statement)
            .await
            .map_err(|detail| DatabaseError::Grant {
                database: database.to_string(),
                user: user.to_string(),
                detail,
            })
    }

    pub async fn drop_database(&mut self, name: &str) -> Result<(), DatabaseError> {
        let statement = sql::drop_database_sql(name);
        debug!("{}", statement);
        self.session()
            .await?
            .execute(&statement)
            .await
            .map_err(|detail| DatabaseError::Drop {
                database: name.to_string(),
                detail,
            })
    }

    /// Drop the connection
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            debug!("Closed database connection");
        }
    }
}
