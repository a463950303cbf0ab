//! Database provisioning errors

use thiserror::Error;

/// Errors carry the driver-reported detail for diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    #[error("failed to connect to {host} as {user}: {detail}")]
    Connect {
        host: String,
        user: String,
        detail: String,
    },

    #[error("failed to create database `{database}`: {detail}")]
    Create { database: String, detail: String },

    #[error("failed to grant privileges on `{database}` to `{user}`@`localhost`: {detail}")]
    Grant {
        database: String,
        user: String,
        detail: String,
    },

    #[error("failed to drop database `{database}`: {detail}")]
    Drop { database: String, detail: String },
}
