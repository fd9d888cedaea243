use crate::diagnostic::SqlState;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OdbcError {
    #[error("Malformed message: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Invalid value for attribute '{key}': {value}")]
    InvalidAttribute { key: String, value: String },

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
}

impl OdbcError {
    pub fn sql_state(&self) -> SqlState {
        match self {
            OdbcError::Decode(_) => SqlState::CommunicationLinkFailure,
            OdbcError::InvalidConnectionString(_) | OdbcError::InvalidAttribute { .. } => {
                SqlState::InvalidConnectionStringAttribute
            }
            OdbcError::UnsupportedFeature(_) => SqlState::OptionalFeatureNotImplemented,
            OdbcError::ValidationError(_) | OdbcError::InternalError(_) => {
                SqlState::GeneralError
            }
        }
    }
}

/// Failure reported by a [`Connection`](crate::connection::Connection) while
/// a request is in flight.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Operation timed out")]
    Timeout,

    #[error("Connection lost: {0}")]
    Disconnected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure that already knows its SQLSTATE.
    #[error("{message}")]
    Odbc { state: SqlState, message: String },

    #[error("{0}")]
    General(String),
}

impl TransportError {
    pub fn sql_state(&self) -> SqlState {
        match self {
            TransportError::Timeout => SqlState::TimeoutExpired,
            TransportError::Disconnected(_) | TransportError::Io(_) => {
                SqlState::CommunicationLinkFailure
            }
            TransportError::Odbc { state, .. } => *state,
            TransportError::General(_) => SqlState::GeneralError,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

impl From<OdbcError> for TransportError {
    fn from(err: OdbcError) -> Self {
        TransportError::Odbc {
            state: err.sql_state(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OdbcError>;
