pub mod app;
pub mod config;
pub mod connection;
pub mod diagnostic;
mod error;
pub mod meta;
pub mod observability;
pub mod protocol;
pub mod query;
pub mod statement;

pub use app::{
    ApplicationDataBuffer, BoundBuffer, ColumnBindingMap, ConversionResult, ParameterSet,
};
pub use config::Configuration;
pub use connection::{connection_timeout, Connection, TcpConnection};
pub use diagnostic::{Diagnosable, DiagnosticRecord, DiagnosticRecordStorage, SqlResult, SqlState};
pub use error::{OdbcError, Result, TransportError};
pub use meta::{ColumnMeta, Nullability, SqlType};
pub use protocol::Value;
pub use query::{BatchQuery, Query, QueryType, TypeInfoQuery};
pub use statement::Statement;
