pub mod record;
pub mod result;
pub mod sql_state;

pub use record::{Diagnosable, DiagnosticRecord, DiagnosticRecordStorage, UNKNOWN_POSITION};
pub use result::SqlResult;
pub use sql_state::SqlState;
