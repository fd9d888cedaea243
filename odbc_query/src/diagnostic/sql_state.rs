use std::fmt;

/// SQLSTATE codes the driver reports through its diagnostic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlState {
    GeneralWarning,
    StringDataRightTruncated,
    InvalidConnectionStringAttribute,
    ErrorInRow,
    InvalidDescriptorIndex,
    UnableToEstablishConnection,
    CommunicationLinkFailure,
    IntegrityConstraintViolation,
    InvalidCursorState,
    InvalidTransactionState,
    SyntaxErrorOrAccessViolation,
    TableOrViewAlreadyExists,
    TableOrViewNotFound,
    IndexAlreadyExists,
    IndexNotFound,
    ColumnAlreadyExists,
    ColumnNotFound,
    GeneralError,
    MemoryAllocationError,
    InvalidSqlDataType,
    OperationCanceled,
    SequenceError,
    InvalidStringOrBufferLength,
    OptionalFeatureNotImplemented,
    TimeoutExpired,
    ConnectionTimeoutExpired,
    DriverDoesNotSupportFunction,
}

impl SqlState {
    pub fn code(self) -> &'static str {
        match self {
            Self::GeneralWarning => "01000",
            Self::StringDataRightTruncated => "01004",
            Self::InvalidConnectionStringAttribute => "01S00",
            Self::ErrorInRow => "01S01",
            Self::InvalidDescriptorIndex => "07009",
            Self::UnableToEstablishConnection => "08001",
            Self::CommunicationLinkFailure => "08S01",
            Self::IntegrityConstraintViolation => "23000",
            Self::InvalidCursorState => "24000",
            Self::InvalidTransactionState => "25000",
            Self::SyntaxErrorOrAccessViolation => "42000",
            Self::TableOrViewAlreadyExists => "42S01",
            Self::TableOrViewNotFound => "42S02",
            Self::IndexAlreadyExists => "42S11",
            Self::IndexNotFound => "42S12",
            Self::ColumnAlreadyExists => "42S21",
            Self::ColumnNotFound => "42S22",
            Self::GeneralError => "HY000",
            Self::MemoryAllocationError => "HY001",
            Self::InvalidSqlDataType => "HY004",
            Self::OperationCanceled => "HY008",
            Self::SequenceError => "HY010",
            Self::InvalidStringOrBufferLength => "HY090",
            Self::OptionalFeatureNotImplemented => "HYC00",
            Self::TimeoutExpired => "HYT00",
            Self::ConnectionTimeoutExpired => "HYT01",
            Self::DriverDoesNotSupportFunction => "IM001",
        }
    }

    /// Five ASCII bytes as written into `SQLGetDiagRec` output buffers.
    pub fn as_bytes(self) -> [u8; 5] {
        let mut out = [0u8; 5];
        out.copy_from_slice(self.code().as_bytes());
        out
    }

    /// Class "01" states are warnings.
    pub fn is_warning(self) -> bool {
        self.code().starts_with("01")
    }
}

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_state_codes() {
        assert_eq!(SqlState::SequenceError.code(), "HY010");
        assert_eq!(SqlState::InvalidCursorState.code(), "24000");
        assert_eq!(SqlState::TimeoutExpired.code(), "HYT00");
        assert_eq!(SqlState::CommunicationLinkFailure.code(), "08S01");
        assert_eq!(SqlState::IntegrityConstraintViolation.code(), "23000");
    }

    #[test]
    fn test_sql_state_as_bytes() {
        assert_eq!(&SqlState::TableOrViewNotFound.as_bytes(), b"42S02");
        assert_eq!(&SqlState::GeneralError.as_bytes(), b"HY000");
    }

    #[test]
    fn test_sql_state_is_warning() {
        assert!(SqlState::GeneralWarning.is_warning());
        assert!(SqlState::StringDataRightTruncated.is_warning());
        assert!(!SqlState::GeneralError.is_warning());
        assert!(!SqlState::InvalidCursorState.is_warning());
    }

    #[test]
    fn test_sql_state_display() {
        assert_eq!(SqlState::OptionalFeatureNotImplemented.to_string(), "HYC00");
    }
}
