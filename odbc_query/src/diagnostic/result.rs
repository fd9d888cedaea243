/// Outcome of a driver operation as seen by the ODBC call layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlResult {
    Success,
    SuccessWithInfo,
    NoData,
    Error,
}

impl SqlResult {
    /// `SQLRETURN` value for this outcome.
    pub fn sql_return(self) -> i16 {
        match self {
            Self::Success => 0,
            Self::SuccessWithInfo => 1,
            Self::NoData => 100,
            Self::Error => -1,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::SuccessWithInfo)
    }

    /// Keeps the more severe of two outcomes: `Error` over `SuccessWithInfo`
    /// over `Success`. `NoData` only wins over `Success`.
    pub fn combine(self, other: SqlResult) -> SqlResult {
        fn rank(r: SqlResult) -> u8 {
            match r {
                SqlResult::Success => 0,
                SqlResult::NoData => 1,
                SqlResult::SuccessWithInfo => 2,
                SqlResult::Error => 3,
            }
        }

        if rank(other) > rank(self) {
            other
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_return_values() {
        assert_eq!(SqlResult::Success.sql_return(), 0);
        assert_eq!(SqlResult::SuccessWithInfo.sql_return(), 1);
        assert_eq!(SqlResult::NoData.sql_return(), 100);
        assert_eq!(SqlResult::Error.sql_return(), -1);
    }

    #[test]
    fn test_is_success() {
        assert!(SqlResult::Success.is_success());
        assert!(SqlResult::SuccessWithInfo.is_success());
        assert!(!SqlResult::NoData.is_success());
        assert!(!SqlResult::Error.is_success());
    }

    #[test]
    fn test_combine_keeps_most_severe() {
        assert_eq!(
            SqlResult::Success.combine(SqlResult::SuccessWithInfo),
            SqlResult::SuccessWithInfo
        );
        assert_eq!(
            SqlResult::SuccessWithInfo.combine(SqlResult::Success),
            SqlResult::SuccessWithInfo
        );
        assert_eq!(
            SqlResult::SuccessWithInfo.combine(SqlResult::Error),
            SqlResult::Error
        );
        assert_eq!(SqlResult::Error.combine(SqlResult::Success), SqlResult::Error);
        assert_eq!(SqlResult::Success.combine(SqlResult::Success), SqlResult::Success);
    }
}
