/// `SQL_ALL_TYPES`: `SQLGetTypeInfo` filter selecting every type.
pub const SQL_ALL_TYPES: i16 = 0;

pub const SQL_NULLABLE: i16 = 1;
pub const SQL_PRED_BASIC: i16 = 2;
pub const SQL_SEARCHABLE: i16 = 3;

/// SQL data types the server understands, in `SQLGetTypeInfo` order
/// (ascending ODBC type code).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SqlType {
    Guid,
    Bit,
    TinyInt,
    BigInt,
    Binary,
    Decimal,
    Integer,
    SmallInt,
    Real,
    Double,
    Varchar,
    Date,
    Time,
    Timestamp,
}

impl SqlType {
    pub const ALL: [SqlType; 14] = [
        SqlType::Guid,
        SqlType::Bit,
        SqlType::TinyInt,
        SqlType::BigInt,
        SqlType::Binary,
        SqlType::Decimal,
        SqlType::Integer,
        SqlType::SmallInt,
        SqlType::Real,
        SqlType::Double,
        SqlType::Varchar,
        SqlType::Date,
        SqlType::Time,
        SqlType::Timestamp,
    ];

    /// ODBC `SQL_*` type code.
    pub fn code(self) -> i16 {
        match self {
            Self::Guid => -11,
            Self::Bit => -7,
            Self::TinyInt => -6,
            Self::BigInt => -5,
            Self::Binary => -2,
            Self::Decimal => 3,
            Self::Integer => 4,
            Self::SmallInt => 5,
            Self::Real => 7,
            Self::Double => 8,
            Self::Varchar => 12,
            Self::Date => 91,
            Self::Time => 92,
            Self::Timestamp => 93,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Guid => "UUID",
            Self::Bit => "BOOLEAN",
            Self::TinyInt => "TINYINT",
            Self::BigInt => "BIGINT",
            Self::Binary => "VARBINARY",
            Self::Decimal => "DECIMAL",
            Self::Integer => "INTEGER",
            Self::SmallInt => "SMALLINT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Varchar => "VARCHAR",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
        }
    }

    /// Maximum column size (digits for numerics, characters otherwise).
    pub fn column_size(self) -> i32 {
        match self {
            Self::Guid => 36,
            Self::Bit => 1,
            Self::TinyInt => 3,
            Self::SmallInt => 5,
            Self::Integer => 10,
            Self::BigInt => 19,
            Self::Real => 7,
            Self::Double => 15,
            Self::Decimal => 38,
            Self::Date => 10,
            Self::Time => 8,
            Self::Timestamp => 19,
            Self::Varchar | Self::Binary => i32::MAX,
        }
    }

    pub fn literal_prefix(self) -> Option<&'static str> {
        match self {
            Self::Varchar | Self::Guid => Some("'"),
            Self::Binary => Some("0x"),
            Self::Date => Some("DATE '"),
            Self::Time => Some("TIME '"),
            Self::Timestamp => Some("TIMESTAMP '"),
            _ => None,
        }
    }

    pub fn literal_suffix(self) -> Option<&'static str> {
        match self {
            Self::Varchar | Self::Guid | Self::Date | Self::Time | Self::Timestamp => Some("'"),
            _ => None,
        }
    }

    pub fn is_case_sensitive(self) -> bool {
        matches!(self, Self::Varchar)
    }

    pub fn searchable(self) -> i16 {
        match self {
            Self::Binary => SQL_PRED_BASIC,
            _ => SQL_SEARCHABLE,
        }
    }
}
