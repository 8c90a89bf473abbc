use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Symbolic error kinds rendered in the `error` field of an error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// An attempt to create an entity failed because one already exists
    AlreadyExists,

    /// Some invariant expected by the underlying system has been broken
    Internal,

    /// The client specified an invalid argument
    InvalidArgument,

    NotFound,

    NotAuthorized,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 5] = [
        Self::AlreadyExists,
        Self::Internal,
        Self::InvalidArgument,
        Self::NotFound,
        Self::NotAuthorized,
    ];

    /// Wire string for this error kind
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Internal => "INTERNAL",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::NotAuthorized => "NOT_AUTHORIZED",
        }
    }

    /// Raw numeric value of this error kind
    pub const fn raw(self) -> u32 {
        match self {
            Self::AlreadyExists => 1,
            Self::Internal => 2,
            Self::InvalidArgument => 3,
            Self::NotFound => 4,
            Self::NotAuthorized => 5,
        }
    }

    /// Look up an error kind by its raw numeric value
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::AlreadyExists),
            2 => Some(Self::Internal),
            3 => Some(Self::InvalidArgument),
            4 => Some(Self::NotFound),
            5 => Some(Self::NotAuthorized),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a raw numeric error kind into its wire string.
///
/// Values outside the known set translate to the empty string. Callers must
/// treat that as a programming error.
pub const fn resolve_raw(raw: u32) -> &'static str {
    match ErrorCode::from_raw(raw) {
        Some(code) => code.as_str(),
        None => "",
    }
}
