use std::{num::ParseIntError, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invalid type: {0}")]
    InvalidType(String),
    #[error("Parse error at {line}:{column}: {msg}")]
    Parse {
        line: usize,
        column: usize,
        msg: String,
    },
    #[error("Decode error at `{path}`: {msg}")]
    Decode { path: String, msg: String },
    #[error("Unification error: {0}")]
    Unification(String),
    #[error("Limit error: {0}")]
    Limit(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Error in file {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Prefixes the path of a `Decode` error with the field it was found under.
    /// Other variants are turned into a `Decode` error rooted at `segment`.
    pub fn under(self, segment: &str) -> Self {
        match self {
            Error::Decode { path, msg } => {
                let path = if path.is_empty() {
                    segment.to_string()
                } else if path.starts_with('[') {
                    format!("{segment}{path}")
                } else {
                    format!("{segment}.{path}")
                };
                Error::Decode { path, msg }
            }
            other => Error::Decode {
                path: segment.to_string(),
                msg: other.to_string(),
            },
        }
    }

    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// This macro can only be used for `Error` variants that have a `String` field.
/// Those are: `InvalidData`, `InvalidType`, `Unification`, `Limit`,
/// `Validation`, `Catalog`
#[macro_export]
macro_rules! error {
   ($err_variant:ident, $fmt_str: literal $(,$arg: expr)*) => {
       $crate::types::errors::Error::$err_variant(format!($fmt_str,$($arg),*))
   }
}
pub use error;

macro_rules! impl_error_from {
    ($err_variant:ident, $err_type:ty ) => {
        impl From<$err_type> for Error {
            fn from(err: $err_type) -> Error {
                Error::$err_variant(err.to_string())
            }
        }
    };
}

impl_error_from!(InvalidData, semver::Error);
impl_error_from!(InvalidData, chrono::ParseError);
impl_error_from!(InvalidData, hex::FromHexError);
impl_error_from!(InvalidData, ParseIntError);
