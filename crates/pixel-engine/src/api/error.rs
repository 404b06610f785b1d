use thiserror::Error;

/// Failure decoding one animation string. The offending string is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid integer {value:?} in {field}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("invalid frame duration {0:?}")]
    InvalidDuration(String),
    #[error("invalid color component {0:?}")]
    InvalidColorComponent(String),
    #[error("{tag} expects {expected} values, found {found} in {value:?}")]
    BadArity {
        tag: &'static str,
        expected: &'static str,
        found: usize,
        value: String,
    },
    #[error("loop mode {0} is out of range")]
    InvalidLoopMode(i64),
}

/// Failure resolving a sheet or animation name against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no sprite sheet called <{0}>")]
    UnknownSheet(String),
    #[error("no animation called <{animation}> for <{sheet}>")]
    UnknownAnimation { sheet: String, animation: String },
    #[error("animation <{animation}> for <{sheet}> has no frames")]
    NoFrames { sheet: String, animation: String },
}
