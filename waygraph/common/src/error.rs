use std::fmt;

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Where the missing capability of a [`NotImplemented`] error is tracked.
#[derive(Debug, Clone, Copy)]
pub struct TrackingIssue(Option<u32>);

impl fmt::Display for TrackingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issues = concat!(env!("CARGO_PKG_REPOSITORY"), "/issues");
        match self.0 {
            Some(issue) => write!(f, "tracked in {issues}/{issue}"),
            None => write!(f, "not tracked yet, issues can be opened at {issues}"),
        }
    }
}

/// An operation the edge interface declares but this implementation does not support.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{feature} is not supported yet")]
pub struct NotImplemented {
    feature: String,
    #[help]
    issue: TrackingIssue,
}

impl NotImplemented {
    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn issue(&self) -> Option<u32> {
        self.issue.0
    }
}

/// Fails with a [`NotImplemented`] error for `feature`, converted into the caller's error type.
pub fn not_implemented<T, E>(feature: impl Into<String>, issue: Option<u32>) -> Result<T, E>
where
    E: From<NotImplemented>,
{
    Err(E::from(NotImplemented {
        feature: feature.into(),
        issue: TrackingIssue(issue),
    }))
}

pub type EncodingResult<T> = Result<T, EncodingError>;

/// Errors raised while declaring encoded values or writing them into raw flags.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum EncodingError {
    #[error("encoded value {name} cannot use {bits} bits")]
    #[diagnostic(help("integer encoded values use between 1 and 31 bits"))]
    InvalidBits { name: SmolStr, bits: u32 },

    #[error("encoded value {name} has no enum variants")]
    EmptyEnum { name: SmolStr },

    #[error("encoded value {name} cannot store {value}, the range is 0..={max}")]
    ValueOutOfRange { name: SmolStr, value: f64, max: f64 },

    #[error("decimal encoded value {name} needs a positive factor, got {factor}")]
    InvalidFactor { name: SmolStr, factor: f64 },

    #[error("encoded value {name} has no ordinal for this variant")]
    #[diagnostic(help("only variants listed in VariantArray::VARIANTS can be stored"))]
    UnknownVariant { name: SmolStr },

    #[error("encoded value {name} needs {required} flag ints, the flags hold {len}")]
    #[diagnostic(help("size the edge flags with EncodedValueInitializer::required_ints"))]
    FlagsTooShort {
        name: SmolStr,
        required: usize,
        len: usize,
    },
}
