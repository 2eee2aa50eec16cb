//! The error contract shared by every query, regardless of platform.

use std::{fmt, io};

use thiserror::Error;

use crate::platform::{CacheLevel, Metric};

/// A [`Result`] with the error type being a [`MemInfoError`].
pub type MemInfoResult<T> = Result<T, MemInfoError>;

/// The flat classification of a [`MemInfoError`].
///
/// This is what callers should branch on; the error itself may carry extra
/// diagnostic detail that differs between platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The native call itself failed. May succeed if retried.
    PlatformError,

    /// The query has no native source on this platform. Never succeeds.
    Unsupported,

    /// A native search finished without finding the requested fact.
    NotFound,

    /// The caller passed an out-of-range argument.
    InvalidArgument,
}

/// What a query was asking for. Used to describe [`MemInfoError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Metric(Metric),
    Cache(CacheLevel),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Metric(metric) => metric.fmt(f),
            Query::Cache(level) => write!(f, "{level} cache size"),
        }
    }
}

impl From<Metric> for Query {
    fn from(metric: Metric) -> Self {
        Query::Metric(metric)
    }
}

impl From<CacheLevel> for Query {
    fn from(level: CacheLevel) -> Self {
        Query::Cache(level)
    }
}

/// An error to do with a memory query.
#[derive(Debug, Error)]
pub enum MemInfoError {
    /// The native call failed. A wrapper around [`anyhow::Error`] so the
    /// underlying OS error is kept around for diagnostics.
    #[error("platform call failed: {0:#}")]
    Platform(anyhow::Error),

    /// The query is unsupported on this platform.
    #[error("{0} is not supported on this platform")]
    Unsupported(Query),

    /// A search of a native data source came up empty.
    #[error("{0} was not found")]
    NotFound(String),

    /// An argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl MemInfoError {
    pub(crate) fn platform(msg: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Platform(anyhow::Error::msg(msg))
    }

    pub(crate) fn unsupported(query: impl Into<Query>) -> Self {
        Self::Unsupported(query.into())
    }

    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MemInfoError::Platform(_) => ErrorKind::PlatformError,
            MemInfoError::Unsupported(_) => ErrorKind::Unsupported,
            MemInfoError::NotFound(_) => ErrorKind::NotFound,
            MemInfoError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Returns the native OS error code behind a [`MemInfoError::Platform`]
    /// error, if one was recorded.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            MemInfoError::Platform(err) => err
                .chain()
                .find_map(|cause| cause.downcast_ref::<io::Error>())
                .and_then(io::Error::raw_os_error),
            _ => None,
        }
    }
}

impl From<io::Error> for MemInfoError {
    fn from(err: io::Error) -> Self {
        Self::Platform(err.into())
    }
}

impl From<anyhow::Error> for MemInfoError {
    fn from(err: anyhow::Error) -> Self {
        Self::Platform(err)
    }
}
