use miette::Diagnostic;
use reqwest::StatusCode;
use thiserror::Error;

/// Records all errors reported by this library.
///
/// A lookup that finds nothing is not an error:
/// single-entity operations report that case as `Ok(None)`.
#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The client could not be constructed from the provided configuration.
    #[error("invalid client configuration: {0}")]
    #[diagnostic(help("a non-empty user agent identifying your application is required"))]
    Configuration(String),

    /// The input was rejected by the Package URL parser.
    #[error("malformed purl '{input}'")]
    MalformedPurl {
        /// The input originally provided.
        input: String,

        /// The error returned by the parser.
        #[source]
        error: purl::ParseError,
    },

    /// The PURL type has no known registry.
    #[error("unsupported purl type: {0}")]
    UnsupportedEcosystem(String),

    /// A version-scoped operation was given a PURL without a version.
    #[error("purl has no version: {0}")]
    MissingVersion(String),

    /// The request could not be completed.
    #[error("{operation}: request failed")]
    Transport {
        /// The operation being performed.
        operation: &'static str,

        /// The error reported by the transport.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a status other than success or not-found.
    #[error("{}", fmt_backend(.operation, .status, .message.as_deref()))]
    Backend {
        /// The operation being performed.
        operation: &'static str,

        /// The status code returned by the backend.
        status: StatusCode,

        /// The error message reported by the backend, if it sent one.
        message: Option<String>,
    },

    /// The backend answered successfully, but the body could not be decoded.
    #[error("{operation}: invalid response body")]
    InvalidResponse {
        /// The operation being performed.
        operation: &'static str,

        /// The error returned while decoding the body.
        #[source]
        source: reqwest::Error,
    },
}

impl Error {
    /// The HTTP status reported by the backend, if this error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Backend { status, .. } => Some(*status),
            Error::Transport { source, .. } | Error::InvalidResponse { source, .. } => {
                source.status()
            }
            _ => None,
        }
    }
}

fn fmt_backend(operation: &str, status: &StatusCode, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("{operation} failed: {message}"),
        None => format!("{operation} failed with status {}", status.as_u16()),
    }
}
