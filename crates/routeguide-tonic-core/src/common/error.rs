//! Error types for the RouteGuide service.
//!
//! This module defines the central `Error` enum, which captures every
//! reportable failure of a RouteGuide call. It implements `From<Error>` for
//! `tonic::Status` so handlers can propagate errors with `?` and clients
//! receive an appropriate status code.
//!
//! ## Error Cases
//! - `FeatureNotFound`: No stored feature sits at the requested point.
//! - `EmptyFeatureSet`: A recommendation was requested from an empty store.
//! - `InvalidRequest`: The client request was missing a required field.
//! - `InvalidFeature`: A feature could not be loaded into the store.
//! - `RequestCancelled`: The client went away mid-call.
//! - `Transport`: The inbound stream failed with a transport status.
//! - `ChannelError`: An internal communication failure between tasks.
//! - `ServiceShutdown`: A call arrived or was running while the service was
//!   shutting down.

use tonic::{Code, Status};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the RouteGuide service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// No feature is stored at exactly this location.
    #[error("No feature at ({latitude}, {longitude})")]
    FeatureNotFound { latitude: i32, longitude: i32 },

    /// The store holds no features to recommend from.
    #[error("Feature set is empty")]
    EmptyFeatureSet,

    /// The client request was malformed.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// A feature handed to the store was unusable.
    #[error("Invalid feature #{index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    /// The client aborted the request.
    #[error("Request cancelled by client")]
    RequestCancelled,

    /// Receiving from the client failed.
    #[error("Transport error ({code:?}): {message}")]
    Transport { code: Code, message: String },

    /// Internal channel send/receive failure.
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The service is in the process of shutting down.
    #[error("Service is shutting down")]
    ServiceShutdown,
}

impl From<Status> for Error {
    /// Classifies a status observed on an inbound stream. A cancelled stream
    /// is a client cancellation, anything else is a transport failure.
    fn from(status: Status) -> Self {
        match status.code() {
            Code::Cancelled => Error::RequestCancelled,
            code => Error::Transport {
                code,
                message: status.message().to_string(),
            },
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            e @ Error::FeatureNotFound { .. } => Status::not_found(e.to_string()),
            e @ Error::EmptyFeatureSet => Status::not_found(e.to_string()),
            Error::InvalidRequest { reason } => Status::invalid_argument(reason),
            e @ Error::InvalidFeature { .. } => Status::invalid_argument(e.to_string()),
            Error::RequestCancelled => Status::cancelled("Request was cancelled"),
            Error::Transport { code, message } => Status::new(code, message),
            Error::ChannelError { context } => {
                Status::internal(format!("Channel error: {}", context))
            }
            Error::ServiceShutdown => Status::unavailable("Service is shutting down"),
        }
    }
}

impl Error {
    pub(crate) fn missing(field: &str) -> Self {
        Error::InvalidRequest {
            reason: format!("missing `{field}`"),
        }
    }

    /// Returns `true` if this error means the caller is gone rather than that
    /// something failed on our side.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::RequestCancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (
                Error::FeatureNotFound {
                    latitude: 1,
                    longitude: 2,
                },
                Code::NotFound,
            ),
            (Error::EmptyFeatureSet, Code::NotFound),
            (Error::missing("lo"), Code::InvalidArgument),
            (Error::RequestCancelled, Code::Cancelled),
            (
                Error::ChannelError {
                    context: "closed".into(),
                },
                Code::Internal,
            ),
            (Error::ServiceShutdown, Code::Unavailable),
        ];

        for (err, code) in cases {
            assert_eq!(Status::from(err.clone()).code(), code, "{err}");
        }
    }

    #[test]
    fn inbound_status_is_classified() {
        assert_eq!(
            Error::from(Status::cancelled("gone")),
            Error::RequestCancelled
        );

        let err = Error::from(Status::unavailable("reset"));
        assert_eq!(
            err,
            Error::Transport {
                code: Code::Unavailable,
                message: "reset".into()
            }
        );
        // The original code survives the round trip back to the caller.
        assert_eq!(Status::from(err).code(), Code::Unavailable);
    }

    #[test]
    fn missing_field_reason() {
        let status = Status::from(Error::missing("point"));
        assert_eq!(status.message(), "missing `point`");
    }
}
