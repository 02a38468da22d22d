// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;

use hyper::{Method, StatusCode};
use thiserror::Error;

/// Errors a handler may return.
///
/// Both capabilities are optional: `name` overrides the `error` field of the
/// uniform error document and `status` picks the response status.
pub trait HandlerError: std::error::Error + Send + 'static {
    fn name(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn status(&self) -> Option<StatusCode> {
        None
    }
}

impl HandlerError for Infallible {}

impl HandlerError for std::io::Error {}

/// An error that maps onto an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    status: StatusCode,
    name: Option<String>,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            name: None,
            message: message.into(),
        }
    }

    /// Sets the machine-readable category reported in error documents.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

impl HandlerError for HttpError {
    fn name(&self) -> Option<Cow<'_, str>> {
        self.name.as_deref().map(Cow::Borrowed)
    }

    fn status(&self) -> Option<StatusCode> {
        Some(self.status)
    }
}

/// Failures raised by the adapter itself while processing a request.
#[derive(Error, Debug)]
pub enum MarshalerError {
    #[error("an unconstrained request type is not suitable for {method} request bodies")]
    UnconstrainedBody { method: Method },

    #[error("Content-Type header is {content_type}, not application/xml")]
    UnsupportedContentType { content_type: String },

    #[error("could not read request body: {0}")]
    Body(String),

    #[error("{0}")]
    Decode(#[from] quick_xml::DeError),
}

impl HandlerError for MarshalerError {
    fn status(&self) -> Option<StatusCode> {
        Some(match self {
            MarshalerError::UnconstrainedBody { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            MarshalerError::UnsupportedContentType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            MarshalerError::Body(_) | MarshalerError::Decode(_) => StatusCode::BAD_REQUEST,
        })
    }
}

/// Configuration problems that prevent an adapter from being built.
#[derive(Error, Debug)]
pub enum ConstructionError {
    #[error("body method {method:?} is not a valid HTTP method token")]
    InvalidBodyMethod { method: String },

    #[error("default header name {name:?} is not a valid header name")]
    InvalidHeaderName { name: String },

    #[error("default header {name:?} has an invalid value")]
    InvalidHeaderValue { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_capabilities() {
        let err = HttpError::not_found("no widget 42");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.name(), None);
        assert_eq!(err.to_string(), "no widget 42");

        let named = err.named("widget_not_found");
        assert_eq!(named.name().as_deref(), Some("widget_not_found"));
    }

    #[test]
    fn test_marshaler_error_statuses() {
        let unconstrained = MarshalerError::UnconstrainedBody {
            method: Method::POST,
        };
        assert_eq!(
            unconstrained.status(),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert_eq!(
            unconstrained.to_string(),
            "an unconstrained request type is not suitable for POST request bodies"
        );

        let unsupported = MarshalerError::UnsupportedContentType {
            content_type: "text/plain".to_string(),
        };
        assert_eq!(
            unsupported.status(),
            Some(StatusCode::UNSUPPORTED_MEDIA_TYPE)
        );
        assert_eq!(
            unsupported.to_string(),
            "Content-Type header is text/plain, not application/xml"
        );

        let body = MarshalerError::Body("connection reset".to_string());
        assert_eq!(body.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_plain_errors_have_no_capabilities() {
        let err = std::io::Error::other("disk on fire");
        assert_eq!(err.status(), None);
        assert_eq!(err.name(), None);
    }
}
