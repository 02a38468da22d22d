// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Turns a strongly-typed handler function into a uniform HTTP handler that
//! speaks `application/xml`.
//!
//! The adapter negotiates the response format from `Accept`, decodes the
//! request body into the handler's declared request type, calls the handler,
//! merges the headers it returns and encodes its response (or a uniform
//! `<error>` document) as XML.
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use xml_marshaler::{HandlerResult, HeaderMap, HttpError, Uri, XmlMarshaler};
//!
//! #[derive(Debug, Default, Deserialize, Serialize)]
//! struct Widget {
//!     name: String,
//! }
//!
//! fn create(
//!     _url: &Uri,
//!     _headers: &HeaderMap,
//!     widget: Widget,
//! ) -> HandlerResult<Widget, HttpError> {
//!     if widget.name.is_empty() {
//!         return HandlerResult::error(HttpError::unprocessable_entity("name is required"));
//!     }
//!     HandlerResult::created(widget)
//! }
//!
//! let marshaler = XmlMarshaler::new(create);
//! assert!(!marshaler.descriptor().is_unconstrained());
//! ```

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod config;
mod descriptor;
mod document;
mod errors;
mod handler;
mod marshaler;
pub mod negotiate;

pub use config::MarshalerConfig;
pub use descriptor::{HandlerDescriptor, RequestShape};
pub use document::{ErrorDocument, error_category};
pub use errors::{ConstructionError, HandlerError, HttpError, MarshalerError};
pub use handler::{Handler, HandlerResult, Unconstrained};
pub use marshaler::XmlMarshaler;

// Handler signatures are written against these types.
pub use hyper::{HeaderMap, Method, StatusCode, Uri};
