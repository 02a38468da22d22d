// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::HandlerError;

/// Request type for handlers that never receive a body.
///
/// A handler declaring it is answered with 500 on body-bearing methods.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Unconstrained;

/// What a handler hands back: status, headers to merge, an optional response
/// value and an optional error. When `error` is set everything else except
/// `status` is ignored.
#[derive(Debug)]
pub struct HandlerResult<Rs, E> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Rs>,
    pub error: Option<E>,
}

impl<Rs, E> HandlerResult<Rs, E> {
    pub fn with_status(status: StatusCode, body: Option<Rs>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
            error: None,
        }
    }

    pub fn ok(body: Rs) -> Self {
        Self::with_status(StatusCode::OK, Some(body))
    }

    pub fn created(body: Rs) -> Self {
        Self::with_status(StatusCode::CREATED, Some(body))
    }

    pub fn no_content() -> Self {
        Self::with_status(StatusCode::NO_CONTENT, None)
    }

    /// A failed result. The response status comes from the error when it has
    /// one, 500 otherwise.
    pub fn error(error: E) -> Self {
        Self::failed(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    /// A failed result with a fallback status, used only when the error does
    /// not carry a status of its own and `status` is a 4xx or 5xx.
    pub fn failed(status: StatusCode, error: E) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
            error: Some(error),
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// A function the adapter can call.
///
/// Implemented for functions and closures of exactly two shapes:
///
/// * `Fn(&Uri, &HeaderMap, Rq) -> HandlerResult<Rs, E>`
/// * `Fn(&Uri, &HeaderMap, Rq, &C) -> HandlerResult<Rs, E>`
///
/// where `Rq` is deserializable and has a default value, `Rs` is serializable,
/// `E` is a [`HandlerError`] and `C` is a request-scoped context found in the
/// request extensions. Anything else is rejected when the adapter is built:
///
/// ```compile_fail
/// use xml_marshaler::XmlMarshaler;
///
/// let _ = XmlMarshaler::new(42u8);
/// ```
///
/// ```compile_fail
/// use xml_marshaler::{HandlerResult, Unconstrained, Uri, XmlMarshaler};
///
/// fn header_pairs(
///     _url: &Uri,
///     _headers: &Vec<(String, String)>,
///     _rq: Unconstrained,
/// ) -> HandlerResult<(), std::io::Error> {
///     HandlerResult::no_content()
/// }
///
/// let _ = XmlMarshaler::new(header_pairs);
/// ```
///
/// ```compile_fail
/// use xml_marshaler::{HandlerResult, HeaderMap, Uri, XmlMarshaler};
///
/// fn two_args(_url: &Uri, _headers: &HeaderMap) -> HandlerResult<(), std::io::Error> {
///     HandlerResult::no_content()
/// }
///
/// let _ = XmlMarshaler::new(two_args);
/// ```
///
/// ```compile_fail
/// use xml_marshaler::{HandlerResult, HeaderMap, Unconstrained, XmlMarshaler};
///
/// fn url_as_string(
///     _url: String,
///     _headers: &HeaderMap,
///     _rq: Unconstrained,
/// ) -> HandlerResult<(), std::io::Error> {
///     HandlerResult::no_content()
/// }
///
/// let _ = XmlMarshaler::new(url_as_string);
/// ```
///
/// ```compile_fail
/// use xml_marshaler::{HeaderMap, Unconstrained, Uri, XmlMarshaler};
///
/// fn bare_status(_url: &Uri, _headers: &HeaderMap, _rq: Unconstrained) -> u16 {
///     204
/// }
///
/// let _ = XmlMarshaler::new(bare_status);
/// ```
///
/// ```compile_fail
/// use xml_marshaler::{HandlerResult, HeaderMap, Uri, XmlMarshaler};
///
/// struct Opaque;
///
/// fn opaque_request(
///     _url: &Uri,
///     _headers: &HeaderMap,
///     _rq: Opaque,
/// ) -> HandlerResult<(), std::io::Error> {
///     HandlerResult::no_content()
/// }
///
/// let _ = XmlMarshaler::new(opaque_request);
/// ```
pub trait Handler<M>: Send + Sync + 'static {
    type Request: DeserializeOwned + Default + Send + 'static;
    type Response: Serialize + 'static;
    type Error: HandlerError;
    type Context: Clone + Default + Send + Sync + 'static;

    const ACCEPTS_CONTEXT: bool;

    fn call(
        &self,
        url: &Uri,
        headers: &HeaderMap,
        request: Self::Request,
        context: Self::Context,
    ) -> HandlerResult<Self::Response, Self::Error>;
}

impl<F, Rq, Rs, E> Handler<(Rq, Rs, E)> for F
where
    F: Fn(&Uri, &HeaderMap, Rq) -> HandlerResult<Rs, E> + Send + Sync + 'static,
    Rq: DeserializeOwned + Default + Send + 'static,
    Rs: Serialize + 'static,
    E: HandlerError,
{
    type Request = Rq;
    type Response = Rs;
    type Error = E;
    type Context = ();

    const ACCEPTS_CONTEXT: bool = false;

    fn call(
        &self,
        url: &Uri,
        headers: &HeaderMap,
        request: Rq,
        _context: (),
    ) -> HandlerResult<Rs, E> {
        self(url, headers, request)
    }
}

impl<F, Rq, Rs, E, C> Handler<(Rq, Rs, E, C)> for F
where
    F: Fn(&Uri, &HeaderMap, Rq, &C) -> HandlerResult<Rs, E> + Send + Sync + 'static,
    Rq: DeserializeOwned + Default + Send + 'static,
    Rs: Serialize + 'static,
    E: HandlerError,
    C: Clone + Default + Send + Sync + 'static,
{
    type Request = Rq;
    type Response = Rs;
    type Error = E;
    type Context = C;

    const ACCEPTS_CONTEXT: bool = true;

    fn call(
        &self,
        url: &Uri,
        headers: &HeaderMap,
        request: Rq,
        context: C,
    ) -> HandlerResult<Rs, E> {
        self(url, headers, request, &context)
    }
}
