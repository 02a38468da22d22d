// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::service::Service;
use hyper::{HeaderMap, Method, Request, Response, StatusCode};
use log::{debug, error, warn};

use crate::config::{MarshalerConfig, Settings};
use crate::descriptor::HandlerDescriptor;
use crate::document::{self, ErrorDocument};
use crate::errors::{ConstructionError, HandlerError, MarshalerError};
use crate::handler::Handler;
use crate::negotiate::{self, PLAIN_TEXT_CONTENT_TYPE, XML_CONTENT_TYPE};

/// HTTP handler wrapping a typed [`Handler`] function.
///
/// Cloning is cheap: the handler, its descriptor and the settings are shared
/// and never mutated after construction.
pub struct XmlMarshaler<H, M> {
    handler: Arc<H>,
    descriptor: Arc<HandlerDescriptor>,
    settings: Arc<Settings>,
    _marker: PhantomData<fn() -> M>,
}

impl<H, M> Clone for XmlMarshaler<H, M> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            descriptor: Arc::clone(&self.descriptor),
            settings: Arc::clone(&self.settings),
            _marker: PhantomData,
        }
    }
}

impl<H, M> XmlMarshaler<H, M>
where
    H: Handler<M>,
{
    /// Wraps `handler` using the default configuration.
    pub fn new(handler: H) -> Self {
        Self::build(handler, Settings::default())
    }

    pub fn with_config(handler: H, config: &MarshalerConfig) -> Result<Self, ConstructionError> {
        let settings = config.settings()?;
        Ok(Self::build(handler, settings))
    }

    fn build(handler: H, settings: Settings) -> Self {
        let descriptor = HandlerDescriptor::of::<M, H>();
        debug!("Built XML marshaler for {descriptor}");
        Self {
            handler: Arc::new(handler),
            descriptor: Arc::new(descriptor),
            settings: Arc::new(settings),
            _marker: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &HandlerDescriptor {
        &self.descriptor
    }

    /// Negotiates, decodes, calls the handler and encodes its result.
    pub async fn serve<B>(&self, request: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: fmt::Display,
    {
        let (parts, body) = request.into_parts();
        let mut headers = self.settings.default_headers.clone();

        if !negotiate::accepts_xml(&parts.headers) {
            let accept = negotiate::accept_header(&parts.headers);
            debug!("Rejecting {} {}: Accept is {accept:?}", parts.method, parts.uri);
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(PLAIN_TEXT_CONTENT_TYPE),
            );
            return respond(
                StatusCode::NOT_ACCEPTABLE,
                headers,
                Bytes::from(negotiate::not_acceptable_message(&accept)),
            );
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));

        let request = if self.settings.expects_body(&parts.method) {
            match self.read_request(&parts.method, &parts.headers, body).await {
                Ok(request) => request,
                Err(err) => {
                    let status = failure_status(&err, StatusCode::INTERNAL_SERVER_ERROR);
                    debug!("{} {} failed before the handler ran: {err}", parts.method, parts.uri);
                    return self.error_response(status, headers, &err);
                }
            }
        } else {
            if !self.descriptor.is_unconstrained() {
                warn!(
                    "{} request to {} is not expected to carry a {} body; passing a default value",
                    parts.method,
                    parts.uri,
                    self.descriptor.request_type()
                );
            }
            H::Request::default()
        };

        let context = parts
            .extensions
            .get::<H::Context>()
            .cloned()
            .unwrap_or_default();

        let result = self
            .handler
            .call(&parts.uri, &parts.headers, request, context);

        if let Some(err) = result.error {
            let status = failure_status(&err, result.status);
            debug!("Handler for {} {} failed with {status}: {err}", parts.method, parts.uri);
            return self.error_response(status, headers, &err);
        }

        merge_headers(&mut headers, result.headers);

        let body = match result.body {
            Some(value) if result.status != StatusCode::NO_CONTENT => {
                match document::encode(&value) {
                    Ok(xml) => Bytes::from(xml),
                    Err(e) => {
                        error!(
                            "Failed to encode {} response: {e}",
                            self.descriptor.response_type()
                        );
                        Bytes::new()
                    }
                }
            }
            _ => Bytes::new(),
        };

        respond(result.status, headers, body)
    }

    async fn read_request<B>(
        &self,
        method: &Method,
        headers: &HeaderMap,
        body: B,
    ) -> Result<H::Request, MarshalerError>
    where
        B: Body,
        B::Error: fmt::Display,
    {
        if self.descriptor.is_unconstrained() {
            return Err(MarshalerError::UnconstrainedBody {
                method: method.clone(),
            });
        }
        if !negotiate::declares_xml(headers) {
            return Err(MarshalerError::UnsupportedContentType {
                content_type: negotiate::content_type_header(headers).into_owned(),
            });
        }

        let bytes = body
            .collect()
            .await
            .map_err(|e| MarshalerError::Body(e.to_string()))?
            .to_bytes();
        // The body stream is released once collected.
        Ok(document::decode(&bytes)?)
    }

    fn error_response<E: HandlerError>(
        &self,
        status: StatusCode,
        headers: HeaderMap,
        err: &E,
    ) -> Response<Full<Bytes>> {
        let document = ErrorDocument::from_error(err, self.settings.snake_case_errors);
        let body = match document::encode(&document) {
            Ok(xml) => Bytes::from(xml),
            Err(e) => {
                error!("Failed to encode error document: {e}");
                Bytes::new()
            }
        };
        respond(status, headers, body)
    }
}

impl<H, M, B> Service<Request<B>> for XmlMarshaler<H, M>
where
    H: Handler<M>,
    M: 'static,
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: fmt::Display,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, request: Request<B>) -> Self::Future {
        let marshaler = self.clone();
        Box::pin(async move { Ok(marshaler.serve(request).await) })
    }
}

/// Status for a failed handler result: the error's own status, else the
/// declared one when it already is a 4xx or 5xx, else 500.
fn failure_status<E: HandlerError>(err: &E, declared: StatusCode) -> StatusCode {
    err.status().unwrap_or(
        if declared.is_client_error() || declared.is_server_error() {
            declared
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        },
    )
}

/// Every header name present in `source` replaces the values already in
/// `target`.
fn merge_headers(target: &mut HeaderMap, source: HeaderMap) {
    let mut current: Option<HeaderName> = None;
    for (name, value) in source {
        if let Some(name) = name {
            target.remove(&name);
            current = Some(name);
        }
        if let Some(name) = &current {
            target.append(name.clone(), value);
        }
    }
}

fn respond(status: StatusCode, headers: HeaderMap, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
