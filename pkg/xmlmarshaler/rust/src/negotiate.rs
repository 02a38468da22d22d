// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Media type checks for the `Accept` and `Content-Type` request headers.

use std::borrow::Cow;

use hyper::HeaderMap;
use hyper::header::{ACCEPT, CONTENT_TYPE, HeaderName};

pub const XML_CONTENT_TYPE: &str = "application/xml";
pub const PLAIN_TEXT_CONTENT_TYPE: &str = "text/plain";

const ANY_MEDIA_RANGE: &str = "*/*";

/// First value of `name`, or an empty string when the header is absent.
fn first_value<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Cow<'a, str> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .unwrap_or(Cow::Borrowed(""))
}

pub fn accept_header(headers: &HeaderMap) -> Cow<'_, str> {
    first_value(headers, &ACCEPT)
}

pub fn content_type_header(headers: &HeaderMap) -> Cow<'_, str> {
    first_value(headers, &CONTENT_TYPE)
}

/// Whether the client accepts an XML response. A missing or empty `Accept`
/// header accepts anything.
pub fn accepts_xml(headers: &HeaderMap) -> bool {
    let accept = accept_header(headers);
    accept.is_empty() || accept.contains(ANY_MEDIA_RANGE) || accept.contains(XML_CONTENT_TYPE)
}

/// Whether the request body is declared as XML. Media type parameters such as
/// `; charset=utf-8` are ignored.
pub fn declares_xml(headers: &HeaderMap) -> bool {
    content_type_header(headers).starts_with(XML_CONTENT_TYPE)
}

pub fn not_acceptable_message(accept: &str) -> String {
    format!("\"{accept}\" does not contain \"{XML_CONTENT_TYPE}\"")
}
