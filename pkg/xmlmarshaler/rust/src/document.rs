// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::any::type_name;
use std::borrow::Cow;

use quick_xml::SeError;
use serde::de::DeserializeOwned;
use serde::ser::{self, Impossible};
use serde::{Deserialize, Serialize};

use crate::errors::HandlerError;

/// Category used when an error's type name is not meaningful to clients.
const OPAQUE_CATEGORY: &str = "error";

/// Body sent for every failure after negotiation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "error")]
pub struct ErrorDocument {
    pub error: String,
    pub description: String,
}

impl ErrorDocument {
    pub fn from_error<E: HandlerError>(err: &E, snake_case: bool) -> Self {
        Self {
            error: error_category(err, snake_case),
            description: err.to_string(),
        }
    }
}

/// Machine-readable category of `err`.
///
/// An explicit name wins. Otherwise, with `snake_case` set, an error carrying
/// a status is named after the status reason (`not_found`). Failing that the
/// error's type name is used.
pub fn error_category<E: HandlerError>(err: &E, snake_case: bool) -> String {
    if let Some(name) = err.name() {
        return name.into_owned();
    }
    if snake_case
        && let Some(reason) = err.status().and_then(|status| status.canonical_reason())
    {
        return reason.to_lowercase().replace(' ', "_");
    }
    type_category(type_name::<E>())
}

/// `my_crate::errors::NotFound<u32>` becomes `NotFound`. Trait objects and
/// names that don't look like a nominal type become `error`.
fn type_category(full_name: &str) -> String {
    if full_name.contains("dyn ") {
        return OPAQUE_CATEGORY.to_string();
    }
    let path = full_name.split('<').next().unwrap_or(full_name);
    let name = path.rsplit("::").next().unwrap_or(path);
    if name.chars().next().is_some_and(char::is_uppercase) {
        name.to_string()
    } else {
        OPAQUE_CATEGORY.to_string()
    }
}

/// Encodes `value` as an XML document.
///
/// Structs and other named values are written under their own name. Values
/// without one fall back to [`Rootless`]: sequences become sibling elements
/// (`<Item>..</Item><Item>..</Item>`) and scalars are wrapped in an element
/// named after their type (`<string>hello</string>`).
pub(crate) fn encode<T: ?Sized + Serialize>(value: &T) -> Result<String, SeError> {
    match quick_xml::se::to_string(value) {
        Err(SeError::Unsupported(reason)) => value.serialize(Rootless { reason }),
        result => result,
    }
}

/// Decodes a request body. Collections use the layout [`encode`] writes:
/// sibling elements for sequences, one element per key inside a root element
/// for maps.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, quick_xml::DeError> {
    quick_xml::de::from_reader(body)
}

/// Serializer for top-level values quick-xml cannot name. `reason` is the
/// original failure, reported for shapes this serializer cannot place either.
struct Rootless {
    reason: Cow<'static, str>,
}

impl Rootless {
    fn unsupported<T>(self) -> Result<T, SeError> {
        Err(SeError::Unsupported(self.reason))
    }
}

macro_rules! scalar {
    ($method:ident($ty:ty) => $root:literal) => {
        fn $method(self, value: $ty) -> Result<String, SeError> {
            quick_xml::se::to_string_with_root($root, &value)
        }
    };
}

impl ser::Serializer for Rootless {
    type Ok = String;
    type Error = SeError;

    type SerializeSeq = Siblings;
    type SerializeTuple = Siblings;
    type SerializeTupleStruct = Impossible<String, SeError>;
    type SerializeTupleVariant = Impossible<String, SeError>;
    type SerializeMap = Impossible<String, SeError>;
    type SerializeStruct = Impossible<String, SeError>;
    type SerializeStructVariant = Impossible<String, SeError>;

    scalar!(serialize_bool(bool) => "bool");
    scalar!(serialize_i8(i8) => "i8");
    scalar!(serialize_i16(i16) => "i16");
    scalar!(serialize_i32(i32) => "i32");
    scalar!(serialize_i64(i64) => "i64");
    scalar!(serialize_i128(i128) => "i128");
    scalar!(serialize_u8(u8) => "u8");
    scalar!(serialize_u16(u16) => "u16");
    scalar!(serialize_u32(u32) => "u32");
    scalar!(serialize_u64(u64) => "u64");
    scalar!(serialize_u128(u128) => "u128");
    scalar!(serialize_f32(f32) => "f32");
    scalar!(serialize_f64(f64) => "f64");
    scalar!(serialize_char(char) => "char");
    scalar!(serialize_str(&str) => "string");

    fn serialize_bytes(self, _value: &[u8]) -> Result<String, SeError> {
        self.unsupported()
    }

    fn serialize_none(self) -> Result<String, SeError> {
        Ok(String::new())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String, SeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String, SeError> {
        Ok(String::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, SeError> {
        self.unsupported()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<String, SeError> {
        self.unsupported()
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<String, SeError> {
        self.unsupported()
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, SeError> {
        self.unsupported()
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Siblings, SeError> {
        Ok(Siblings::default())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Siblings, SeError> {
        Ok(Siblings::default())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, SeError> {
        self.unsupported()
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, SeError> {
        self.unsupported()
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, SeError> {
        self.unsupported()
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, SeError> {
        self.unsupported()
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, SeError> {
        self.unsupported()
    }
}

/// Elements of a top-level sequence, each encoded as its own document.
#[derive(Default)]
struct Siblings {
    document: String,
}

impl Siblings {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SeError> {
        self.document.push_str(&encode(value)?);
        Ok(())
    }
}

impl ser::SerializeSeq for Siblings {
    type Ok = String;
    type Error = SeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SeError> {
        self.push(value)
    }

    fn end(self) -> Result<String, SeError> {
        Ok(self.document)
    }
}

impl ser::SerializeTuple for Siblings {
    type Ok = String;
    type Error = SeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SeError> {
        self.push(value)
    }

    fn end(self) -> Result<String, SeError> {
        Ok(self.document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::{HttpError, MarshalerError};
    use hyper::StatusCode;
    use std::fmt;

    #[derive(Debug)]
    struct QuotaExceeded;

    impl fmt::Display for QuotaExceeded {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("quota exceeded")
        }
    }

    impl std::error::Error for QuotaExceeded {}

    impl HandlerError for QuotaExceeded {
        fn status(&self) -> Option<StatusCode> {
            Some(StatusCode::TOO_MANY_REQUESTS)
        }
    }

    #[allow(non_camel_case_types)]
    #[derive(Debug)]
    struct lowercase_error;

    impl fmt::Display for lowercase_error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("hidden")
        }
    }

    impl std::error::Error for lowercase_error {}

    impl HandlerError for lowercase_error {}

    #[test]
    fn test_explicit_name_wins() {
        let err = HttpError::not_found("no such widget").named("widget_not_found");
        assert_eq!(error_category(&err, false), "widget_not_found");
        assert_eq!(error_category(&err, true), "widget_not_found");
    }

    #[test]
    fn test_snake_case_status_names() {
        assert_eq!(error_category(&QuotaExceeded, true), "too_many_requests");
        assert_eq!(
            error_category(&HttpError::not_found("gone"), true),
            "not_found"
        );
    }

    #[test]
    fn test_type_name_fallback() {
        assert_eq!(error_category(&QuotaExceeded, false), "QuotaExceeded");
        assert_eq!(error_category(&HttpError::not_found("gone"), false), "HttpError");
        assert_eq!(
            error_category(&MarshalerError::Body("eof".to_string()), false),
            "MarshalerError"
        );
        assert_eq!(error_category(&lowercase_error, false), "error");
    }

    #[test]
    fn test_type_category() {
        assert_eq!(type_category("crate::errors::NotFound<u32>"), "NotFound");
        assert_eq!(type_category("alloc::boxed::Box<dyn core::error::Error>"), "error");
        assert_eq!(type_category("&str"), "error");
        assert_eq!(type_category("Plain"), "Plain");
    }

    #[test]
    fn test_error_document_xml() {
        let doc = ErrorDocument::from_error(&HttpError::not_found("no widget 7"), true);
        let xml = encode(&doc).unwrap();
        assert_eq!(
            xml,
            "<error><error>not_found</error><description>no widget 7</description></error>"
        );

        let parsed: ErrorDocument = decode(xml.as_bytes()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_decode_reports_malformed_documents() {
        let result: Result<ErrorDocument, _> = decode(b"<error><error>oops</description>");
        assert!(result.is_err());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_encode_sequence_as_siblings() {
        let items = vec![
            Item {
                name: "a".to_string(),
            },
            Item {
                name: "b".to_string(),
            },
        ];
        let xml = encode(&items).unwrap();
        assert_eq!(xml, "<Item><name>a</name></Item><Item><name>b</name></Item>");

        let parsed: Vec<Item> = decode(xml.as_bytes()).unwrap();
        assert_eq!(parsed, items);
    }

    #[test]
    fn test_encode_scalars_under_type_name() {
        let xml = encode("hello").unwrap();
        assert_eq!(xml, "<string>hello</string>");
        let parsed: String = decode(xml.as_bytes()).unwrap();
        assert_eq!(parsed, "hello");

        assert_eq!(encode(&42u32).unwrap(), "<u32>42</u32>");
        assert_eq!(encode(&true).unwrap(), "<bool>true</bool>");
    }

    #[test]
    fn test_encode_empty_values() {
        assert_eq!(encode(&()).unwrap(), "");
        assert_eq!(encode(&None::<Item>).unwrap(), "");
        assert_eq!(encode(&Vec::<Item>::new()).unwrap(), "");
    }

    #[test]
    fn test_encode_sequence_of_strings() {
        let tags = vec!["small".to_string(), "blue".to_string()];
        let xml = encode(&tags).unwrap();
        assert_eq!(xml, "<string>small</string><string>blue</string>");
    }

    #[test]
    fn test_encode_rootless_map_fails() {
        let map = std::collections::BTreeMap::from([("k".to_string(), "v".to_string())]);
        let err = encode(&map).unwrap_err();
        assert!(matches!(err, SeError::Unsupported(_)));
    }
}
