// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::any::{TypeId, type_name};
use std::fmt;

use crate::handler::{Handler, Unconstrained};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// The handler takes [`Unconstrained`] and can never be given a body.
    Unconstrained,
    /// The handler takes a concrete type decoded from the request body.
    Concrete,
}

/// The declared input and output types of a handler, captured once when the
/// adapter is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    request_type: &'static str,
    response_type: &'static str,
    error_type: &'static str,
    request_shape: RequestShape,
    accepts_context: bool,
}

impl HandlerDescriptor {
    pub fn of<M, H: Handler<M>>() -> Self {
        let request_shape = if TypeId::of::<H::Request>() == TypeId::of::<Unconstrained>() {
            RequestShape::Unconstrained
        } else {
            RequestShape::Concrete
        };

        Self {
            request_type: type_name::<H::Request>(),
            response_type: type_name::<H::Response>(),
            error_type: type_name::<H::Error>(),
            request_shape,
            accepts_context: H::ACCEPTS_CONTEXT,
        }
    }

    pub fn request_type(&self) -> &'static str {
        self.request_type
    }

    pub fn response_type(&self) -> &'static str {
        self.response_type
    }

    pub fn error_type(&self) -> &'static str {
        self.error_type
    }

    pub fn request_shape(&self) -> RequestShape {
        self.request_shape
    }

    pub fn is_unconstrained(&self) -> bool {
        self.request_shape == RequestShape::Unconstrained
    }

    pub fn accepts_context(&self) -> bool {
        self.accepts_context
    }
}

impl fmt::Display for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fn(&Uri, &HeaderMap, {}{}) -> ({}, {})",
            self.request_type,
            if self.accepts_context { ", &Context" } else { "" },
            self.response_type,
            self.error_type
        )
    }
}
