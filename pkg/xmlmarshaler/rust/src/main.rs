// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

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

use std::convert::Infallible;

use anyhow::{Context, Result};
use clap::Parser;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue, LOCATION};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use log::{error, info};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::signal::unix::{SignalKind, signal};
use xml_marshaler::{
    HandlerResult, HeaderMap, HttpError, MarshalerConfig, Unconstrained, Uri, XmlMarshaler,
};

mod cli;

use cli::Args;

static NOTFOUND: &[u8] = b"Not found";

#[derive(Debug, Default, Deserialize, Serialize)]
struct Widget {
    name: String,
    #[serde(default)]
    count: u32,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

fn create_widget(
    url: &Uri,
    _headers: &HeaderMap,
    widget: Widget,
) -> HandlerResult<Widget, HttpError> {
    if widget.name.is_empty() {
        let err = HttpError::unprocessable_entity("widget name must not be empty");
        return HandlerResult::error(err.named("invalid_widget"));
    }
    let location = match HeaderValue::from_str(&format!("{}/{}", url.path(), widget.name)) {
        Ok(location) => location,
        Err(_) => {
            return HandlerResult::error(HttpError::bad_request(
                "widget name is not usable in a URL",
            ));
        }
    };
    HandlerResult::created(widget).header(LOCATION, location)
}

fn health(
    _url: &Uri,
    _headers: &HeaderMap,
    _rq: Unconstrained,
) -> HandlerResult<Health, HttpError> {
    HandlerResult::ok(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn not_found() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(NOTFOUND)));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

async fn run(args: Args, config: MarshalerConfig) -> Result<()> {
    let widgets =
        XmlMarshaler::with_config(create_widget, &config).context("Failed to build /widgets")?;
    let status =
        XmlMarshaler::with_config(health, &config).context("Failed to build /health")?;

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("could not listen on {}", args.listen))?;
    info!("Listening on {}", args.listen);

    let mut sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                let (stream, peer) = accept_result?;
                let io = TokioIo::new(stream);
                let widgets = widgets.clone();
                let status = status.clone();

                tokio::task::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let widgets = widgets.clone();
                        let status = status.clone();
                        async move {
                            let path = req.uri().path().to_owned();
                            let response = match path.as_str() {
                                "/widgets" => widgets.serve(req).await,
                                "/health" => status.serve(req).await,
                                _ => {
                                    info!("{} Request to unknown endpoint: {}", req.method(), path);
                                    not_found()
                                }
                            };
                            Ok::<_, Infallible>(response)
                        }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {peer}: {err}");
                    }
                });
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
                return Ok(());
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down");
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(args.log_level)?;
    info!("Log level set to: {:?}", args.log_level);

    let config = match &args.config {
        Some(path) => MarshalerConfig::load(path)?,
        None => MarshalerConfig::default(),
    };

    run(args, config).await
}
