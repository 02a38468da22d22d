// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Serves a couple of XML endpoints through the marshaler
#[derive(Parser, Debug, Clone)]
#[command(name = "xml-echo")]
#[command(about = "Echo typed XML requests over HTTP/1")]
pub struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// YAML marshaler config (body methods, error naming, default headers)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: log::Level,
}
