// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io;

use pocketchemist::cli::{build_cli, dispatch, CommandPlugin, CoreCommands};
use tracing_subscriber::EnvFilter;

/// Log filter for the given `-v` count, unless `RUST_LOG` is set.
fn default_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        // Keep Wasmtime/Cranelift internals quiet at any verbosity.
        EnvFilter::new(format!(
            "{},cranelift_codegen=warn,wasmtime_cranelift=warn,wasmtime=warn",
            level
        ))
    })
}

fn init_tracing(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter(verbosity))
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn main() -> anyhow::Result<()> {
    let core = CoreCommands;
    let plugins: [&dyn CommandPlugin; 1] = [&core];

    let matches = build_cli(&plugins).get_matches();
    init_tracing(matches.get_count("verbose"));

    dispatch(&plugins, &matches, &mut io::stdout().lock())
}
