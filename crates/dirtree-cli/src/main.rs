// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dirtree - directory listing converter
//!
//! Reads `<from> <to>` followed by a listing in the `from` format on stdin
//! and writes the same tree in the `to` format on stdout.

use anyhow::Context;
use dirtree_core::{convert_stream, ConvertConfig};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout carries the converted listing only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dirtree=warn,dirtree_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::debug!("Starting dirtree v{}", env!("CARGO_PKG_VERSION"));

    convert_stream(io::stdin().lock(), io::stdout().lock(), &ConvertConfig::default())
        .context("conversion failed")?;

    Ok(())
}
