// SPDX-License-Identifier: AGPL-3.0-or-later
//! Conversion entry points
//!
//! Provides:
//! - Format dispatch for parsing and rendering
//! - Tagged conversion, where the input names both formats itself
//! - Stream conversion over any reader/writer pair
//! - TOML-loadable conversion settings

use crate::formats::handler_for;
use crate::table::DirectoryTable;
use crate::traits::{ConversionError, DirFormat, ParseConfig, RenderConfig, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// What to do with a format tag that names none of the six formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFormatPolicy {
    /// Fail the conversion
    #[default]
    Error,
    /// Produce no output, like the legacy converter
    Ignore,
}

/// Settings for one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub parse: ParseConfig,
    pub render: RenderConfig,
    pub unknown_format: UnknownFormatPolicy,
}

impl ConvertConfig {
    /// Load settings from TOML; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.render.validate()?;
        Ok(config)
    }
}

/// Parse `input` written in `format`
pub fn parse_content(
    input: &str,
    format: DirFormat,
    config: &ParseConfig,
) -> Result<DirectoryTable> {
    let table = handler_for(format).parse(input, config)?;
    tracing::debug!(%format, directories = table.len(), root = ?table.root(), "parsed listing");
    Ok(table)
}

/// Render `table` as `format`
pub fn render_content(
    table: &DirectoryTable,
    format: DirFormat,
    config: &RenderConfig,
) -> Result<String> {
    let output = handler_for(format).render(table, config)?;
    tracing::debug!(%format, bytes = output.len(), "rendered listing");
    Ok(output)
}

/// Convert `input` from one format to another
pub fn convert(
    input: &str,
    from: DirFormat,
    to: DirFormat,
    config: &ConvertConfig,
) -> Result<String> {
    let table = parse_content(input, from, &config.parse)?;
    render_content(&table, to, &config.render)
}

/// Split the two leading whitespace-separated tags off `input`.
fn split_tags(input: &str) -> (&str, &str, &str) {
    fn next_word(text: &str) -> (&str, &str) {
        let text = text.trim_start();
        let end = text.find(char::is_whitespace).unwrap_or(text.len());
        text.split_at(end)
    }

    let (from, rest) = next_word(input);
    let (to, rest) = next_word(rest);
    (from, to, rest)
}

fn resolve(tag: &str, policy: UnknownFormatPolicy) -> Result<Option<DirFormat>> {
    match (tag.parse::<DirFormat>(), policy) {
        (Ok(format), _) => Ok(Some(format)),
        (Err(ConversionError::UnknownFormat(tag)), UnknownFormatPolicy::Ignore) => {
            tracing::warn!(tag = %tag, "unknown format tag, skipping conversion");
            Ok(None)
        }
        (Err(err), _) => Err(err),
    }
}

/// Convert input that starts with its own `<from> <to>` format tags
pub fn convert_tagged(input: &str, config: &ConvertConfig) -> Result<String> {
    let (from, to, body) = split_tags(input);
    let from = resolve(from, config.unknown_format)?;
    let to = resolve(to, config.unknown_format)?;

    match (from, to) {
        (Some(from), Some(to)) => convert(body, from, to, config),
        _ => Ok(String::new()),
    }
}

/// Read a whole tagged listing from `reader` and write the conversion to `writer`.
///
/// Nothing is written unless the conversion succeeds.
pub fn convert_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    config: &ConvertConfig,
) -> Result<()> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let output = convert_tagged(&input, config)?;
    writer.write_all(output.as_bytes())?;
    writer.flush()?;
    Ok(())
}
