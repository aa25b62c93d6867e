// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parser and renderer traits shared by every format handler

use crate::table::{DirectoryTable, TableError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The six directory listing encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirFormat {
    Find,
    Python,
    Acm1,
    Acm2,
    Acm3,
    Xml,
}

impl DirFormat {
    pub const ALL: [DirFormat; 6] = [
        DirFormat::Find,
        DirFormat::Python,
        DirFormat::Acm1,
        DirFormat::Acm2,
        DirFormat::Acm3,
        DirFormat::Xml,
    ];

    /// Tag used to select this format on the input stream
    pub fn tag(&self) -> &'static str {
        match self {
            DirFormat::Find => "find",
            DirFormat::Python => "python",
            DirFormat::Acm1 => "acm1",
            DirFormat::Acm2 => "acm2",
            DirFormat::Acm3 => "acm3",
            DirFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for DirFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DirFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        DirFormat::ALL
            .into_iter()
            .find(|f| f.tag() == s)
            .ok_or_else(|| ConversionError::UnknownFormat(s.to_string()))
    }
}

/// Conversion errors
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Malformed or truncated input
    #[error("{format} parse error at line {line}: {message}")]
    ParseError {
        format: DirFormat,
        line: usize,
        message: String,
    },

    /// A table operation failed while reading a specific line
    #[error("{format} input at line {line}: {source}")]
    Reference {
        format: DirFormat,
        line: usize,
        #[source]
        source: TableError,
    },

    /// The parsed records do not form a single tree
    #[error("invalid directory tree: {0}")]
    Table(#[from] TableError),

    #[error("unknown format tag '{0}'")]
    UnknownFormat(String),

    #[error("invalid configuration: {0}")]
    ConfigError(#[from] toml::de::Error),

    /// A setting parsed but is out of range
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Spaces per nesting level in python listings
    pub python_indent_width: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            python_indent_width: 4,
        }
    }
}

/// Widest indentation step a renderer accepts
pub const MAX_INDENT_WIDTH: usize = 64;

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub python_indent_width: usize,
    pub xml_indent_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            python_indent_width: 4,
            xml_indent_width: 2,
        }
    }
}

impl RenderConfig {
    /// Reject indentation widths above [`MAX_INDENT_WIDTH`].
    pub fn validate(&self) -> Result<()> {
        let widths = [
            ("python_indent_width", self.python_indent_width),
            ("xml_indent_width", self.xml_indent_width),
        ];
        match widths.into_iter().find(|(_, width)| *width > MAX_INDENT_WIDTH) {
            Some((key, width)) => Err(ConversionError::InvalidSetting(format!(
                "{key} = {width} exceeds the maximum of {MAX_INDENT_WIDTH}"
            ))),
            None => Ok(()),
        }
    }
}

/// Builds a [`DirectoryTable`] from one encoding
pub trait Parser {
    fn format(&self) -> DirFormat;

    /// Parse `input`; on success the returned table has a resolved root.
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<DirectoryTable>;
}

/// Serializes a finished [`DirectoryTable`] into one encoding
pub trait Renderer {
    fn format(&self) -> DirFormat;

    fn render(&self, table: &DirectoryTable, config: &RenderConfig) -> Result<String>;
}

/// A handler able to both read and write its format
pub trait FormatHandler: Parser + Renderer {}

impl<T: Parser + Renderer> FormatHandler for T {}
