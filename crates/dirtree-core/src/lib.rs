// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dirtree Core - directory table and listing format converters
//!
//! This crate provides:
//! - An ID-indexed directory table that every format converts to/from
//! - Parser and renderer traits for format handlers
//! - Handlers for 6 encodings: find, python, acm1, acm2, acm3, xml
//! - Conversion entry points driven by format tags

pub mod convert;
pub mod formats;
pub mod path_index;
pub mod table;
pub mod traits;

pub use convert::{
    convert, convert_stream, convert_tagged, parse_content, render_content, ConvertConfig,
    UnknownFormatPolicy,
};
pub use formats::handler_for;
pub use path_index::PathIndex;
pub use table::{DirId, DirectoryTable, TableError};
pub use traits::{
    ConversionError, DirFormat, FormatHandler, ParseConfig, Parser, RenderConfig, Renderer, Result,
    MAX_INDENT_WIDTH,
};
