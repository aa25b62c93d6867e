// SPDX-License-Identifier: AGPL-3.0-or-later
//! Format handlers for each supported encoding

pub mod acm;
pub mod find;
pub mod python;
pub mod scanner;
pub mod xml;

pub use acm::{Acm1Handler, Acm2Handler, Acm3Handler};
pub use find::FindHandler;
pub use python::PythonHandler;
pub use xml::XmlHandler;

use crate::table::{DirId, DirectoryTable, TableError};
use crate::traits::{DirFormat, FormatHandler, Result};

/// Handler reading and writing `format`
pub fn handler_for(format: DirFormat) -> Box<dyn FormatHandler> {
    match format {
        DirFormat::Find => Box::new(FindHandler::new()),
        DirFormat::Python => Box::new(PythonHandler::new()),
        DirFormat::Acm1 => Box::new(Acm1Handler::new()),
        DirFormat::Acm2 => Box::new(Acm2Handler::new()),
        DirFormat::Acm3 => Box::new(Acm3Handler::new()),
        DirFormat::Xml => Box::new(XmlHandler::new()),
    }
}

/// Root of a table that went through `finish`; renderers refuse anything else.
pub(crate) fn finished_root(table: &DirectoryTable) -> Result<DirId> {
    Ok(table.root().ok_or(TableError::NoRoot)?)
}

/// Leading indentation for `depth` levels of `width` spaces
pub(crate) fn indent(output: &mut String, depth: usize, width: usize) {
    output.extend(std::iter::repeat(' ').take(depth * width));
}
