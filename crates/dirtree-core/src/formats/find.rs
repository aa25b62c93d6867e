// SPDX-License-Identifier: AGPL-3.0-or-later
//! find-style absolute path listing
//!
//! ```text
//! 4
//! root 1
//! root/usr 2
//! root/usr/bin 4
//! root/etc 3
//! ```
//!
//! A path may name directories whose own line comes later. Those get a
//! provisional identifier below every real identifier in the input, and
//! below the acm2 no-parent marker, and are renamed once their line shows up. The root line is the one without a
//! slash.

use super::acm::NO_PARENT;
use super::scanner::Scanner;
use crate::path_index::PathIndex;
use crate::table::{DirId, DirectoryTable, TableError};
use crate::traits::{
    ConversionError, DirFormat, ParseConfig, Parser, RenderConfig, Renderer, Result,
};

/// find listing handler
pub struct FindHandler;

impl FindHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FindHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// One `path id` line
struct PathLine<'a> {
    line: usize,
    path: &'a str,
    id: DirId,
}

impl PathLine<'_> {
    fn error(&self, message: impl Into<String>) -> ConversionError {
        ConversionError::ParseError {
            format: DirFormat::Find,
            line: self.line,
            message: message.into(),
        }
    }

    fn reference(&self, source: TableError) -> ConversionError {
        ConversionError::Reference {
            format: DirFormat::Find,
            line: self.line,
            source,
        }
    }
}

/// Descending identifiers strictly below every real identifier and [`NO_PARENT`]
struct ProvisionalIds {
    ceiling: DirId,
    next: Option<DirId>,
}

impl ProvisionalIds {
    fn below(lines: &[PathLine<'_>]) -> Self {
        let lowest = lines.iter().map(|l| l.id).fold(NO_PARENT, DirId::min);
        let ceiling = lowest.checked_sub(1);
        Self {
            ceiling: ceiling.unwrap_or(DirId::MIN),
            next: ceiling,
        }
    }

    fn allocate(&mut self, at: &PathLine<'_>) -> Result<DirId> {
        let id = self
            .next
            .ok_or_else(|| at.error("no identifiers left for unnamed directories"))?;
        self.next = id.checked_sub(1);
        Ok(id)
    }

    fn contains(&self, id: DirId) -> bool {
        self.next.map_or(true, |next| id > next) && id <= self.ceiling
    }
}

impl Parser for FindHandler {
    fn format(&self) -> DirFormat {
        DirFormat::Find
    }

    fn parse(&self, input: &str, _config: &ParseConfig) -> Result<DirectoryTable> {
        let mut s = Scanner::new(input, DirFormat::Find);
        let count = s.next_count("directory count")?;

        let mut lines = Vec::new();
        for _ in 0..count {
            let path = s.expect_token("directory path")?;
            let line = s.line();
            let id = s.next_int("directory id")?;
            lines.push(PathLine { line, path, id });
        }

        let mut provisional = ProvisionalIds::below(&lines);
        let mut table = DirectoryTable::new();
        let mut root: Option<DirId> = None;

        for entry in &lines {
            let root_id = match root {
                Some(id) => id,
                None => {
                    let id = provisional.allocate(entry)?;
                    let name = entry.path.split('/').next().unwrap_or_default();
                    table.insert(id, name, None).map_err(|e| entry.reference(e))?;
                    root = Some(id);
                    id
                }
            };

            let Some((_, below_root)) = entry.path.split_once('/') else {
                if !provisional.contains(root_id) {
                    return Err(entry.error(format!("root already listed with id {root_id}")));
                }
                table
                    .reassign_identifier(root_id, entry.id)
                    .map_err(|e| entry.reference(e))?;
                tracing::trace!(from = root_id, to = entry.id, "resolved root id");
                root = Some(entry.id);
                continue;
            };

            let mut segments: Vec<&str> = below_root.split('/').collect();
            let name = segments.pop().unwrap_or_default();

            let mut parent = root_id;
            for segment in segments {
                parent = match table.find_child(parent, segment)? {
                    Some(existing) => existing,
                    None => {
                        let id = provisional.allocate(entry)?;
                        table
                            .insert(id, segment, Some(parent))
                            .map_err(|e| entry.reference(e))?;
                        id
                    }
                };
            }

            match table.find_child(parent, name)? {
                Some(existing) if provisional.contains(existing) => {
                    table
                        .reassign_identifier(existing, entry.id)
                        .map_err(|e| entry.reference(e))?;
                    tracing::trace!(
                        from = existing,
                        to = entry.id,
                        path = entry.path,
                        "resolved id"
                    );
                }
                Some(existing) => {
                    return Err(entry.error(format!(
                        "path '{}' already listed with id {existing}",
                        entry.path
                    )));
                }
                None => {
                    table
                        .insert(entry.id, name, Some(parent))
                        .map_err(|e| entry.reference(e))?;
                }
            }
        }

        let unresolved = table.ids().filter(|id| provisional.contains(*id)).count();
        if unresolved > 0 {
            tracing::warn!(
                unresolved,
                "find listing never named some directories, keeping provisional ids"
            );
        }

        table.sort_children_by_id();
        table.finish()?;
        Ok(table)
    }
}

impl Renderer for FindHandler {
    fn format(&self) -> DirFormat {
        DirFormat::Find
    }

    fn render(&self, table: &DirectoryTable, _config: &RenderConfig) -> Result<String> {
        let index = PathIndex::build(table)?;
        let root = table.root().ok_or(TableError::NoRoot)?;
        let root_name = table.name_of(root)?;

        let mut output = format!("{}\n", table.len());
        for (id, path) in index.iter() {
            output.push_str(root_name);
            for segment in path {
                output.push('/');
                output.push_str(table.name_of(*segment)?);
            }
            output.push_str(&format!(" {}\n", id));
        }

        Ok(output)
    }
}
