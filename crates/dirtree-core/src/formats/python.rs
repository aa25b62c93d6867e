// SPDX-License-Identifier: AGPL-3.0-or-later
//! Python-style indented listing
//!
//! ```text
//! 3
//! root 1
//!     child 2
//!         grand 3
//! ```

use super::scanner::Scanner;
use super::{finished_root, indent};
use crate::table::{DirId, DirectoryTable};
use crate::traits::{
    ConversionError, DirFormat, ParseConfig, Parser, RenderConfig, Renderer, Result,
};

/// Python-style listing handler
pub struct PythonHandler;

impl PythonHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// One logical input line
struct Entry<'a> {
    line: usize,
    depth: usize,
    name: &'a str,
    id: DirId,
}

/// Pulls the declared number of lines off the scanner.
struct LineCursor<'s, 'a> {
    scanner: &'s mut Scanner<'a>,
    remaining: usize,
    width: usize,
}

impl<'a> LineCursor<'_, 'a> {
    fn next_entry(&mut self) -> Result<Option<Entry<'a>>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        let line = self.scanner.line();
        let text = self
            .scanner
            .next_line()
            .ok_or_else(|| self.scanner.error("unexpected end of input, expected directory line"))?;

        let body = text.trim_start_matches(' ');
        let depth = (text.len() - body.len()) / self.width;

        let mut fields = body.split_whitespace();
        let error = |message: String| ConversionError::ParseError {
            format: DirFormat::Python,
            line,
            message,
        };
        let name = fields
            .next()
            .ok_or_else(|| error("expected directory name".to_string()))?;
        let id: DirId = match fields.next() {
            Some(token) => token
                .parse()
                .map_err(|_| error(format!("expected directory id, found '{token}'")))?,
            None => return Err(error(format!("missing id after '{name}'"))),
        };

        Ok(Some(Entry {
            line,
            depth,
            name,
            id,
        }))
    }
}

impl Parser for PythonHandler {
    fn format(&self) -> DirFormat {
        DirFormat::Python
    }

    fn parse(&self, input: &str, config: &ParseConfig) -> Result<DirectoryTable> {
        let mut scanner = Scanner::new(input, DirFormat::Python);
        let remaining = scanner.next_count("line count")?;
        scanner.skip_line();

        let mut cursor = LineCursor {
            scanner: &mut scanner,
            remaining,
            width: config.python_indent_width.max(1),
        };
        let mut table = DirectoryTable::new();
        // ancestors[d] is the most recent directory read at depth d
        let mut ancestors: Vec<DirId> = Vec::new();

        while let Some(entry) = cursor.next_entry()? {
            if entry.depth > ancestors.len() {
                return Err(ConversionError::ParseError {
                    format: DirFormat::Python,
                    line: entry.line,
                    message: format!(
                        "'{}' is indented {} levels but its parent is at level {}",
                        entry.name,
                        entry.depth,
                        ancestors.len() as isize - 1
                    ),
                });
            }

            // Deeper than the previous line: child. Same depth: sibling.
            // Shallower: sibling of an earlier ancestor.
            ancestors.truncate(entry.depth);
            let parent = ancestors.last().copied();

            table
                .insert(entry.id, entry.name, parent)
                .map_err(|source| ConversionError::Reference {
                    format: DirFormat::Python,
                    line: entry.line,
                    source,
                })?;
            ancestors.push(entry.id);
        }

        table.finish()?;
        Ok(table)
    }
}

impl Renderer for PythonHandler {
    fn format(&self) -> DirFormat {
        DirFormat::Python
    }

    fn render(&self, table: &DirectoryTable, config: &RenderConfig) -> Result<String> {
        config.validate()?;
        finished_root(table)?;
        let mut output = format!("{}\n", table.len());

        for (id, depth) in table.preorder() {
            indent(&mut output, depth, config.python_indent_width);
            output.push_str(&format!("{} {}\n", table.name_of(id)?, id));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableError;

    fn parse(input: &str) -> Result<DirectoryTable> {
        PythonHandler::new().parse(input, &ParseConfig::default())
    }

    #[test]
    fn test_depth_tracking() {
        let table = parse("3\nroot 1\n    child 2\n        grand 3\n").unwrap();
        assert_eq!(table.root(), Some(1));
        assert_eq!(table.parent_of(2).unwrap(), Some(1));
        assert_eq!(table.parent_of(3).unwrap(), Some(2));
    }

    #[test]
    fn test_return_to_shallower_level() {
        let input = "6\nr 1\n    a 2\n        aa 3\n            aaa 4\n    b 5\n        ba 6\n";
        let table = parse(input).unwrap();
        assert_eq!(table.children_of(1).unwrap(), vec![2, 5]);
        assert_eq!(table.children_of(2).unwrap(), vec![3]);
        assert_eq!(table.children_of(5).unwrap(), vec![6]);
    }

    #[test]
    fn test_sibling_order_is_input_order() {
        let table = parse("4\nr 1\n    z 9\n    y 3\n    x 7\n").unwrap();
        assert_eq!(table.children_of(1).unwrap(), vec![9, 3, 7]);
    }

    #[test]
    fn test_stops_after_declared_lines() {
        let table = parse("2\nr 1\n    a 2\n    trailing 3\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_indent_jump_rejected() {
        let err = parse("2\nr 1\n        deep 2\n").unwrap_err();
        assert!(matches!(err, ConversionError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_missing_line() {
        let err = parse("3\nr 1\n    a 2\n").unwrap_err();
        assert!(matches!(err, ConversionError::ParseError { .. }));
    }

    #[test]
    fn test_bad_id() {
        let err = parse("1\nr one\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "python parse error at line 2: expected directory id, found 'one'"
        );
    }

    #[test]
    fn test_second_top_level_line() {
        let err = parse("2\nr 1\ns 2\n").unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Table(TableError::MultipleRoots { .. })
        ));
    }

    #[test]
    fn test_render_indentation() {
        let input = "4\nroot 1\n    a 2\n        c 4\n    b 3\n";
        let table = parse(input).unwrap();
        let out = PythonHandler::new()
            .render(&table, &RenderConfig::default())
            .unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_custom_indent_width() {
        let config = ParseConfig {
            python_indent_width: 2,
        };
        let table = PythonHandler::new()
            .parse("3\nr 1\n  a 2\n    b 3\n", &config)
            .unwrap();
        assert_eq!(table.parent_of(3).unwrap(), Some(2));
    }
}
