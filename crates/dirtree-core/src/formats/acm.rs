// SPDX-License-Identifier: AGPL-3.0-or-later
//! acm1, acm2 and acm3 handlers
//!
//! All three share a header: the directory count followed by one
//! `name id` line per directory. They differ in how the links follow it:
//!
//! - acm1: per directory (ascending id) `childCount child1 .. childN`
//! - acm2: per directory (ascending id) the parent id, `-1` for the root
//! - acm3: `count - 1` lines of `parent child` edges

use super::finished_root;
use super::scanner::Scanner;
use crate::table::{DirId, DirectoryTable};
use crate::traits::{DirFormat, ParseConfig, Parser, RenderConfig, Renderer, Result};

/// Parent value marking the root in acm2 listings
pub(crate) const NO_PARENT: DirId = -1;

/// Read the shared header into a table of unlinked records.
fn parse_header(s: &mut Scanner<'_>) -> Result<(DirectoryTable, usize)> {
    let count = s.next_count("directory count")?;
    let mut table = DirectoryTable::new();

    for _ in 0..count {
        let name = s.expect_token("directory name")?;
        let id = s.next_int("directory id")?;
        table.insert(id, name, None).map_err(|e| s.reference(e))?;
    }

    Ok((table, count))
}

fn render_header(table: &DirectoryTable, output: &mut String) -> Result<()> {
    output.push_str(&format!("{}\n", table.len()));
    for id in table.ids() {
        output.push_str(&format!("{} {}\n", table.name_of(id)?, id));
    }
    Ok(())
}

/// acm1: child lists per directory
pub struct Acm1Handler;

impl Acm1Handler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Acm1Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for Acm1Handler {
    fn format(&self) -> DirFormat {
        DirFormat::Acm1
    }

    fn parse(&self, input: &str, _config: &ParseConfig) -> Result<DirectoryTable> {
        let mut s = Scanner::new(input, DirFormat::Acm1);
        let (mut table, _) = parse_header(&mut s)?;

        let ids: Vec<DirId> = table.ids().collect();
        for id in ids {
            let children = s.next_count("child count")?;
            for _ in 0..children {
                let child = s.next_int("child id")?;
                table.attach(id, child).map_err(|e| s.reference(e))?;
            }
        }

        table.finish()?;
        Ok(table)
    }
}

impl Renderer for Acm1Handler {
    fn format(&self) -> DirFormat {
        DirFormat::Acm1
    }

    fn render(&self, table: &DirectoryTable, _config: &RenderConfig) -> Result<String> {
        finished_root(table)?;
        let mut output = String::new();
        render_header(table, &mut output)?;

        for id in table.ids() {
            let children = table.children_of(id)?;
            output.push_str(&children.len().to_string());
            for child in children {
                output.push_str(&format!(" {}", child));
            }
            output.push('\n');
        }

        Ok(output)
    }
}

/// acm2: one parent line per directory
pub struct Acm2Handler;

impl Acm2Handler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Acm2Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for Acm2Handler {
    fn format(&self) -> DirFormat {
        DirFormat::Acm2
    }

    fn parse(&self, input: &str, _config: &ParseConfig) -> Result<DirectoryTable> {
        let mut s = Scanner::new(input, DirFormat::Acm2);
        let (mut table, _) = parse_header(&mut s)?;

        let ids: Vec<DirId> = table.ids().collect();
        for id in ids {
            let parent = s.next_int("parent id")?;
            if parent != NO_PARENT {
                table.attach(parent, id).map_err(|e| s.reference(e))?;
            }
        }

        table.finish()?;
        Ok(table)
    }
}

impl Renderer for Acm2Handler {
    fn format(&self) -> DirFormat {
        DirFormat::Acm2
    }

    fn render(&self, table: &DirectoryTable, _config: &RenderConfig) -> Result<String> {
        finished_root(table)?;
        let mut output = String::new();
        render_header(table, &mut output)?;

        for id in table.ids() {
            let parent = table.parent_of(id)?.unwrap_or(NO_PARENT);
            output.push_str(&format!("{}\n", parent));
        }

        Ok(output)
    }
}

/// acm3: flat edge list
pub struct Acm3Handler;

impl Acm3Handler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Acm3Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for Acm3Handler {
    fn format(&self) -> DirFormat {
        DirFormat::Acm3
    }

    fn parse(&self, input: &str, _config: &ParseConfig) -> Result<DirectoryTable> {
        let mut s = Scanner::new(input, DirFormat::Acm3);
        let (mut table, count) = parse_header(&mut s)?;

        for _ in 1..count {
            let parent = s.next_int("parent id")?;
            let child = s.next_int("child id")?;
            table.attach(parent, child).map_err(|e| s.reference(e))?;
        }

        table.finish()?;
        Ok(table)
    }
}

impl Renderer for Acm3Handler {
    fn format(&self) -> DirFormat {
        DirFormat::Acm3
    }

    fn render(&self, table: &DirectoryTable, _config: &RenderConfig) -> Result<String> {
        finished_root(table)?;
        let mut output = String::new();
        render_header(table, &mut output)?;

        for id in table.ids() {
            for child in table.children_of(id)? {
                output.push_str(&format!("{} {}\n", id, child));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ConversionError;
    use crate::table::TableError;

    const ACM1: &str = "3\nroot 1\na 2\nb 3\n2 2 3\n0\n0\n";
    const ACM2: &str = "3\nroot 1\na 2\nb 3\n-1\n1\n1\n";
    const ACM3: &str = "3\nroot 1\na 2\nb 3\n1 2\n1 3\n";

    fn parse(handler: &dyn Parser, input: &str) -> Result<DirectoryTable> {
        handler.parse(input, &ParseConfig::default())
    }

    fn assert_sample(table: &DirectoryTable) {
        assert_eq!(table.root(), Some(1));
        assert_eq!(table.children_of(1).unwrap(), vec![2, 3]);
        assert_eq!(table.parent_of(3).unwrap(), Some(1));
        assert_eq!(table.name_of(2).unwrap(), "a");
    }

    #[test]
    fn test_parse_all_variants() {
        assert_sample(&parse(&Acm1Handler::new(), ACM1).unwrap());
        assert_sample(&parse(&Acm2Handler::new(), ACM2).unwrap());
        assert_sample(&parse(&Acm3Handler::new(), ACM3).unwrap());
    }

    #[test]
    fn test_render_all_variants() {
        let table = parse(&Acm3Handler::new(), ACM3).unwrap();
        let config = RenderConfig::default();
        assert_eq!(Acm1Handler::new().render(&table, &config).unwrap(), ACM1);
        assert_eq!(Acm2Handler::new().render(&table, &config).unwrap(), ACM2);
        assert_eq!(Acm3Handler::new().render(&table, &config).unwrap(), ACM3);
    }

    #[test]
    fn test_acm1_child_counts_match_acm3_edges() {
        let table = parse(&Acm1Handler::new(), ACM1).unwrap();
        let config = RenderConfig::default();
        let acm1 = Acm1Handler::new().render(&table, &config).unwrap();
        let acm3 = Acm3Handler::new().render(&table, &config).unwrap();

        let child_lines: Vec<&str> = acm1.lines().skip(4).collect();
        let total: usize = child_lines
            .iter()
            .map(|l| l.split(' ').next().unwrap().parse::<usize>().unwrap())
            .sum();
        assert_eq!(total, 2);

        let edges: Vec<&str> = acm3.lines().skip(4).collect();
        assert_eq!(edges, vec!["1 2", "1 3"]);
        for edge in edges {
            let (parent, child) = edge.split_once(' ').unwrap();
            let line: Vec<&str> = child_lines[parent.parse::<usize>().unwrap() - 1]
                .split(' ')
                .skip(1)
                .collect();
            assert!(line.contains(&child));
        }
    }

    #[test]
    fn test_unsorted_ids_and_negative_ids() {
        let input = "3\nz 10\nroot -7\ny 0\n2 0 10\n0\n0\n";
        // second section follows ascending id order: -7, 0, 10
        let table = parse(&Acm1Handler::new(), input).unwrap();
        assert_eq!(table.root(), Some(-7));
        assert_eq!(table.children_of(-7).unwrap(), vec![0, 10]);
    }

    #[test]
    fn test_non_numeric_id_is_parse_error() {
        let err = parse(&Acm2Handler::new(), "1\nroot x\n-1\n").unwrap_err();
        assert!(matches!(
            err,
            ConversionError::ParseError { format: DirFormat::Acm2, line: 2, .. }
        ));
    }

    #[test]
    fn test_missing_edge_line() {
        let err = parse(&Acm3Handler::new(), "3\nr 1\na 2\nb 3\n1 2\n").unwrap_err();
        assert!(matches!(err, ConversionError::ParseError { .. }));
    }

    #[test]
    fn test_unknown_child_is_reference_error() {
        let err = parse(&Acm1Handler::new(), "2\nr 1\na 2\n1 5\n0\n").unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Reference {
                source: TableError::UnknownIdentifier(5),
                ..
            }
        ));
    }

    #[test]
    fn test_two_roots_rejected() {
        let err = parse(&Acm2Handler::new(), "2\nr 1\ns 2\n-1\n-1\n").unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Table(TableError::MultipleRoots { .. })
        ));
    }

    #[test]
    fn test_single_directory() {
        let table = parse(&Acm3Handler::new(), "1\nonly 5\n").unwrap();
        assert_eq!(table.root(), Some(5));
        let out = Acm1Handler::new()
            .render(&table, &RenderConfig::default())
            .unwrap();
        assert_eq!(out, "1\nonly 5\n0\n");
    }
}
