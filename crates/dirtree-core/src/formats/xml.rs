// SPDX-License-Identifier: AGPL-3.0-or-later
//! XML-style nested tag listing
//!
//! Directories with children are written as `<dir name='..' id='..'>` ...
//! `</dir>`, childless ones as `<file name='..' id='..'/>`. Both parse and
//! render keep their own stack instead of recursing per nesting level.

use super::scanner::Scanner;
use super::{finished_root, indent};
use crate::table::{DirId, DirectoryTable};
use crate::traits::{DirFormat, ParseConfig, Parser, RenderConfig, Renderer, Result};

/// XML listing handler
pub struct XmlHandler;

impl XmlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XmlHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Attributes of one opening tag
struct Tag<'a> {
    name: &'a str,
    id: DirId,
    self_closing: bool,
}

/// Read `name='..' id='..'` and everything up to the closing `>`.
fn read_tag<'a>(s: &mut Scanner<'a>) -> Result<Tag<'a>> {
    s.skip_past('\'')?;
    let name = s.read_until('\'')?;
    s.skip_past('\'')?;
    let id = s.next_int_prefix("directory id")?;
    let tail = s.read_until('>')?;

    Ok(Tag {
        name,
        id,
        self_closing: tail.trim_end().ends_with('/'),
    })
}

impl Parser for XmlHandler {
    fn format(&self) -> DirFormat {
        DirFormat::Xml
    }

    fn parse(&self, input: &str, _config: &ParseConfig) -> Result<DirectoryTable> {
        let mut s = Scanner::new(input, DirFormat::Xml);
        let mut table = DirectoryTable::new();
        // Directories whose closing tag is still pending, innermost last
        let mut open: Vec<DirId> = Vec::new();

        loop {
            if !table.is_empty() && open.is_empty() {
                break;
            }

            s.skip_whitespace();
            if s.rest().starts_with("</") {
                let closer = s.read_until('>')?;
                if closer.trim_end() != "</dir" {
                    return Err(s.error(format!("expected '</dir>', found '{closer}>'")));
                }
                if open.pop().is_none() {
                    return Err(s.error("'</dir>' without a matching '<dir'"));
                }
                continue;
            }

            let token = s.expect_token("'<dir', '<file' or '</dir>'")?;
            match token {
                "<dir" | "<file" => {
                    let line = s.line();
                    let tag = read_tag(&mut s)?;
                    let parent = open.last().copied();
                    table
                        .insert(tag.id, tag.name, parent)
                        .map_err(|e| s.reference(e))?;

                    if token == "<dir" && !tag.self_closing {
                        open.push(tag.id);
                    }
                    tracing::trace!(id = tag.id, line, depth = open.len(), "xml tag");
                }
                other => {
                    return Err(s.error(format!(
                        "expected '<dir', '<file' or '</dir>', found '{other}'"
                    )));
                }
            }
        }

        table.finish()?;
        Ok(table)
    }
}

enum Step {
    Enter { id: DirId, depth: usize },
    Close { depth: usize },
}

impl Renderer for XmlHandler {
    fn format(&self) -> DirFormat {
        DirFormat::Xml
    }

    fn render(&self, table: &DirectoryTable, config: &RenderConfig) -> Result<String> {
        config.validate()?;
        let root = finished_root(table)?;
        let width = config.xml_indent_width;
        let mut output = String::new();
        let mut steps = vec![Step::Enter { id: root, depth: 0 }];

        while let Some(step) = steps.pop() {
            match step {
                Step::Enter { id, depth } => {
                    let name = table.name_of(id)?;
                    let children = table.children_of(id)?;
                    indent(&mut output, depth, width);

                    if children.is_empty() {
                        output.push_str(&format!("<file name='{}' id='{}'/>\n", name, id));
                        continue;
                    }

                    output.push_str(&format!("<dir name='{}' id='{}'>\n", name, id));
                    steps.push(Step::Close { depth });
                    steps.extend(children.into_iter().rev().map(|child| Step::Enter {
                        id: child,
                        depth: depth + 1,
                    }));
                }
                Step::Close { depth } => {
                    indent(&mut output, depth, width);
                    output.push_str("</dir>\n");
                }
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ConversionError;

    const SAMPLE: &str = "\
<dir name='root' id='1'>
  <dir name='a' id='2'>
    <file name='c' id='4'/>
  </dir>
  <file name='b' id='3'/>
</dir>
";

    fn parse(input: &str) -> Result<DirectoryTable> {
        XmlHandler::new().parse(input, &ParseConfig::default())
    }

    #[test]
    fn test_parse_nested() {
        let table = parse(SAMPLE).unwrap();
        assert_eq!(table.root(), Some(1));
        assert_eq!(table.children_of(1).unwrap(), vec![2, 3]);
        assert_eq!(table.children_of(2).unwrap(), vec![4]);
        assert_eq!(table.name_of(4).unwrap(), "c");
    }

    #[test]
    fn test_render_matches_input() {
        let table = parse(SAMPLE).unwrap();
        let out = XmlHandler::new()
            .render(&table, &RenderConfig::default())
            .unwrap();
        assert_eq!(out, SAMPLE);
    }

    #[test]
    fn test_childless_dir_renders_as_file() {
        let table = parse("<dir name='r' id='1'>\n<dir name='empty' id='2'>\n</dir>\n</dir>\n")
            .unwrap();
        let out = XmlHandler::new()
            .render(&table, &RenderConfig::default())
            .unwrap();
        assert_eq!(out, "<dir name='r' id='1'>\n  <file name='empty' id='2'/>\n</dir>\n");
        assert!(!out.contains("<dir name='empty'"));
    }

    #[test]
    fn test_single_file_root() {
        let table = parse("<file name='lonely' id='-3'/>\ntrailing garbage").unwrap();
        assert_eq!(table.root(), Some(-3));
        let out = XmlHandler::new()
            .render(&table, &RenderConfig::default())
            .unwrap();
        assert_eq!(out, "<file name='lonely' id='-3'/>\n");
    }

    #[test]
    fn test_names_with_spaces() {
        let table = parse("<dir name='my docs' id='1'>\n  <file name='a b' id='2'/>\n</dir>")
            .unwrap();
        assert_eq!(table.name_of(1).unwrap(), "my docs");
        assert_eq!(table.name_of(2).unwrap(), "a b");
    }

    #[test]
    fn test_tags_on_one_line() {
        let table =
            parse("<dir name='r' id='1'><file name='x' id='2'/> <file name='y' id='3'/></dir>")
                .unwrap();
        assert_eq!(table.children_of(1).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_glued_closing_tags() {
        let table =
            parse("<dir name='r' id='1'><dir name='a' id='2'><file name='b' id='3'/></dir></dir>")
                .unwrap();
        assert_eq!(table.root(), Some(1));
        assert_eq!(table.children_of(1).unwrap(), vec![2]);
        assert_eq!(table.children_of(2).unwrap(), vec![3]);

        let table = parse(
            "<dir name='r' id='1'><dir name='a' id='2'><file name='b' id='3'/></dir><file name='c' id='4'/></dir>",
        )
        .unwrap();
        assert_eq!(table.children_of(1).unwrap(), vec![2, 4]);
    }

    #[test]
    fn test_wrong_closing_tag() {
        let err = parse("<dir name='r' id='1'><file name='a' id='2'/></file>").unwrap_err();
        assert!(err.to_string().contains("'</file>'"));
    }

    #[test]
    fn test_stray_closing_tag() {
        let err = parse("</dir>").unwrap_err();
        assert!(err.to_string().contains("without a matching"));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("<dir name='r id='1'>\n").unwrap_err();
        assert!(matches!(err, ConversionError::ParseError { .. }));
    }

    #[test]
    fn test_missing_close() {
        let err = parse("<dir name='r' id='1'>\n  <file name='a' id='2'/>\n").unwrap_err();
        assert!(matches!(err, ConversionError::ParseError { .. }));
    }

    #[test]
    fn test_unexpected_token() {
        let err = parse("<folder name='r' id='1'/>").unwrap_err();
        assert!(err.to_string().contains("'<folder'"));
    }

    #[test]
    fn test_non_numeric_id() {
        let err = parse("<file name='r' id='one'/>").unwrap_err();
        assert!(matches!(
            err,
            ConversionError::ParseError { format: DirFormat::Xml, .. }
        ));
    }
}
