// SPDX-License-Identifier: AGPL-3.0-or-later
//! Ancestor chains for absolute path output
//!
//! For every directory below the root the index stores the identifiers from
//! the root's child down to the directory itself. Each chain is derived from
//! its parent's chain during one depth-first walk.

use crate::formats::finished_root;
use crate::table::{DirId, DirectoryTable};
use crate::traits::Result;

#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    entries: Vec<(DirId, Vec<DirId>)>,
}

impl PathIndex {
    /// Walk `table` from its root; entries come out in preorder.
    pub fn build(table: &DirectoryTable) -> Result<Self> {
        let root = finished_root(table)?;
        let mut index = PathIndex::default();

        let mut stack: Vec<(DirId, Vec<DirId>)> = table
            .children_of(root)?
            .into_iter()
            .rev()
            .map(|child| (child, vec![child]))
            .collect();

        while let Some((id, path)) = stack.pop() {
            for child in table.children_of(id)?.into_iter().rev() {
                let mut child_path = Vec::with_capacity(path.len() + 1);
                child_path.extend_from_slice(&path);
                child_path.push(child);
                stack.push((child, child_path));
            }
            index.entries.push((id, path));
        }

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DirId, &[DirId])> + '_ {
        self.entries.iter().map(|(id, path)| (*id, path.as_slice()))
    }
}
