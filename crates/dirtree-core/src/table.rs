// SPDX-License-Identifier: AGPL-3.0-or-later
//! Directory table - the in-memory tree every format converts to/from
//!
//! Records are stored in an append-only arena and addressed internally by
//! slot. The public identifier of a record lives in an ordered index on top
//! of the arena, so renaming a record touches a single map entry and never
//! moves the record or its links.

use std::collections::BTreeMap;
use thiserror::Error;

/// Directory identifier as written in every format
pub type DirId = i64;

/// Slot of a record inside the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Slot(usize);

/// Errors raised by table operations and the final tree check
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("unknown directory identifier {0}")]
    UnknownIdentifier(DirId),

    #[error("duplicate directory identifier {0}")]
    DuplicateIdentifier(DirId),

    /// A directory was listed as the child of two parents
    #[error("directory {child} already belongs to {parent}")]
    AlreadyAttached { child: DirId, parent: DirId },

    #[error("no root directory: every directory has a parent")]
    NoRoot,

    #[error("more than one root directory: {first} and {second}")]
    MultipleRoots { first: DirId, second: DirId },

    /// Cycle or detached component
    #[error("{count} directories are not reachable from root {root}")]
    Unreachable { root: DirId, count: usize },
}

#[derive(Debug, Clone)]
struct Record {
    id: DirId,
    name: String,
    parent: Option<Slot>,
    children: Vec<Slot>,
}

/// ID-indexed directory table with parent/child links
#[derive(Debug, Clone, Default)]
pub struct DirectoryTable {
    records: Vec<Record>,
    index: BTreeMap<DirId, Slot>,
    root: Option<Slot>,
}

impl DirectoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: DirId) -> bool {
        self.index.contains_key(&id)
    }

    /// Identifiers in ascending order
    pub fn ids(&self) -> impl Iterator<Item = DirId> + '_ {
        self.index.keys().copied()
    }

    /// Root identifier, available once [`finish`](Self::finish) succeeded
    pub fn root(&self) -> Option<DirId> {
        self.root.map(|slot| self.records[slot.0].id)
    }

    /// Add a record and, when `parent` is given, append it to the parent's children.
    pub fn insert(
        &mut self,
        id: DirId,
        name: impl Into<String>,
        parent: Option<DirId>,
    ) -> Result<(), TableError> {
        if self.index.contains_key(&id) {
            return Err(TableError::DuplicateIdentifier(id));
        }
        let parent_slot = parent.map(|p| self.slot(p)).transpose()?;

        let slot = Slot(self.records.len());
        self.records.push(Record {
            id,
            name: name.into(),
            parent: parent_slot,
            children: Vec::new(),
        });
        self.index.insert(id, slot);

        if let Some(p) = parent_slot {
            self.records[p.0].children.push(slot);
        }
        Ok(())
    }

    /// Link two existing records as parent and child.
    pub fn attach(&mut self, parent: DirId, child: DirId) -> Result<(), TableError> {
        let parent_slot = self.slot(parent)?;
        let child_slot = self.slot(child)?;

        if let Some(existing) = self.records[child_slot.0].parent {
            return Err(TableError::AlreadyAttached {
                child,
                parent: self.records[existing.0].id,
            });
        }

        self.records[child_slot.0].parent = Some(parent_slot);
        self.records[parent_slot.0].children.push(child_slot);
        Ok(())
    }

    /// Replace `old` with `new` everywhere it is visible.
    ///
    /// Links are slot based, so the parent's child list and the children's
    /// parent pointers follow the record without being rewritten.
    pub fn reassign_identifier(&mut self, old: DirId, new: DirId) -> Result<(), TableError> {
        if old == new {
            return self.slot(old).map(|_| ());
        }
        if self.index.contains_key(&new) {
            return Err(TableError::DuplicateIdentifier(new));
        }
        let slot = self
            .index
            .remove(&old)
            .ok_or(TableError::UnknownIdentifier(old))?;

        self.records[slot.0].id = new;
        self.index.insert(new, slot);
        Ok(())
    }

    pub fn name_of(&self, id: DirId) -> Result<&str, TableError> {
        Ok(&self.records[self.slot(id)?.0].name)
    }

    /// Parent identifier, `None` for a parentless record
    pub fn parent_of(&self, id: DirId) -> Result<Option<DirId>, TableError> {
        let slot = self.slot(id)?;
        Ok(self.records[slot.0].parent.map(|p| self.records[p.0].id))
    }

    pub fn children_of(&self, id: DirId) -> Result<Vec<DirId>, TableError> {
        let slot = self.slot(id)?;
        Ok(self.child_ids(slot).collect())
    }

    /// First child of `parent` carrying `name`, in stored order
    pub fn find_child(&self, parent: DirId, name: &str) -> Result<Option<DirId>, TableError> {
        let slot = self.slot(parent)?;
        Ok(self.records[slot.0]
            .children
            .iter()
            .map(|c| &self.records[c.0])
            .find(|r| r.name == name)
            .map(|r| r.id))
    }

    /// Sort every child list by ascending identifier.
    pub fn sort_children_by_id(&mut self) {
        let ids: Vec<DirId> = self.records.iter().map(|r| r.id).collect();
        for record in &mut self.records {
            record.children.sort_by_key(|c| ids[c.0]);
        }
    }

    /// Resolve the root and check that the records form exactly one tree.
    pub fn finish(&mut self) -> Result<DirId, TableError> {
        let mut root: Option<Slot> = None;
        for slot in self.index.values() {
            if self.records[slot.0].parent.is_some() {
                continue;
            }
            if let Some(first) = root {
                return Err(TableError::MultipleRoots {
                    first: self.records[first.0].id,
                    second: self.records[slot.0].id,
                });
            }
            root = Some(*slot);
        }
        let root = root.ok_or(TableError::NoRoot)?;

        let mut seen = vec![false; self.records.len()];
        let mut stack = vec![root];
        let mut reached = 0;
        while let Some(slot) = stack.pop() {
            if std::mem::replace(&mut seen[slot.0], true) {
                continue;
            }
            reached += 1;
            stack.extend(self.records[slot.0].children.iter().copied());
        }

        let root_id = self.records[root.0].id;
        if reached != self.len() {
            return Err(TableError::Unreachable {
                root: root_id,
                count: self.len() - reached,
            });
        }

        self.root = Some(root);
        Ok(root_id)
    }

    /// Depth-first preorder walk from the root yielding `(id, depth)`.
    ///
    /// Children are visited in stored order. Empty before `finish`.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            table: self,
            stack: self.root.map(|r| (r, 0)).into_iter().collect(),
        }
    }

    fn slot(&self, id: DirId) -> Result<Slot, TableError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(TableError::UnknownIdentifier(id))
    }

    fn child_ids(&self, slot: Slot) -> impl Iterator<Item = DirId> + '_ {
        self.records[slot.0]
            .children
            .iter()
            .map(|c| self.records[c.0].id)
    }
}

/// Iterator returned by [`DirectoryTable::preorder`]
pub struct Preorder<'a> {
    table: &'a DirectoryTable,
    stack: Vec<(Slot, usize)>,
}

impl Iterator for Preorder<'_> {
    type Item = (DirId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (slot, depth) = self.stack.pop()?;
        let record = &self.table.records[slot.0];
        self.stack
            .extend(record.children.iter().rev().map(|c| (*c, depth + 1)));
        Some((record.id, depth))
    }
}
