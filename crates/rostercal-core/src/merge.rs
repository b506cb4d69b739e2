//! Merged cell groups

use crate::cell::{CellAddress, CellRange};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// Ranges with more cells than this are not expanded into the member index;
/// lookups fall back to a rectangle test for them.
pub const MAX_INDEXED_CELLS: u64 = 1 << 16;

/// Anchor/member lookup for the merged ranges of one sheet.
///
/// The anchor of a group is the top-left cell of its range. Every member
/// (the anchor included) maps back to exactly one anchor.
#[derive(Debug, Clone, Default)]
pub struct MergeGroups {
    groups: BTreeMap<CellAddress, CellRange>,
    anchors: AHashMap<CellAddress, CellAddress>,
    wide: Vec<CellRange>,
}

impl MergeGroups {
    /// Create an empty set of groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Build groups from `mergeCell` references such as `"C2:E4"`.
    ///
    /// Malformed references and ranges overlapping an earlier one are skipped
    /// with a warning.
    pub fn from_refs<I, S>(refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut merges = Self::new();
        for r in refs {
            let r = r.as_ref();
            match CellRange::parse(r) {
                Ok(range) => {
                    merges.insert(range);
                }
                Err(e) => tracing::warn!(range = r, error = %e, "skipping malformed merge range"),
            }
        }
        merges
    }

    /// Add a merged range. Returns false if it overlaps an existing group.
    pub fn insert(&mut self, range: CellRange) -> bool {
        if self.groups.values().any(|g| g.intersects(&range)) {
            tracing::warn!(range = %range, "merge range overlaps an existing group");
            return false;
        }

        let anchor = range.start;
        if range.cell_count() > MAX_INDEXED_CELLS {
            tracing::debug!(range = %range, "large merge range resolved by bounds");
            self.wide.push(range);
        } else {
            self.anchors.extend(range.cells().map(|member| (member, anchor)));
        }
        self.groups.insert(anchor, range);
        true
    }

    /// The anchor of the group containing `addr`
    pub fn anchor_of(&self, addr: &CellAddress) -> Option<CellAddress> {
        self.anchors.get(addr).copied().or_else(|| {
            self.wide
                .iter()
                .find(|range| range.contains(addr))
                .map(|range| range.start)
        })
    }

    /// The full range of the group anchored at `anchor`
    pub fn range(&self, anchor: &CellAddress) -> Option<CellRange> {
        self.groups.get(anchor).copied()
    }

    /// Anchors in (row, column) order
    pub fn anchors(&self) -> impl Iterator<Item = &CellAddress> {
        self.groups.keys()
    }

    /// Check if `addr` is the anchor of a group
    pub fn is_anchor(&self, addr: &CellAddress) -> bool {
        self.groups.contains_key(addr)
    }

    /// Check if `addr` belongs to a group without being its anchor
    pub fn is_continuation(&self, addr: &CellAddress) -> bool {
        matches!(self.anchor_of(addr), Some(anchor) if anchor != *addr)
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
