//! In-memory rows of the current dynamics page, keyed by synthetic id.

use std::collections::BTreeMap;

use crate::api::DynamicsView;

/// The id shown for row `row` (0-based) of a page starting at `base_offset`.
pub fn synthetic_id(base_offset: usize, row: usize) -> usize {
    base_offset + row + 1
}

#[derive(Clone, Debug, Default)]
pub struct DynamicsCache {
    rows: BTreeMap<usize, DynamicsView>,
}

impl DynamicsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: usize, view: DynamicsView) {
        self.rows.insert(id, view);
    }

    pub fn get(&self, id: usize) -> Option<&DynamicsView> {
        self.rows.get(&id)
    }

    /// The row selected by default when a page arrives.
    pub fn first(&self) -> Option<(usize, &DynamicsView)> {
        self.rows.iter().next().map(|(id, view)| (*id, view))
    }

    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
