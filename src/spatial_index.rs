//! Spatial Index Module
//!
//! R-tree over text field boxes for hit testing pointer-downs on a page.
//! Overlapping boxes resolve to the most recently placed field.

use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;
use uuid::Uuid;

/// A text field's bounding box in page-logical coordinates.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub field_id: Uuid,
    /// Placement order; higher is on top
    pub order: u64,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl SpatialEntry {
    pub fn new(field_id: Uuid, order: u64, position: (f32, f32), size: (f32, f32)) -> Self {
        Self {
            field_id,
            order,
            min_x: position.0,
            min_y: position.1,
            max_x: position.0 + size.0,
            max_y: position.1 + size.1,
        }
    }

    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.field_id == other.field_id
    }
}

/// Spatial index for text fields using an R-tree.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<Uuid, SpatialEntry>,
    next_order: u64,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move a field. A moved field keeps its stacking order.
    pub fn insert(&mut self, field_id: Uuid, position: (f32, f32), size: (f32, f32)) {
        let order = match self.entries.remove(&field_id) {
            Some(old_entry) => {
                self.tree.remove(&old_entry);
                old_entry.order
            }
            None => {
                self.next_order += 1;
                self.next_order
            }
        };

        let entry = SpatialEntry::new(field_id, order, position, size);
        self.tree.insert(entry);
        self.entries.insert(field_id, entry);
    }

    pub fn remove(&mut self, field_id: Uuid) -> bool {
        if let Some(entry) = self.entries.remove(&field_id) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    /// All fields containing the point, topmost first.
    pub fn query_point(&self, x: f32, y: f32) -> Vec<Uuid> {
        let point_envelope = AABB::from_point([x, y]);

        let mut hits: Vec<&SpatialEntry> = self
            .tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.contains_point(x, y))
            .collect();
        hits.sort_by(|a, b| b.order.cmp(&a.order));
        hits.into_iter().map(|entry| entry.field_id).collect()
    }

    /// Topmost field containing the point.
    pub fn topmost_at(&self, x: f32, y: f32) -> Option<Uuid> {
        self.query_point(x, y).into_iter().next()
    }

    pub fn bounds(&self, field_id: Uuid) -> Option<SpatialEntry> {
        self.entries.get(&field_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the contents; items are given bottom to top.
    pub fn rebuild<I>(&mut self, items: I)
    where
        I: Iterator<Item = (Uuid, (f32, f32), (f32, f32))>,
    {
        let entries: Vec<SpatialEntry> = items
            .enumerate()
            .map(|(i, (id, pos, size))| SpatialEntry::new(id, i as u64 + 1, pos, size))
            .collect();

        self.next_order = entries.len() as u64;
        self.entries = entries.iter().map(|e| (e.field_id, *e)).collect();
        self.tree = RTree::bulk_load(entries);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
        self.next_order = 0;
    }
}
