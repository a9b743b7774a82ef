use geo::{BoundingRect, Rect};
use rstar::{RTree, RTreeObject, AABB};

use crate::types::PatchSet;

/// A bounding box in the R-tree, associated with a patch by insertion index.
#[derive(Debug, Clone)]
struct BoundingBox {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Bbox R-tree over a patch set for fast candidate lookup.
///
/// Candidates are returned in patch-set iteration order so downstream
/// results stay deterministic regardless of tree shape.
#[derive(Debug, Clone)]
pub struct PatchIndex {
    ids: Vec<String>,
    rtree: RTree<BoundingBox>,
}

impl PatchIndex {
    pub fn build(patches: &PatchSet) -> Self {
        let mut ids = Vec::with_capacity(patches.len());
        let mut boxes = Vec::with_capacity(patches.len());
        for patch in patches.iter() {
            if let Some(bbox) = patch.geometry.bounding_rect() {
                boxes.push(BoundingBox { idx: ids.len(), bbox });
            }
            ids.push(patch.id.clone());
        }
        Self { ids, rtree: RTree::bulk_load(boxes) }
    }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// Ids of patches whose bbox, padded by `pad_deg`, intersects `rect`.
    pub fn candidates(&self, rect: &Rect<f64>, pad_deg: f64) -> Vec<&str> {
        let search = AABB::from_corners(
            [rect.min().x - pad_deg, rect.min().y - pad_deg],
            [rect.max().x + pad_deg, rect.max().y + pad_deg],
        );
        let mut idxs: Vec<usize> = self
            .rtree
            .locate_in_envelope_intersecting(&search)
            .map(|b| b.idx)
            .collect();
        idxs.sort_unstable();
        idxs.into_iter().map(|i| self.ids[i].as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, BoundingRect, MultiPolygon};

    use crate::types::{Patch, PatchSet};

    use super::PatchIndex;

    fn square(id: &str, x0: f64) -> Patch {
        let poly = polygon![
            (x: x0, y: 0.0), (x: x0 + 1.0, y: 0.0), (x: x0 + 1.0, y: 1.0), (x: x0, y: 1.0), (x: x0, y: 0.0),
        ];
        Patch::new(id, id, MultiPolygon(vec![poly]))
    }

    #[test]
    fn candidates_filtered_by_bbox() {
        let set = PatchSet::from_patches(vec![square("a", 0.0), square("b", 2.0), square("c", 10.0)]);
        let index = PatchIndex::build(&set);
        let probe = set.get("a").unwrap().geometry.bounding_rect().unwrap();
        let hits = index.candidates(&probe, 1.5);
        assert!(hits.contains(&"a"));
        assert!(hits.contains(&"b"));
        assert!(!hits.contains(&"c"));
    }

    #[test]
    fn candidates_are_in_patch_set_order() {
        let set = PatchSet::from_patches(vec![square("c", 0.4), square("a", 0.0), square("b", 0.2)]);
        let index = PatchIndex::build(&set);
        let probe = set.get("a").unwrap().geometry.bounding_rect().unwrap();
        assert_eq!(index.candidates(&probe, 0.0), vec!["a", "b", "c"]);
    }
}
