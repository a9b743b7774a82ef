use std::collections::BTreeMap;

use geo::{MultiPolygon, Polygon};

/// A polygonal region with identity. Patches partition a territory.
#[derive(Debug, Clone)]
pub struct Patch {
    /// Opaque id, unique within a session.
    pub id: String,
    /// Short human label.
    pub code: String,
    /// Common name, when known.
    pub name: Option<String>,
    /// Always a MultiPolygon; single polygons are wrapped at ingress.
    pub geometry: MultiPolygon<f64>,
}

impl Patch {
    pub fn new(id: impl Into<String>, code: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self { id: id.into(), code: code.into(), name: None, geometry }
    }

    /// Wrap a single Polygon into the canonical MultiPolygon form.
    pub fn from_polygon(id: impl Into<String>, code: impl Into<String>, polygon: Polygon<f64>) -> Self {
        Self::new(id, code, MultiPolygon(vec![polygon]))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Mapping from id to Patch. Iteration order is stable within a run
/// (sorted by id); results must not depend on it.
#[derive(Debug, Clone, Default)]
pub struct PatchSet {
    patches: BTreeMap<String, Patch>,
}

impl PatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patches(patches: impl IntoIterator<Item = Patch>) -> Self {
        Self {
            patches: patches.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    #[inline] pub fn len(&self) -> usize { self.patches.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.patches.is_empty() }

    #[inline] pub fn contains(&self, id: &str) -> bool { self.patches.contains_key(id) }

    #[inline] pub fn get(&self, id: &str) -> Option<&Patch> { self.patches.get(id) }

    #[inline] pub fn get_mut(&mut self, id: &str) -> Option<&mut Patch> { self.patches.get_mut(id) }

    /// Insert or replace a patch, keyed by its id.
    pub fn insert(&mut self, patch: Patch) {
        self.patches.insert(patch.id.clone(), patch);
    }

    pub fn remove(&mut self, id: &str) -> Option<Patch> {
        self.patches.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.patches.keys().map(String::as_str)
    }
}

impl FromIterator<Patch> for PatchSet {
    fn from_iter<T: IntoIterator<Item = Patch>>(iter: T) -> Self {
        Self::from_patches(iter)
    }
}
