mod patch;
mod relationship;

pub use patch::{Patch, PatchSet};
pub use relationship::{Relationship, SnapQuality};
